//! Web search capability consumed by the enrichment pipeline.
//!
//! The pipeline only sees the [`WebSearcher`] trait: one free-text query in,
//! zero or more [`SearchHit`]s out. Concrete providers live in submodules and
//! are selected from [`SearchConfig`] by [`build_searcher`].

mod fixed;
mod google;
mod serper;

use std::time::Duration;

use async_trait::async_trait;
use macrofind_shared::{MacroFindError, Result, SearchConfig, SearchProvider};
use reqwest::Client;

pub use fixed::StaticSearcher;
pub use google::GoogleHtmlSearcher;
pub use serper::SerperSearcher;

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("MacroFind/", env!("CARGO_PKG_VERSION"));

/// One raw result record returned by a search provider.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub url: String,
    /// Provider-supplied date text, passed through unparsed.
    pub published_date: Option<String>,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, snippet: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            url: url.into(),
            published_date: None,
        }
    }
}

/// A search backend. Result count, ordering and latency are unspecified.
///
/// Implementations report failures and timeouts as
/// [`MacroFindError::SearchUnavailable`].
#[async_trait]
pub trait WebSearcher: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}

/// Build the searcher configured in `[search]`.
///
/// `api_key` is required for [`SearchProvider::Serper`] and ignored otherwise.
pub fn build_searcher(
    config: &SearchConfig,
    api_key: Option<String>,
) -> Result<Box<dyn WebSearcher>> {
    match config.provider {
        SearchProvider::Serper => {
            let key = api_key.ok_or_else(|| {
                MacroFindError::config(format!(
                    "serper provider needs an API key in {}",
                    config.api_key_env
                ))
            })?;
            Ok(Box::new(SerperSearcher::new(key, config)?))
        }
        SearchProvider::GoogleHtml => Ok(Box::new(GoogleHtmlSearcher::new(config)?)),
    }
}

/// Build a reqwest client with the configured timeout.
pub(crate) fn build_client(config: &SearchConfig, default_agent: &str) -> Result<Client> {
    let agent = config.user_agent.as_deref().unwrap_or(default_agent);
    Client::builder()
        .user_agent(agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| MacroFindError::config(format!("failed to build HTTP client: {e}")))
}
