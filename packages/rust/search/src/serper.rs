//! Serper (Google Search JSON API) provider.

use async_trait::async_trait;
use macrofind_shared::{MacroFindError, Result, SearchConfig};
use reqwest::Client;
use tracing::{debug, info};

use crate::{SearchHit, USER_AGENT, WebSearcher, build_client};

const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";

pub struct SerperSearcher {
    api_key: String,
    endpoint: String,
    client: Client,
}

#[derive(Debug, serde::Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperResult>,
}

#[derive(Debug, serde::Deserialize)]
struct SerperResult {
    #[serde(default)]
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
    #[serde(default)]
    date: Option<String>,
}

impl SerperSearcher {
    pub fn new(api_key: impl Into<String>, config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            api_key: api_key.into(),
            endpoint: config
                .endpoint
                .clone()
                .unwrap_or_else(|| SERPER_ENDPOINT.to_string()),
            client: build_client(config, USER_AGENT)?,
        })
    }
}

#[async_trait]
impl WebSearcher for SerperSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        debug!(query, max_results, "Serper search");

        let body = serde_json::json!({
            "q": query,
            "num": max_results,
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| MacroFindError::search_unavailable(query, e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(MacroFindError::search_unavailable(
                query,
                format!("HTTP {status}"),
            ));
        }

        let data: SerperResponse = resp.json().await.map_err(|e| {
            MacroFindError::search_unavailable(query, format!("invalid response: {e}"))
        })?;

        let results: Vec<SearchHit> = data
            .organic
            .into_iter()
            .take(max_results)
            .map(|r| SearchHit {
                url: r.link,
                title: r.title,
                snippet: r.snippet,
                published_date: r.date.filter(|d| !d.trim().is_empty()),
            })
            .collect();

        info!(query, count = results.len(), "Serper search complete");
        Ok(results)
    }
}
