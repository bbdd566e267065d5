//! Raw search hit → [`Finding`] normalization.

use url::Url;

use macrofind_search::SearchHit;
use macrofind_shared::{Category, Finding, MacroFindError, Result};

/// Relevance assigned to every web-search finding.
pub const WEB_SEARCH_RELEVANCE: f64 = 0.5;

/// Map one search hit to a finding in `category`.
///
/// Fails with [`MacroFindError::MalformedUrl`] when the URL is not an
/// absolute http(s) URL with a host.
pub fn normalize(hit: &SearchHit, category: Category) -> Result<Finding> {
    let source_url = hit.url.trim();
    let source_name = source_name(source_url)?;

    Ok(Finding {
        title: hit.title.trim().to_string(),
        summary: hit.snippet.trim().to_string(),
        source_url: Some(source_url.to_string()),
        source_name,
        published_date: hit
            .published_date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from),
        relevance_score: WEB_SEARCH_RELEVANCE,
        category: category.label().to_string(),
    })
}

/// Lower-cased host of `url`, without a leading `www.`.
pub fn source_name(url: &str) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| MacroFindError::malformed_url(url, e.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(MacroFindError::malformed_url(
            url,
            format!("unsupported scheme '{}'", parsed.scheme()),
        ));
    }

    let host = parsed
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| MacroFindError::malformed_url(url, "URL has no host"))?
        .to_ascii_lowercase();

    Ok(host.strip_prefix("www.").map(String::from).unwrap_or(host))
}
