//! Google results-page provider.
//!
//! Fetches the regular HTML results page and extracts organic results from
//! `div.g` blocks. No API key is needed, but the markup is not a stable
//! interface, so an empty parse is treated as zero results rather than an
//! error.

use async_trait::async_trait;
use macrofind_shared::{MacroFindError, Result, SearchConfig};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info};

use crate::{SearchHit, WebSearcher, build_client};

const GOOGLE_ENDPOINT: &str = "https://www.google.com/search";

/// Browser User-Agent; the results page differs for unknown agents.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

struct Selectors {
    result: Selector,
    link: Selector,
    title: Selector,
    snippet: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        let parse = |css: &str| {
            Selector::parse(css)
                .map_err(|e| MacroFindError::config(format!("invalid selector '{css}': {e}")))
        };
        Ok(Self {
            result: parse("div.g")?,
            link: parse("a[href]")?,
            title: parse("h3")?,
            snippet: parse("div.VwiC3b, span.aCOpRe, div[data-sncf]")?,
        })
    }
}

pub struct GoogleHtmlSearcher {
    endpoint: String,
    client: Client,
    selectors: Selectors,
}

impl GoogleHtmlSearcher {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            endpoint: config
                .endpoint
                .clone()
                .unwrap_or_else(|| GOOGLE_ENDPOINT.to_string()),
            client: build_client(config, BROWSER_USER_AGENT)?,
            selectors: Selectors::new()?,
        })
    }

    /// Extract organic results from a results page.
    fn parse_results(&self, body: &str, max_results: usize) -> Vec<SearchHit> {
        let doc = Html::parse_document(body);
        let mut hits = Vec::new();

        for block in doc.select(&self.selectors.result) {
            let Some(href) = block
                .select(&self.selectors.link)
                .next()
                .and_then(|a| a.value().attr("href"))
            else {
                continue;
            };
            let Some(title_el) = block.select(&self.selectors.title).next() else {
                continue;
            };
            // Redirect links (`/url?q=...`) and in-page anchors are skipped.
            if !href.starts_with("http") {
                continue;
            }

            let title = collapse_text(title_el.text());
            let snippet = block
                .select(&self.selectors.snippet)
                .next()
                .map(|el| collapse_text(el.text()))
                .unwrap_or_default();

            hits.push(SearchHit::new(title, snippet, href));
            if hits.len() >= max_results {
                break;
            }
        }

        hits
    }
}

#[async_trait]
impl WebSearcher for GoogleHtmlSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        let hl = language_hint(query);
        debug!(query, max_results, hl, "Google HTML search");

        let num = max_results.to_string();
        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[("q", query), ("num", num.as_str()), ("hl", hl)])
            .header(reqwest::header::ACCEPT_LANGUAGE, accept_language(hl))
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

        let body = resp.text().await.map_err(|e| {
            MacroFindError::search_unavailable(query, format!("body read failed: {e}"))
        })?;

        let hits = self.parse_results(&body, max_results);
        info!(query, count = hits.len(), "Google HTML search complete");
        Ok(hits)
    }
}

/// Interface language for a query: Korean when it contains Hangul.
fn language_hint(query: &str) -> &'static str {
    let hangul = query
        .chars()
        .any(|c| ('\u{AC00}'..='\u{D7A3}').contains(&c) || ('\u{3131}'..='\u{318E}').contains(&c));
    if hangul { "ko" } else { "en" }
}

fn accept_language(hl: &str) -> &'static str {
    match hl {
        "ko" => "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7",
        _ => "en-US,en;q=0.9",
    }
}

fn collapse_text<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    parts
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"<html><body><div id="search">
<div class="g">
  <a href="https://www.ecb.europa.eu/press/pr/html/index.en.html"><h3>Monetary policy decisions</h3></a>
  <div class="VwiC3b">The Governing Council  today decided
    to keep the three key ECB interest rates unchanged.</div>
</div>
<div class="g">
  <a href="/url?q=https://example.com/redirect"><h3>Redirected</h3></a>
</div>
<div class="g">
  <a href="https://www.imf.org/en/Publications/WEO"><h3>World Economic Outlook</h3></a>
</div>
<div class="g"><span>No link here</span></div>
</div></body></html>"#;

    fn searcher(endpoint: Option<String>) -> GoogleHtmlSearcher {
        let config = SearchConfig {
            endpoint,
            timeout_secs: 5,
            ..SearchConfig::default()
        };
        GoogleHtmlSearcher::new(&config).unwrap()
    }

    #[test]
    fn test_parse_results() {
        let hits = searcher(None).parse_results(RESULTS_PAGE, 5);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Monetary policy decisions");
        assert_eq!(
            hits[0].snippet,
            "The Governing Council today decided to keep the three key ECB interest rates unchanged."
        );
        assert_eq!(hits[1].url, "https://www.imf.org/en/Publications/WEO");
        assert_eq!(hits[1].snippet, "");
    }

    #[test]
    fn test_parse_results_respects_limit() {
        let hits = searcher(None).parse_results(RESULTS_PAGE, 1);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_language_hint() {
        assert_eq!(language_hint("유로존 소비자물가 2024년 3월"), "ko");
        assert_eq!(language_hint("eurozone PMI 2024 03"), "en");
    }

    #[tokio::test]
    async fn test_search_with_mock_server() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .and(wiremock::matchers::path("/search"))
            .and(wiremock::matchers::query_param("q", "ECB press conference 2024 03"))
            .and(wiremock::matchers::query_param("hl", "en"))
            .respond_with(wiremock::ResponseTemplate::new(200).set_body_string(RESULTS_PAGE))
            .mount(&server)
            .await;

        let s = searcher(Some(format!("{}/search", server.uri())));
        let hits = s.search("ECB press conference 2024 03", 5).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn test_search_blocked_is_unavailable() {
        let server = wiremock::MockServer::start().await;

        wiremock::Mock::given(wiremock::matchers::method("GET"))
            .respond_with(wiremock::ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let s = searcher(Some(format!("{}/search", server.uri())));
        let err = s.search("eurozone GDP growth Q1 2024", 5).await.unwrap_err();
        assert!(matches!(err, MacroFindError::SearchUnavailable { .. }));
    }
}
