//! Canned-result searcher for offline runs and deterministic tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use macrofind_shared::{MacroFindError, Result};

use crate::{SearchHit, WebSearcher};

/// Answers queries from an in-memory table.
///
/// Lookup order: failing queries, exact query match, then the fallback.
/// Queries with no match and no fallback return no hits.
#[derive(Debug, Default)]
pub struct StaticSearcher {
    by_query: HashMap<String, Vec<SearchHit>>,
    fallback: Option<Vec<SearchHit>>,
    failing: HashSet<String>,
    calls: AtomicUsize,
}

impl StaticSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `hits` for exactly `query`.
    pub fn with_query(mut self, query: impl Into<String>, hits: Vec<SearchHit>) -> Self {
        self.by_query.insert(query.into(), hits);
        self
    }

    /// Return `hits` for every query without an exact entry.
    pub fn with_fallback(mut self, hits: Vec<SearchHit>) -> Self {
        self.fallback = Some(hits);
        self
    }

    /// Fail `query` with `SearchUnavailable`.
    pub fn with_failure(mut self, query: impl Into<String>) -> Self {
        self.failing.insert(query.into());
        self
    }

    /// Number of `search` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WebSearcher for StaticSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing.contains(query) {
            return Err(MacroFindError::search_unavailable(query, "simulated failure"));
        }

        let hits: Vec<SearchHit> = self
            .by_query
            .get(query)
            .or(self.fallback.as_ref())
            .map(|hits| hits.iter().take(max_results).cloned().collect())
            .unwrap_or_default();
        Ok(hits)
    }
}
