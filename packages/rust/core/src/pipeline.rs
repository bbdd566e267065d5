//! End-to-end enrichment: document → queries → search → normalize → dedup →
//! append → write.

use std::path::PathBuf;
use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use macrofind_search::{SearchHit, WebSearcher};
use macrofind_shared::{Category, CategoryMap, Finding, FindingsDocument, Result};

use crate::dedup::{dedupe, existing_urls};
use crate::document::{load_document, update_document};
use crate::merge::{append_groups, build_groups};
use crate::normalize::normalize;
use crate::queries::{QuerySet, derive_queries};
use crate::summary::EnrichSummary;

/// Configuration for the `enrich_file` pipeline.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    /// Findings document to read and rewrite.
    pub path: PathBuf,
    /// Results requested per query.
    pub max_results: usize,
    /// Run everything except the final write.
    pub dry_run: bool,
}

/// Result of the `enrich_file` pipeline.
#[derive(Debug)]
pub struct EnrichResult {
    pub path: PathBuf,
    /// The document as written (or as it would have been written).
    pub document: FindingsDocument,
    pub summary: EnrichSummary,
    /// Whether the document was written back.
    pub written: bool,
    /// Total elapsed time.
    pub elapsed: std::time::Duration,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called after each search query, successful or not.
    fn query_finished(&self, query: &str, current: usize, total: usize, hits: usize);
    /// Called when the pipeline completes.
    fn done(&self, summary: &EnrichSummary);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn query_finished(&self, _query: &str, _current: usize, _total: usize, _hits: usize) {}
    fn done(&self, _summary: &EnrichSummary) {}
}

/// Raw search output for one run, grouped by category in query order.
#[derive(Debug, Clone, Default)]
pub struct CollectedHits {
    pub hits: CategoryMap<Vec<SearchHit>>,
    pub queries_run: usize,
    pub queries_failed: usize,
}

/// Run every query in `queries` against `searcher`, one at a time.
///
/// A query failing with an isolated error (see
/// [`macrofind_shared::MacroFindError::is_isolated`]) is logged and
/// contributes no hits. Any other error ends the run.
pub async fn collect_hits(
    searcher: &dyn WebSearcher,
    queries: &QuerySet,
    max_results: usize,
    progress: &dyn ProgressReporter,
) -> Result<CollectedHits> {
    let total = queries.len();
    let mut collected = CollectedHits::default();

    for (i, (category, query)) in queries.iter().enumerate() {
        collected.queries_run += 1;
        let hits = match searcher.search(query, max_results).await {
            Ok(hits) => {
                debug!(%category, query, count = hits.len(), "query answered");
                hits
            }
            Err(e) if e.is_isolated() => {
                warn!(%category, query, error = %e, "search failed, skipping query");
                collected.queries_failed += 1;
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        progress.query_finished(query, i + 1, total, hits.len());
        collected.hits.get_mut(category).extend(hits);
    }

    Ok(collected)
}

/// Normalize, dedup, and append `collected` to `doc`.
///
/// Pure apart from logging: the same document and hits always produce the
/// same groups and summary.
pub fn apply_results(
    doc: &mut FindingsDocument,
    queries: &QuerySet,
    collected: CollectedHits,
) -> EnrichSummary {
    let seen = existing_urls(doc);
    let mut malformed_dropped = 0;
    let mut results_seen = 0;

    let mut normalized = CategoryMap::<Vec<Finding>>::default();
    for (category, hits) in collected.hits.into_pairs() {
        results_seen += hits.len();
        let out = normalized.get_mut(category);
        for hit in &hits {
            match normalize(hit, category) {
                Ok(finding) => out.push(finding),
                Err(e) => {
                    warn!(%category, error = %e, "dropping result with malformed URL");
                    malformed_dropped += 1;
                }
            }
        }
    }

    let outcome = dedupe(&seen, normalized);
    let added = outcome.counts();
    let duplicates_dropped = outcome.dropped;

    append_groups(doc, build_groups(queries, outcome.kept));

    EnrichSummary {
        added,
        queries_run: collected.queries_run,
        queries_failed: collected.queries_failed,
        results_seen,
        malformed_dropped,
        duplicates_dropped,
    }
}

/// Run the full enrichment pipeline on the document at `config.path`.
///
/// 1. Load the document
/// 2. Derive queries from `meta.year` / `meta.month` (fails before any search)
/// 3. Run all queries against the searcher (isolated failures are skipped)
/// 4. Normalize, dedup, and append three result groups
/// 5. Stamp `generated_at` and write the document back atomically
#[instrument(skip_all, fields(path = %config.path.display()))]
pub async fn enrich_file(
    config: &EnrichConfig,
    searcher: &dyn WebSearcher,
    progress: &dyn ProgressReporter,
) -> Result<EnrichResult> {
    let start = Instant::now();

    // --- Load ---
    progress.phase("Loading findings document");
    let mut document = load_document(&config.path)?;
    let (year, month) = (document.meta.year, document.meta.month);

    // --- Queries ---
    let queries = derive_queries(year, month)?;
    info!(
        year,
        month,
        existing_groups = document.agent_results.len(),
        existing_findings = document.total_findings(),
        queries = queries.len(),
        "starting enrichment"
    );

    // --- Search ---
    progress.phase("Searching");
    let collected = collect_hits(searcher, &queries, config.max_results, progress).await?;

    // --- Merge ---
    progress.phase("Merging findings");
    let summary = apply_results(&mut document, &queries, collected);

    for category in Category::ALL {
        debug!(%category, added = summary.added_for(category), "category merged");
    }

    // --- Write ---
    let written = if config.dry_run {
        info!("dry run, document not written");
        false
    } else {
        progress.phase("Writing findings document");
        update_document(&config.path, &mut document)?;
        true
    };

    progress.done(&summary);

    info!(
        added = summary.total_added(),
        queries_failed = summary.queries_failed,
        duplicates_dropped = summary.duplicates_dropped,
        malformed_dropped = summary.malformed_dropped,
        elapsed_ms = start.elapsed().as_millis(),
        "enrichment complete"
    );

    Ok(EnrichResult {
        path: config.path.clone(),
        document,
        summary,
        written,
        elapsed: start.elapsed(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
