//! Operator-facing counts for one enrichment run.

use std::fmt;

use macrofind_shared::{Category, CategoryMap};

/// What an enrichment run added and what it skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnrichSummary {
    /// Findings appended per category.
    pub added: CategoryMap<usize>,
    /// Queries sent to the search collaborator.
    pub queries_run: usize,
    /// Queries that failed and contributed nothing.
    pub queries_failed: usize,
    /// Raw hits returned across all queries.
    pub results_seen: usize,
    /// Hits discarded for an unparseable URL.
    pub malformed_dropped: usize,
    /// Findings discarded as already present.
    pub duplicates_dropped: usize,
}

impl EnrichSummary {
    pub fn added_for(&self, category: Category) -> usize {
        *self.added.get(category)
    }

    pub fn total_added(&self) -> usize {
        self.added.iter().map(|(_, n)| *n).sum()
    }
}

impl fmt::Display for EnrichSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (category, added) in self.added.iter() {
            writeln!(f, "  {:<15} +{added}", category.as_str())?;
        }
        write!(f, "  {:<15} +{}", "Total", self.total_added())
    }
}
