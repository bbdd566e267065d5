//! URL-keyed deduplication of new findings against the whole document.
//!
//! Findings are visited Media → Institutional → Data, and in discovery order
//! within each category. A finding survives only if its `source_url` is
//! neither in the pre-run set nor already emitted earlier in the batch.

use std::collections::HashSet;

use tracing::debug;

use macrofind_shared::{CategoryMap, Finding, FindingsDocument};

/// Result of a dedup pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DedupOutcome {
    /// Survivors, still grouped by category.
    pub kept: CategoryMap<Vec<Finding>>,
    /// Findings dropped as already seen, or for lacking a URL.
    pub dropped: usize,
}

impl DedupOutcome {
    /// Survivor count per category.
    pub fn counts(&self) -> CategoryMap<usize> {
        self.kept.map(|_, findings| findings.len())
    }
}

/// Every `source_url` present in the document's result groups.
pub fn existing_urls(doc: &FindingsDocument) -> HashSet<String> {
    doc.source_urls().map(String::from).collect()
}

/// Keep the first occurrence of each URL not already in `seen`.
pub fn dedupe(seen: &HashSet<String>, batch: CategoryMap<Vec<Finding>>) -> DedupOutcome {
    let mut emitted: HashSet<String> = HashSet::new();
    let mut kept = CategoryMap::<Vec<Finding>>::default();
    let mut dropped = 0;

    for (category, findings) in batch.into_pairs() {
        let survivors = kept.get_mut(category);
        for finding in findings {
            let Some(url) = finding.source_url.as_deref() else {
                dropped += 1;
                continue;
            };
            if seen.contains(url) || !emitted.insert(url.to_string()) {
                debug!(%category, url, "duplicate finding dropped");
                dropped += 1;
                continue;
            }
            survivors.push(finding);
        }
    }

    DedupOutcome { kept, dropped }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macrofind_shared::{AgentResult, Category, FindingsMeta, ResultGroup};
    use serde_json::{Map, json};

    fn finding(url: &str, category: Category) -> Finding {
        Finding {
            title: format!("title for {url}"),
            summary: String::new(),
            source_url: Some(url.into()),
            source_name: String::new(),
            published_date: None,
            relevance_score: 0.5,
            category: category.label().into(),
        }
    }

    fn batch(media: &[&str], institutional: &[&str], data: &[&str]) -> CategoryMap<Vec<Finding>> {
        CategoryMap {
            media: media.iter().map(|u| finding(u, Category::Media)).collect(),
            institutional: institutional
                .iter()
                .map(|u| finding(u, Category::Institutional))
                .collect(),
            data: data.iter().map(|u| finding(u, Category::Data)).collect(),
        }
    }

    fn urls(findings: &[Finding]) -> Vec<&str> {
        findings
            .iter()
            .filter_map(|f| f.source_url.as_deref())
            .collect()
    }

    #[test]
    fn first_occurrence_wins_across_categories() {
        let outcome = dedupe(
            &HashSet::new(),
            batch(&["A", "B", "A", "C"], &["B", "A", "D"], &["C", "A", "E"]),
        );

        assert_eq!(urls(&outcome.kept.media), vec!["A", "B", "C"]);
        assert_eq!(urls(&outcome.kept.institutional), vec!["D"]);
        assert_eq!(urls(&outcome.kept.data), vec!["E"]);
        assert_eq!(outcome.dropped, 5);
        assert_eq!(
            outcome.counts(),
            CategoryMap {
                media: 3,
                institutional: 1,
                data: 1
            }
        );
    }

    #[test]
    fn history_urls_are_excluded() {
        let seen: HashSet<String> = ["https://ecb.europa.eu/x".to_string()].into();
        let outcome = dedupe(
            &seen,
            batch(
                &["https://ecb.europa.eu/x", "https://reuters.com/y"],
                &["https://ecb.europa.eu/x"],
                &[],
            ),
        );
        assert_eq!(urls(&outcome.kept.media), vec!["https://reuters.com/y"]);
        assert!(outcome.kept.institutional.is_empty());
        assert!(outcome.kept.data.is_empty());
    }

    #[test]
    fn dedupe_is_idempotent() {
        let seen: HashSet<String> = ["X".to_string()].into();
        let input = batch(&["A", "X", "B"], &["B", "C"], &["A", "D", "D"]);

        let first = dedupe(&seen, input.clone());
        let second = dedupe(&seen, input);
        assert_eq!(first, second);

        // Feeding the survivors back through changes nothing.
        let again = dedupe(&seen, first.kept.clone());
        assert_eq!(again.kept, first.kept);
        assert_eq!(again.dropped, 0);
    }

    #[test]
    fn survivors_are_unique_and_disjoint_from_history() {
        let seen: HashSet<String> = ["A".to_string(), "B".to_string()].into();
        let outcome = dedupe(&seen, batch(&["A", "C", "C"], &["D", "B", "C"], &["E", "D", "F"]));

        let mut all: Vec<&str> = outcome.kept.iter().flat_map(|(_, f)| urls(f)).collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total);
        assert!(all.iter().all(|u| !seen.contains(*u)));
    }

    #[test]
    fn findings_without_url_are_dropped() {
        let mut input = batch(&["A"], &[], &[]);
        input.media[0].source_url = None;
        let outcome = dedupe(&HashSet::new(), input);
        assert!(outcome.kept.media.is_empty());
        assert_eq!(outcome.dropped, 1);
    }

    #[test]
    fn existing_urls_spans_all_groups() {
        let doc = FindingsDocument {
            meta: FindingsMeta {
                year: 2024,
                month: 3,
                generated_at: None,
                extra: Map::new(),
            },
            agent_results: vec![
                ResultGroup::Existing(json!({
                    "agent_name": "KCIF",
                    "findings": [
                        {"title": "a", "source_url": "A"},
                        {"title": "no url", "source_url": null},
                    ],
                })),
                ResultGroup::Appended(AgentResult {
                    agent_name: "WebSearch-Media".into(),
                    findings: vec![finding("B", Category::Media), {
                        let mut f = finding("unused", Category::Media);
                        f.source_url = None;
                        f
                    }],
                    search_queries: vec![],
                    error: None,
                }),
            ],
            extra: Map::new(),
        };

        let seen = existing_urls(&doc);
        assert_eq!(seen.len(), 2);
        assert!(seen.contains("A"));
        assert!(seen.contains("B"));
    }
}
