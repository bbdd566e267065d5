//! Builds the three web-search result groups and appends them to a document.

use macrofind_shared::{AgentResult, CategoryMap, Finding, FindingsDocument, ResultGroup};

use crate::queries::QuerySet;

/// One result group per category, in Media, Institutional, Data order.
///
/// A category with no surviving findings still yields a group carrying its
/// queries.
pub fn build_groups(queries: &QuerySet, kept: CategoryMap<Vec<Finding>>) -> Vec<AgentResult> {
    kept.into_pairs()
        .into_iter()
        .map(|(category, findings)| AgentResult {
            agent_name: category.agent_name().to_string(),
            findings,
            search_queries: queries.for_category(category).to_vec(),
            error: None,
        })
        .collect()
}

/// Append `groups` after the existing result groups. Earlier groups are
/// left untouched.
pub fn append_groups(doc: &mut FindingsDocument, groups: Vec<AgentResult>) {
    doc.agent_results
        .extend(groups.into_iter().map(ResultGroup::Appended));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::derive_queries;
    use macrofind_shared::{Category, FindingsMeta};
    use serde_json::{Map, json};

    fn finding(url: &str) -> Finding {
        Finding {
            title: "t".into(),
            summary: "s".into(),
            source_url: Some(url.into()),
            source_name: "example.com".into(),
            published_date: None,
            relevance_score: 0.5,
            category: Category::Media.label().into(),
        }
    }

    fn doc_with(groups: Vec<ResultGroup>) -> FindingsDocument {
        FindingsDocument {
            meta: FindingsMeta {
                year: 2024,
                month: 3,
                generated_at: None,
                extra: Map::new(),
            },
            agent_results: groups,
            extra: Map::new(),
        }
    }

    #[test]
    fn builds_three_groups_even_when_empty() {
        let queries = derive_queries(2024, 3).unwrap();
        let kept = CategoryMap {
            media: vec![finding("https://example.com/a")],
            institutional: vec![],
            data: vec![],
        };

        let groups = build_groups(&queries, kept);
        let names: Vec<_> = groups.iter().map(|g| g.agent_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "WebSearch-Media",
                "WebSearch-Institutional",
                "WebSearch-Data"
            ]
        );
        assert_eq!(groups[0].findings.len(), 1);
        assert!(groups[1].findings.is_empty());
        assert!(groups[2].findings.is_empty());
        for (group, category) in groups.iter().zip(Category::ALL) {
            assert_eq!(group.search_queries, queries.for_category(category));
            assert!(group.error.is_none());
        }
    }

    #[test]
    fn append_preserves_existing_groups() {
        let existing = ResultGroup::Existing(json!({
            "agent_name": "KCIF",
            "findings": [{"title": "t", "source_url": "https://ecb.europa.eu/x"}],
            "error": "partial",
        }));
        let mut doc = doc_with(vec![existing.clone()]);
        let queries = derive_queries(2024, 3).unwrap();

        append_groups(&mut doc, build_groups(&queries, CategoryMap::default()));

        assert_eq!(doc.agent_results.len(), 4);
        assert_eq!(doc.agent_results[0], existing);
        assert_eq!(doc.agent_results[3].agent_name(), Some("WebSearch-Data"));
    }

    #[test]
    fn repeated_runs_always_append() {
        let mut doc = doc_with(vec![]);
        let queries = derive_queries(2024, 3).unwrap();

        append_groups(&mut doc, build_groups(&queries, CategoryMap::default()));
        append_groups(&mut doc, build_groups(&queries, CategoryMap::default()));

        assert_eq!(doc.agent_results.len(), 6);
        assert_eq!(doc.agent_results[3].agent_name(), Some("WebSearch-Media"));
    }
}
