//! Core domain types for MacroFind findings documents.
//!
//! A findings document is a `meta` envelope plus an ordered list of result
//! groups, one per producing agent. Fields this tool does not know about are
//! kept in `extra` maps so documents written by other stages survive a
//! read/write cycle.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// One of the three web-search research categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Media,
    Institutional,
    Data,
}

impl Category {
    /// All categories in their fixed processing and append order.
    pub const ALL: [Category; 3] = [Category::Media, Category::Institutional, Category::Data];

    /// Name of the result group this category produces.
    pub fn agent_name(self) -> &'static str {
        match self {
            Self::Media => "WebSearch-Media",
            Self::Institutional => "WebSearch-Institutional",
            Self::Data => "WebSearch-Data",
        }
    }

    /// Label stored in each finding's `category` field.
    pub fn label(self) -> &'static str {
        match self {
            Self::Media => "미디어",
            Self::Institutional => "기관보고서",
            Self::Data => "경제지표",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Media => "Media",
            Self::Institutional => "Institutional",
            Self::Data => "Data",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CategoryMap
// ---------------------------------------------------------------------------

/// One value per [`Category`], iterated in the fixed category order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMap<T> {
    pub media: T,
    pub institutional: T,
    pub data: T,
}

impl<T> CategoryMap<T> {
    /// Build a map by calling `f` once per category, in order.
    pub fn from_fn(mut f: impl FnMut(Category) -> T) -> Self {
        Self {
            media: f(Category::Media),
            institutional: f(Category::Institutional),
            data: f(Category::Data),
        }
    }

    pub fn get(&self, category: Category) -> &T {
        match category {
            Category::Media => &self.media,
            Category::Institutional => &self.institutional,
            Category::Data => &self.data,
        }
    }

    pub fn get_mut(&mut self, category: Category) -> &mut T {
        match category {
            Category::Media => &mut self.media,
            Category::Institutional => &mut self.institutional,
            Category::Data => &mut self.data,
        }
    }

    /// Iterate `(category, value)` pairs in Media, Institutional, Data order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    pub fn map<U>(&self, mut f: impl FnMut(Category, &T) -> U) -> CategoryMap<U> {
        CategoryMap::from_fn(|c| f(c, self.get(c)))
    }

    /// Consume the map into `(category, value)` pairs in category order.
    pub fn into_pairs(self) -> [(Category, T); 3] {
        [
            (Category::Media, self.media),
            (Category::Institutional, self.institutional),
            (Category::Data, self.data),
        ]
    }
}

// ---------------------------------------------------------------------------
// Finding
// ---------------------------------------------------------------------------

/// One discovered piece of evidence, as produced by web search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    /// Dedup key. Always present on findings this tool produces; older
    /// stages may have left it null.
    #[serde(default)]
    pub source_url: Option<String>,
    /// Host of `source_url`.
    #[serde(default)]
    pub source_name: String,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub relevance_score: f64,
    #[serde(default)]
    pub category: String,
}

// ---------------------------------------------------------------------------
// AgentResult
// ---------------------------------------------------------------------------

/// One batch of findings attributed to one producing agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    pub agent_name: String,
    #[serde(default)]
    pub findings: Vec<Finding>,
    #[serde(default)]
    pub search_queries: Vec<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// ---------------------------------------------------------------------------
// ResultGroup
// ---------------------------------------------------------------------------

/// An entry of `agent_results`.
///
/// Groups read from disk stay raw JSON and serialize back exactly as read.
/// Only groups appended during a run are typed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResultGroup {
    Existing(Value),
    Appended(AgentResult),
}

impl<'de> Deserialize<'de> for ResultGroup {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::Existing)
    }
}

impl ResultGroup {
    pub fn agent_name(&self) -> Option<&str> {
        match self {
            Self::Existing(value) => value.get("agent_name").and_then(Value::as_str),
            Self::Appended(group) => Some(group.agent_name.as_str()),
        }
    }

    pub fn finding_count(&self) -> usize {
        match self {
            Self::Existing(value) => raw_findings(value).count(),
            Self::Appended(group) => group.findings.len(),
        }
    }

    /// Every non-null `source_url` in this group, in finding order.
    pub fn source_urls(&self) -> Vec<&str> {
        match self {
            Self::Existing(value) => raw_findings(value)
                .filter_map(|f| f.get("source_url").and_then(Value::as_str))
                .collect(),
            Self::Appended(group) => group
                .findings
                .iter()
                .filter_map(|f| f.source_url.as_deref())
                .collect(),
        }
    }
}

fn raw_findings(group: &Value) -> impl Iterator<Item = &Value> {
    group
        .get("findings")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

// ---------------------------------------------------------------------------
// FindingsDocument
// ---------------------------------------------------------------------------

/// The `meta` envelope of a findings document.
///
/// Only the fields the pipeline reads or writes are typed; everything else,
/// `pipeline_version` included, is carried in `extra` unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingsMeta {
    pub year: i32,
    pub month: i32,
    /// Rewritten on every enrichment run.
    #[serde(default)]
    pub generated_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A complete findings document (`<year>-<month>-findings.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FindingsDocument {
    pub meta: FindingsMeta,
    #[serde(default)]
    pub agent_results: Vec<ResultGroup>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FindingsDocument {
    /// Total number of findings across all result groups.
    pub fn total_findings(&self) -> usize {
        self.agent_results.iter().map(ResultGroup::finding_count).sum()
    }

    /// Every non-null `source_url` in the document.
    pub fn source_urls(&self) -> impl Iterator<Item = &str> {
        self.agent_results.iter().flat_map(ResultGroup::source_urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
  "meta": {
    "year": 2024,
    "month": 3,
    "generated_at": "2024-03-01T09:00:00+00:00",
    "pipeline_version": "2.0",
    "operator": "batch"
  },
  "agent_results": [
    {
      "agent_name": "KCIF",
      "findings": [
        {
          "title": "ECB holds rates",
          "summary": "The ECB kept its policy rate unchanged.",
          "source_url": "https://ecb.europa.eu/x",
          "source_name": "ECB",
          "published_date": null,
          "relevance_score": 0.9,
          "category": "기관보고서",
          "pages": [3, 4]
        }
      ],
      "search_queries": [],
      "error": null
    }
  ]
}"#;

    #[test]
    fn category_order_and_names() {
        let names: Vec<_> = Category::ALL.iter().map(|c| c.agent_name()).collect();
        assert_eq!(
            names,
            vec![
                "WebSearch-Media",
                "WebSearch-Institutional",
                "WebSearch-Data"
            ]
        );
        assert_eq!(Category::Media.label(), "미디어");
        assert_eq!(Category::Institutional.label(), "기관보고서");
        assert_eq!(Category::Data.label(), "경제지표");
    }

    #[test]
    fn category_map_iterates_in_order() {
        let map = CategoryMap::from_fn(|c| c.as_str().len());
        let cats: Vec<_> = map.iter().map(|(c, _)| c).collect();
        assert_eq!(cats, Category::ALL.to_vec());
        assert_eq!(*map.get(Category::Institutional), "Institutional".len());
    }

    #[test]
    fn document_parses_and_keeps_unknown_fields() {
        let doc: FindingsDocument = serde_json::from_str(SAMPLE).expect("parse");
        assert_eq!(doc.meta.year, 2024);
        assert_eq!(doc.meta.month, 3);
        assert_eq!(doc.meta.extra["pipeline_version"], "2.0");
        assert_eq!(doc.meta.extra["operator"], "batch");
        assert_eq!(doc.agent_results.len(), 1);
        assert_eq!(doc.total_findings(), 1);
        assert_eq!(doc.agent_results[0].agent_name(), Some("KCIF"));
        assert_eq!(
            doc.source_urls().collect::<Vec<_>>(),
            vec!["https://ecb.europa.eu/x"]
        );

        let json = serde_json::to_string(&doc).expect("serialize");
        let reparsed: FindingsDocument = serde_json::from_str(&json).expect("reparse");
        assert_eq!(doc, reparsed);
    }

    #[test]
    fn existing_groups_serialize_as_read() {
        let input = serde_json::json!({
            "meta": {"year": 2024, "month": 3, "generated_at": null, "pipeline_version": null},
            "agent_results": [{
                "agent_name": "KCIF",
                "findings": [{
                    "title": "t",
                    "summary": "s",
                    "source_url": "https://ecb.europa.eu/x",
                    "relevance_score": 1
                }]
            }]
        });

        let doc: FindingsDocument = serde_json::from_value(input.clone()).expect("parse");
        let output = serde_json::to_value(&doc).expect("serialize");

        assert_eq!(output, input);
        assert!(output["meta"]["pipeline_version"].is_null());
        assert_eq!(
            output["agent_results"][0]["findings"][0]["relevance_score"].to_string(),
            "1"
        );
    }

    #[test]
    fn appended_groups_are_typed() {
        let mut doc: FindingsDocument =
            serde_json::from_str(r#"{"meta": {"year": 2024, "month": 3}}"#).expect("parse");
        doc.agent_results.push(ResultGroup::Appended(AgentResult {
            agent_name: Category::Data.agent_name().into(),
            findings: vec![],
            search_queries: vec!["eurozone PMI 2024 03".into()],
            error: None,
        }));

        let value = serde_json::to_value(&doc).expect("serialize");
        let group = &value["agent_results"][0];
        assert_eq!(group["agent_name"], "WebSearch-Data");
        assert_eq!(group["findings"], serde_json::json!([]));
        assert!(group["error"].is_null());
        assert_eq!(doc.total_findings(), 0);
    }

    #[test]
    fn document_requires_year_and_month() {
        let missing_month = r#"{"meta": {"year": 2024}, "agent_results": []}"#;
        assert!(serde_json::from_str::<FindingsDocument>(missing_month).is_err());

        let missing_meta = r#"{"agent_results": []}"#;
        assert!(serde_json::from_str::<FindingsDocument>(missing_meta).is_err());
    }

    #[test]
    fn finding_serializes_null_published_date() {
        let finding = Finding {
            title: "t".into(),
            summary: String::new(),
            source_url: Some("https://reuters.com/y".into()),
            source_name: "reuters.com".into(),
            published_date: None,
            relevance_score: 0.5,
            category: Category::Media.label().into(),
        };
        let value = serde_json::to_value(&finding).expect("serialize");
        assert!(value["published_date"].is_null());
        assert_eq!(value["category"], "미디어");
    }
}
