//! Search query derivation from the document's year and month.
//!
//! Every query is a fixed template. Placeholders:
//! `{year}`, `{month}`, `{month:02}`, `{month_name}` (English) and
//! `{quarter}` (`(month - 1) / 3 + 1`).

use chrono::Month;

use macrofind_shared::{Category, CategoryMap, MacroFindError, Result};

/// Number of queries issued per category.
pub const QUERIES_PER_CATEGORY: usize = 6;

const MEDIA_TEMPLATES: [&str; QUERIES_PER_CATEGORY] = [
    "유럽 경제 동향 {year}년 {month}월",
    "유로존 경기 전망 {year}",
    "ECB 금리 결정 {year} {month}월",
    "eurozone economy {month_name} {year}",
    "ECB rate decision {month_name} {year}",
    "Europe economic outlook {year}",
];

const INSTITUTIONAL_TEMPLATES: [&str; QUERIES_PER_CATEGORY] = [
    "site:ecb.europa.eu monetary policy decision {year}",
    "site:imf.org euro area outlook {year}",
    "site:bis.org european financial stability {year}",
    "site:oecd.org euro area economic survey {year}",
    "ECB press conference {year} {month:02}",
    "Eurostat GDP inflation {month_name} {year}",
];

const DATA_TEMPLATES: [&str; QUERIES_PER_CATEGORY] = [
    "eurozone PMI {year} {month:02}",
    "eurozone CPI inflation rate {month_name} {year}",
    "eurozone GDP growth Q{quarter} {year}",
    "eurozone unemployment rate {year}",
    "유로존 소비자물가 {year}년 {month}월",
    "유로존 경제성장률 GDP {year}",
];

fn templates(category: Category) -> &'static [&'static str; QUERIES_PER_CATEGORY] {
    match category {
        Category::Media => &MEDIA_TEMPLATES,
        Category::Institutional => &INSTITUTIONAL_TEMPLATES,
        Category::Data => &DATA_TEMPLATES,
    }
}

/// The ordered queries for one enrichment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySet {
    pub year: i32,
    pub month: u32,
    pub quarter: u32,
    pub queries: CategoryMap<Vec<String>>,
}

impl QuerySet {
    pub fn for_category(&self, category: Category) -> &[String] {
        self.queries.get(category)
    }

    /// All queries as `(category, query)` in category order.
    pub fn iter(&self) -> impl Iterator<Item = (Category, &str)> {
        self.queries
            .iter()
            .flat_map(|(c, qs)| qs.iter().map(move |q| (c, q.as_str())))
    }

    pub fn len(&self) -> usize {
        self.queries.iter().map(|(_, qs)| qs.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Calendar quarter (1–4) of a valid month.
pub fn quarter_of(month: u32) -> u32 {
    (month - 1) / 3 + 1
}

/// Derive the three query lists for `year`/`month`.
///
/// Fails with [`MacroFindError::InvalidDate`] when `month` is outside 1–12.
pub fn derive_queries(year: i32, month: i32) -> Result<QuerySet> {
    let month_enum = u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or(MacroFindError::InvalidDate { year, month })?;

    let month = month_enum.number_from_month();
    let quarter = quarter_of(month);
    let ctx = TemplateContext {
        year,
        month,
        month_name: month_enum.name(),
        quarter,
    };

    let queries: CategoryMap<Vec<String>> =
        CategoryMap::from_fn(|c| templates(c).iter().map(|t| ctx.render(t)).collect());

    Ok(QuerySet {
        year,
        month,
        quarter,
        queries,
    })
}

struct TemplateContext {
    year: i32,
    month: u32,
    month_name: &'static str,
    quarter: u32,
}

impl TemplateContext {
    fn render(&self, template: &str) -> String {
        template
            .replace("{year}", &self.year.to_string())
            .replace("{month:02}", &format!("{:02}", self.month))
            .replace("{month}", &self.month.to_string())
            .replace("{month_name}", self.month_name)
            .replace("{quarter}", &self.quarter.to_string())
    }
}
