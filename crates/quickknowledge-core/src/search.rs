//! Keyword and category filtering over an in-memory record snapshot.
//!
//! Pure functions, no I/O. Output keeps the input order.
//!
//! - **Category**: exact, case-sensitive equality on `category`.
//! - **Keyword**: case-insensitive substring match against the question,
//!   the answer, or any tag. A blank keyword means "no keyword filter".
//!
//! Both filters compose with AND, so applying them in either order gives
//! the same result.

use serde::Deserialize;

use crate::models::FaqRecord;

/// Filter inputs as they arrive from a surface.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterQuery {
    #[serde(default, alias = "q")]
    pub keyword: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl FilterQuery {
    pub fn new(keyword: Option<&str>, category: Option<&str>) -> Self {
        Self {
            keyword: keyword.map(str::to_string),
            category: category.map(str::to_string),
        }
    }

    /// The trimmed keyword, or `None` when blank.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// The category, or `None` when blank ("all categories").
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    pub fn apply(&self, records: &[FaqRecord]) -> Vec<FaqRecord> {
        filter(records, self.keyword(), self.category())
    }
}

/// Whether `record` contains `needle_lower` in its question, answer or
/// any tag. `needle_lower` must already be lower-cased.
pub fn matches_keyword(record: &FaqRecord, needle_lower: &str) -> bool {
    record.question.to_lowercase().contains(needle_lower)
        || record.answer.to_lowercase().contains(needle_lower)
        || record
            .tags
            .iter()
            .any(|t| t.to_lowercase().contains(needle_lower))
}

/// Apply keyword and category filters, preserving order.
pub fn filter(
    records: &[FaqRecord],
    keyword: Option<&str>,
    category: Option<&str>,
) -> Vec<FaqRecord> {
    let needle = keyword
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_lowercase);

    records
        .iter()
        .filter(|r| category.map_or(true, |c| r.category == c))
        .filter(|r| needle.as_deref().map_or(true, |n| matches_keyword(r, n)))
        .cloned()
        .collect()
}

/// Distinct non-empty categories in first-seen order.
pub fn categories(records: &[FaqRecord]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for r in records {
        if !r.category.is_empty() && !seen.contains(&r.category) {
            seen.push(r.category.clone());
        }
    }
    seen
}
