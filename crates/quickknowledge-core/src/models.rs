//! Core data models used throughout QuickKnowledge.
//!
//! Timestamps are Unix seconds assigned by the store at write time. The
//! core only compares and formats them.

use serde::{Deserialize, Serialize};

use crate::error::{FaqError, FaqResult};

/// One FAQ entry as held by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqRecord {
    pub id: String,
    pub question: String,
    /// Markdown source.
    pub answer: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub view_count: i64,
    #[serde(default)]
    pub helpful_count: i64,
    pub updated_at: i64,
}

impl FaqRecord {
    /// Current value of a counter field.
    pub fn counter(&self, counter: Counter) -> i64 {
        match counter {
            Counter::View => self.view_count,
            Counter::Helpful => self.helpful_count,
        }
    }

    pub fn draft(&self) -> FaqDraft {
        FaqDraft {
            question: self.question.clone(),
            answer: self.answer.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
        }
    }
}

/// Migrate-on-read for counters: records written before a counter existed
/// carry no value for it, which reads as zero.
pub fn counter_or_zero(raw: Option<i64>) -> i64 {
    raw.unwrap_or(0).max(0)
}

/// The editable fields of a record. Create and update both take a full
/// draft; update overwrites every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqDraft {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl FaqDraft {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            self.push_tag(tag);
        }
        self
    }

    /// Add a tag the way the admin tag editor does: trimmed, blank and
    /// duplicate literals rejected. Returns `true` if the tag was added.
    pub fn push_tag(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|t| t == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    /// Presence check on the required fields.
    pub fn validate(&self) -> FaqResult<()> {
        if self.question.trim().is_empty() {
            return Err(FaqError::validation("question must not be empty"));
        }
        if self.answer.trim().is_empty() {
            return Err(FaqError::validation("answer must not be empty"));
        }
        Ok(())
    }
}

/// Counter fields that support an atomic increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    View,
    Helpful,
}

impl Counter {
    pub fn column(self) -> &'static str {
        match self {
            Counter::View => "view_count",
            Counter::Helpful => "helpful_count",
        }
    }
}

/// One user-confirmed search, as logged for analytics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLogEntry {
    pub keyword: String,
    pub timestamp: i64,
}

/// Per-keyword aggregate over a trailing window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordStat {
    pub keyword: String,
    pub count: usize,
    pub last_search: i64,
}

/// One mapped CSV data row, alive only for the import session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportRow {
    pub question: String,
    pub answer: String,
    pub category: String,
    pub tags: Vec<String>,
}

impl From<ImportRow> for FaqDraft {
    fn from(row: ImportRow) -> Self {
        FaqDraft {
            question: row.question,
            answer: row.answer,
            category: row.category,
            tags: row.tags,
        }
    }
}

/// A registered administrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminEntry {
    pub email: String,
    pub added_at: i64,
    pub added_by: String,
}

/// Format a Unix timestamp as ISO 8601.
pub fn format_ts_iso(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
        .unwrap_or_else(|| ts.to_string())
}
