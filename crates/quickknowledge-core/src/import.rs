//! Header-driven mapping from parsed CSV rows to [`ImportRow`]s.
//!
//! The header row decides which column feeds which field. Header cells are
//! trimmed and lower-cased; `question`, `answer`, `category` and `tags`
//! are recognized, anything else is ignored. Rows missing a question or an
//! answer are skipped and counted rather than failing the batch.

use tracing::{debug, warn};

use crate::csv;
use crate::error::{FaqError, FaqResult};
use crate::models::ImportRow;

/// Rows accepted from one import session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBatch {
    /// Accepted rows in file order.
    pub rows: Vec<ImportRow>,
    /// Data rows dropped for lacking a question or an answer.
    pub skipped: usize,
}

impl ImportBatch {
    /// The first `n` rows, for a confirmation preview.
    pub fn preview(&self, n: usize) -> &[ImportRow] {
        &self.rows[..self.rows.len().min(n)]
    }
}

/// Map a header row and data rows into import rows.
///
/// Fails only when there is no header or no data rows at all.
pub fn map_rows(header: Option<&[String]>, data_rows: &[Vec<String>]) -> FaqResult<ImportBatch> {
    let header = match header {
        Some(h) if !h.is_empty() => h,
        _ => return Err(FaqError::validation("no data: the header row is missing")),
    };
    if data_rows.is_empty() {
        return Err(FaqError::validation(
            "no data: a header row and at least one data row are required",
        ));
    }

    let keys: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
    debug!(columns = ?keys, "import header");

    let mut batch = ImportBatch::default();
    for (i, cells) in data_rows.iter().enumerate() {
        let row = map_row(&keys, cells);
        if row.question.is_empty() || row.answer.is_empty() {
            // +2: one for the header, one for 1-based line numbers
            warn!(row = i + 2, "skipping row without question or answer");
            batch.skipped += 1;
            continue;
        }
        batch.rows.push(row);
    }

    Ok(batch)
}

fn map_row(keys: &[String], cells: &[String]) -> ImportRow {
    let mut row = ImportRow::default();
    for (idx, key) in keys.iter().enumerate() {
        let value = cells.get(idx).map(String::as_str).unwrap_or("");
        match key.as_str() {
            "question" => row.question = value.to_string(),
            "answer" => row.answer = value.to_string(),
            "category" => row.category = value.to_string(),
            "tags" => row.tags = split_tags(value),
            _ => {}
        }
    }
    row
}

/// Tags in a CSV cell are separated by runs of whitespace.
pub fn split_tags(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}

/// Full import pipeline for raw file text: BOM strip, line-ending
/// normalization, parse, map.
///
/// On top of [`map_rows`], rejects a file whose rows were all skipped,
/// since there is nothing to commit.
pub fn parse_import(text: &str) -> FaqResult<ImportBatch> {
    let normalized = csv::normalize_line_endings(csv::strip_bom(text));
    let rows = csv::parse(&normalized);
    debug!(rows = rows.len(), "parsed import file");

    if rows.len() < 2 {
        return Err(FaqError::validation(
            "no data: a header row and at least one data row are required",
        ));
    }

    let (header, data) = rows.split_at(1);
    let batch = map_rows(header.first().map(Vec::as_slice), data)?;

    if batch.rows.is_empty() {
        return Err(FaqError::validation(
            "no valid rows: check the question and answer headers",
        ));
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn skips_rows_missing_required_fields() {
        let header = strings(&["question", "answer", "category"]);
        let data = vec![
            strings(&["q1", "a1", "IT"]),
            strings(&["", "a2", "IT"]),
            strings(&["q3", "a3", ""]),
            strings(&["q4", "", "HR"]),
            strings(&["q5", "a5", "HR"]),
        ];
        let batch = map_rows(Some(&header), &data).unwrap();
        assert_eq!(batch.rows.len(), 3);
        assert_eq!(batch.skipped, 2);
        let questions: Vec<&str> = batch.rows.iter().map(|r| r.question.as_str()).collect();
        assert_eq!(questions, vec!["q1", "q3", "q5"]);
    }

    #[test]
    fn headers_are_case_insensitive_and_unknown_ignored() {
        let header = strings(&[" Question ", "ANSWER", "owner", "", "Tags"]);
        let data = vec![strings(&["q", "a", "bob", "zzz", "  vpn   remote  "])];
        let batch = map_rows(Some(&header), &data).unwrap();
        let row = &batch.rows[0];
        assert_eq!(row.question, "q");
        assert_eq!(row.answer, "a");
        assert_eq!(row.category, "");
        assert_eq!(row.tags, vec!["vpn", "remote"]);
    }

    #[test]
    fn missing_trailing_cells_default_to_empty() {
        let header = strings(&["question", "answer", "category", "tags"]);
        let data = vec![strings(&["q", "a"])];
        let batch = map_rows(Some(&header), &data).unwrap();
        assert_eq!(batch.rows[0].category, "");
        assert!(batch.rows[0].tags.is_empty());
    }

    #[test]
    fn no_header_or_no_data_is_validation_error() {
        assert!(matches!(map_rows(None, &[]), Err(FaqError::Validation(_))));
        let header = strings(&["question", "answer"]);
        assert!(matches!(
            map_rows(Some(&header), &[]),
            Err(FaqError::Validation(_))
        ));
    }

    #[test]
    fn parse_import_handles_bom_and_crlf() {
        let text = "\u{FEFF}question,answer,tags\r\n\"Where, exactly?\",\"Line 1\r\nLine 2\",a b\r\n";
        let batch = parse_import(text).unwrap();
        assert_eq!(batch.rows.len(), 1);
        assert_eq!(batch.rows[0].question, "Where, exactly?");
        assert_eq!(batch.rows[0].answer, "Line 1\nLine 2");
        assert_eq!(batch.rows[0].tags, vec!["a", "b"]);
    }

    #[test]
    fn parse_import_rejects_header_only_and_all_skipped() {
        assert!(matches!(
            parse_import("question,answer\n"),
            Err(FaqError::Validation(_))
        ));
        assert!(matches!(parse_import(""), Err(FaqError::Validation(_))));
        assert!(matches!(
            parse_import("title,body\nx,y\n"),
            Err(FaqError::Validation(_))
        ));
    }

    #[test]
    fn preview_is_bounded() {
        let text = "question,answer\n1,a\n2,a\n3,a\n";
        let batch = parse_import(text).unwrap();
        assert_eq!(batch.preview(2).len(), 2);
        assert_eq!(batch.preview(10).len(), 3);
    }
}
