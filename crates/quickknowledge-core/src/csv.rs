//! CSV codec for FAQ import and export.
//!
//! The parser is a two-state automaton (unquoted / quoted) over a single
//! character stream, so quoted fields may span lines. It never fails:
//! malformed quoting degrades to an implicit close at end of input.
//!
//! The serializer writes a header row, one row per record, and prefixes
//! the output with a UTF-8 byte-order mark so spreadsheet tools pick the
//! right encoding.
//!
//! ```
//! use quickknowledge_core::csv::parse;
//!
//! let rows = parse("a,\"b,c\",d\n");
//! assert_eq!(rows, vec![vec!["a", "b,c", "d"]]);
//! ```

use chrono::NaiveDate;

/// The byte-order mark written at the start of every export.
pub const BOM: char = '\u{FEFF}';

/// Column order for FAQ exports.
pub const EXPORT_COLUMNS: [&str; 4] = ["question", "answer", "category", "tags"];

/// Replace `\r\n` and lone `\r` with `\n`. Callers apply this before
/// [`parse`], which only treats `\n` as a row terminator.
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Drop a leading byte-order mark, if any.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Unquoted,
    Quoted,
}

/// Parse delimited text into rows of trimmed fields.
///
/// Rows whose fields are all empty are dropped. A comma or newline inside
/// quotes belongs to the field; `""` inside quotes is a literal quote.
pub fn parse(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut state = State::Unquoted;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Quoted => {
                if c == '"' {
                    if chars.peek() == Some(&'"') {
                        field.push('"');
                        chars.next();
                    } else {
                        state = State::Unquoted;
                    }
                } else {
                    field.push(c);
                }
            }
            State::Unquoted => match c {
                '"' => state = State::Quoted,
                ',' => row.push(take_field(&mut field)),
                '\n' => {
                    row.push(take_field(&mut field));
                    flush_row(&mut rows, &mut row);
                }
                _ => field.push(c),
            },
        }
    }

    // An open quote at end of input closes implicitly.
    row.push(take_field(&mut field));
    flush_row(&mut rows, &mut row);

    rows
}

fn take_field(field: &mut String) -> String {
    let value = field.trim().to_string();
    field.clear();
    value
}

fn flush_row(rows: &mut Vec<Vec<String>>, row: &mut Vec<String>) {
    let current = std::mem::take(row);
    if current.iter().any(|f| !f.is_empty()) {
        rows.push(current);
    }
}

/// A single cell value as exposed by a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsvField {
    Text(String),
    /// Joined with a single space on output.
    List(Vec<String>),
    Missing,
}

/// Anything that can be written as a CSV row by column name.
pub trait CsvRecord {
    fn field(&self, column: &str) -> CsvField;
}

impl CsvRecord for crate::models::FaqRecord {
    fn field(&self, column: &str) -> CsvField {
        match column {
            "id" => CsvField::Text(self.id.clone()),
            "question" => CsvField::Text(self.question.clone()),
            "answer" => CsvField::Text(self.answer.clone()),
            "category" => CsvField::Text(self.category.clone()),
            "tags" => CsvField::List(self.tags.clone()),
            "view_count" => CsvField::Text(self.view_count.to_string()),
            "helpful_count" => CsvField::Text(self.helpful_count.to_string()),
            "updated_at" => CsvField::Text(crate::models::format_ts_iso(self.updated_at)),
            _ => CsvField::Missing,
        }
    }
}

impl CsvRecord for crate::models::ImportRow {
    fn field(&self, column: &str) -> CsvField {
        match column {
            "question" => CsvField::Text(self.question.clone()),
            "answer" => CsvField::Text(self.answer.clone()),
            "category" => CsvField::Text(self.category.clone()),
            "tags" => CsvField::List(self.tags.clone()),
            _ => CsvField::Missing,
        }
    }
}

/// Quote a value if it contains a comma, double quote, or newline.
pub fn escape_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn render_field(field: CsvField) -> String {
    let raw = match field {
        CsvField::Text(s) => s,
        CsvField::List(items) => items.join(" "),
        CsvField::Missing => String::new(),
    };
    escape_field(&raw)
}

/// Serialize records under the given column list.
///
/// Output starts with [`BOM`], then the header row, then one
/// `\n`-terminated row per record.
pub fn serialize<R: CsvRecord>(records: &[R], columns: &[&str]) -> String {
    let mut out = String::new();
    out.push(BOM);
    out.push_str(&columns.join(","));
    out.push('\n');

    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|col| render_field(record.field(col)))
            .collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Download name for an export taken on `date`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("faq_export_{}.csv", date.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FaqRecord;

    fn record(question: &str, answer: &str, category: &str, tags: &[&str]) -> FaqRecord {
        FaqRecord {
            id: "id".to_string(),
            question: question.to_string(),
            answer: answer.to_string(),
            category: category.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            view_count: 0,
            helpful_count: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn quoted_comma_stays_in_field() {
        assert_eq!(parse("a,\"b,c\",d\n"), vec![vec!["a", "b,c", "d"]]);
    }

    #[test]
    fn doubled_quotes_are_literal() {
        assert_eq!(
            parse("\"he said \"\"hi\"\"\",x\n"),
            vec![vec!["he said \"hi\"", "x"]]
        );
    }

    #[test]
    fn blank_lines_are_dropped() {
        let rows = parse("a,b\n\n\nc,d\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn comma_only_line_is_blank() {
        let rows = parse("a,b\n , \nc,d");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn empty_input_yields_no_rows() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n").is_empty());
    }

    #[test]
    fn newline_inside_quotes() {
        let rows = parse("q,a\n\"line one\nline two\",x\n");
        assert_eq!(rows[1], vec!["line one\nline two", "x"]);
    }

    #[test]
    fn unterminated_quote_closes_at_end() {
        let rows = parse("a,\"open field,\nstill open");
        assert_eq!(rows, vec![vec!["a", "open field,\nstill open"]]);
    }

    #[test]
    fn fields_are_trimmed_and_last_row_flushed() {
        assert_eq!(parse("  a ,b  \n c,d"), vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn normalize_and_strip() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
        assert_eq!(strip_bom("\u{FEFF}question"), "question");
        assert_eq!(strip_bom("question"), "question");
    }

    #[test]
    fn serialize_prefixes_bom_bytes() {
        let out = serialize::<FaqRecord>(&[], &EXPORT_COLUMNS);
        assert_eq!(&out.as_bytes()[..3], &[0xEF, 0xBB, 0xBF]);
        assert_eq!(strip_bom(&out), "question,answer,category,tags\n");
    }

    #[test]
    fn export_escapes_category_and_joins_tags() {
        let rec = record("Q", "A", "IT, Network", &["a", "b c"]);
        let out = serialize(&[rec], &EXPORT_COLUMNS);
        let body = strip_bom(&out);
        assert_eq!(body, "question,answer,category,tags\nQ,A,\"IT, Network\",a b c\n");
    }

    #[test]
    fn missing_column_serializes_empty() {
        let rec = record("Q", "A", "", &[]);
        let out = serialize(&[rec], &["question", "nope", "tags"]);
        assert_eq!(strip_bom(&out), "question,nope,tags\nQ,,\n");
    }

    #[test]
    fn round_trip_preserves_awkward_values() {
        let records = vec![
            record("Commas, here?", "Yes, \"quoted\" too", "General", &["x", "y"]),
            record("Multi", "line one\nline two\n\nline four", "IT", &[]),
            record("Plain", "plain", "", &["solo"]),
        ];
        let out = serialize(&records, &EXPORT_COLUMNS);
        let rows = parse(&normalize_line_endings(strip_bom(&out)));

        assert_eq!(rows.len(), records.len() + 1);
        assert_eq!(rows[0], EXPORT_COLUMNS.to_vec());
        for (row, rec) in rows[1..].iter().zip(&records) {
            assert_eq!(row[0], rec.question);
            assert_eq!(row[1], rec.answer);
            assert_eq!(row[2], rec.category);
            assert_eq!(row[3], rec.tags.join(" "));
        }
    }

    #[test]
    fn filename_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_filename(date), "faq_export_2024-03-09.csv");
    }
}
