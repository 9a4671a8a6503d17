//! CSV import.
//!
//! The file is parsed and mapped up front. Nothing is written until the
//! whole file has been validated; then rows are created one at a time and
//! tallied.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

use quickknowledge_core::batch::{self, BatchReport};
use quickknowledge_core::import::{self, ImportBatch};
use quickknowledge_core::store::FaqStore;
use quickknowledge_core::FaqResult;

use crate::context::AppContext;

const PREVIEW_ROWS: usize = 5;

/// Result of a committed import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub imported: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl ImportSummary {
    fn new(batch: &ImportBatch, report: BatchReport) -> Self {
        Self {
            imported: report.succeeded,
            failed: report.failed,
            skipped: batch.skipped,
        }
    }
}

/// Parse `text` and create a record for every accepted row.
pub async fn import_text<S: FaqStore + ?Sized>(store: &S, text: &str) -> FaqResult<ImportSummary> {
    let batch = import::parse_import(text)?;
    let report = batch::import_rows(store, &batch.rows).await;
    Ok(ImportSummary::new(&batch, report))
}

pub async fn run_import(ctx: &AppContext, path: &Path, dry_run: bool) -> Result<()> {
    ctx.require_admin()?;

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {}", path.display()))?;
    let batch = import::parse_import(&text)?;

    println!("Import: {}", path.display());
    println!(
        "  {} rows ready, {} skipped (missing question or answer)",
        batch.rows.len(),
        batch.skipped
    );
    println!();
    println!("  {:<40} {:<16} {}", "QUESTION", "CATEGORY", "TAGS");
    println!("  {}", "-".repeat(72));
    for row in batch.preview(PREVIEW_ROWS) {
        println!(
            "  {:<40} {:<16} {}",
            truncate(&row.question, 40),
            truncate(&row.category, 16),
            row.tags.join(" ")
        );
    }
    if batch.rows.len() > PREVIEW_ROWS {
        println!("  ... and {} more", batch.rows.len() - PREVIEW_ROWS);
    }
    println!();

    if dry_run {
        println!("Dry run: nothing written.");
        return Ok(());
    }

    let report = batch::import_rows(ctx.store.as_ref(), &batch.rows).await;
    let summary = ImportSummary::new(&batch, report);
    if summary.failed == 0 {
        println!("Imported {} FAQs.", summary.imported);
    } else {
        println!(
            "Imported {} FAQs, {} failed.",
            summary.imported, summary.failed
        );
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let cut: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut)
}
