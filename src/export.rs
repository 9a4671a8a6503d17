//! Export every FAQ as a BOM-prefixed UTF-8 CSV file.
//!
//! Columns are fixed (`question,answer,category,tags`) so an export can be
//! fed straight back into `qk import`.

use anyhow::Result;
use std::path::{Path, PathBuf};

use quickknowledge_core::csv::{self, EXPORT_COLUMNS};
use quickknowledge_core::store::FaqStore;

use crate::context::AppContext;

/// Render all records in store order. Returns the suggested file name and
/// the CSV text.
pub async fn export_csv<S: FaqStore + ?Sized>(store: &S) -> Result<(String, String, usize)> {
    let records = store.get_all().await?;
    let filename = csv::export_filename(chrono::Local::now().date_naive());
    let body = csv::serialize(&records, &EXPORT_COLUMNS);
    Ok((filename, body, records.len()))
}

/// Write the export to `output`, or to `faq_export_<date>.csv` in the
/// current directory.
pub async fn run_export(ctx: &AppContext, output: Option<&Path>) -> Result<()> {
    ctx.require_admin()?;

    let (filename, body, count) = export_csv(ctx.store.as_ref()).await?;
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(&filename));

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&path, body.as_bytes())?;
    println!("Exported {} FAQs to {}", count, path.display());

    Ok(())
}
