//! Sequential bulk operations with per-item tallies.
//!
//! Each store call is awaited before the next one starts, so a failure
//! part-way through leaves a well-defined prefix committed. A failed item
//! is logged and counted; it never stops the loop.

use anyhow::Result;
use serde::Serialize;
use tracing::warn;

use crate::models::{FaqDraft, ImportRow};
use crate::store::FaqStore;

/// Outcome of a batch: how many items went through and how many did not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    fn tally<T>(&mut self, outcome: &Result<T>) {
        if outcome.is_ok() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

/// Create one record per row, in order.
pub async fn import_rows<S: FaqStore + ?Sized>(store: &S, rows: &[ImportRow]) -> BatchReport {
    let mut report = BatchReport::default();
    for (i, row) in rows.iter().enumerate() {
        let draft = FaqDraft::from(row.clone());
        let outcome = store.create(&draft).await;
        if let Err(e) = &outcome {
            warn!(row = i + 1, question = %row.question, error = %e, "import row failed");
        }
        report.tally(&outcome);
    }
    report
}

/// Delete the given ids, in order.
pub async fn delete_ids<S: FaqStore + ?Sized>(store: &S, ids: &[String]) -> BatchReport {
    let mut report = BatchReport::default();
    for id in ids {
        let outcome = store.delete(id).await;
        if let Err(e) = &outcome {
            warn!(id = %id, error = %e, "delete failed");
        }
        report.tally(&outcome);
    }
    report
}

/// Delete every record currently in the store.
///
/// Fails only if the initial listing fails; individual deletes are tallied.
pub async fn delete_all<S: FaqStore + ?Sized>(store: &S) -> Result<BatchReport> {
    let ids: Vec<String> = store.get_all().await?.into_iter().map(|r| r.id).collect();
    Ok(delete_ids(store, &ids).await)
}
