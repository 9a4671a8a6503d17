//! View and helpful counters.
//!
//! Both go through [`FaqStore::increment`], which treats a missing counter
//! as zero, so there is no separate "initialize then retry" path. View
//! bumps are best-effort. A helpful vote is remembered locally only once
//! the store has accepted it.

use serde::Serialize;
use tracing::warn;

use crate::error::{FaqError, FaqResult};
use crate::models::Counter;
use crate::prefs::{KeyValueStore, LocalPreferences};
use crate::store::FaqStore;

/// Count a view. Failures are logged and swallowed.
pub async fn record_view<S: FaqStore + ?Sized>(store: &S, id: &str) -> Option<i64> {
    match store.increment(id, Counter::View).await {
        Ok(count) => Some(count),
        Err(e) => {
            warn!(id = %id, error = %e, "view count update failed");
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "helpful_count", rename_all = "snake_case")]
pub enum VoteOutcome {
    /// The vote was counted; carries the new total.
    Recorded(i64),
    /// This client already voted for the record.
    AlreadyVoted,
}

/// Cast a helpful vote for `id` from this client.
pub async fn vote_helpful<S, K>(
    store: &S,
    prefs: &LocalPreferences<K>,
    id: &str,
) -> FaqResult<VoteOutcome>
where
    S: FaqStore + ?Sized,
    K: KeyValueStore,
{
    if prefs.has_voted(id) {
        return Ok(VoteOutcome::AlreadyVoted);
    }

    let count = store
        .increment(id, Counter::Helpful)
        .await
        .map_err(|e| FaqError::backend(&e))?;

    if let Err(e) = prefs.mark_voted(id) {
        warn!(id = %id, error = %e, "could not persist helpful vote locally");
    }
    Ok(VoteOutcome::Recorded(count))
}
