//! Read-only projections over the full record snapshot.
//!
//! Each projection recomputes from scratch; nothing is patched
//! incrementally.

use crate::models::FaqRecord;
use crate::prefs::PreferenceSet;

const SECONDS_PER_DAY: i64 = 86_400;

/// Top `limit` records by `updated_at`, newest first.
pub fn recent(records: &[FaqRecord], limit: usize) -> Vec<FaqRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    sorted.truncate(limit);
    sorted
}

/// Whether a record was updated within the trailing window.
pub fn is_new(record: &FaqRecord, now: i64, window_days: u32) -> bool {
    record.updated_at >= now - i64::from(window_days) * SECONDS_PER_DAY
}

/// Top `limit` by date, then only those inside the window.
///
/// The two steps run in sequence: a record outside the window is dropped
/// even if it made the top `limit`, and the list may come back shorter
/// than `limit`.
pub fn recent_within(
    records: &[FaqRecord],
    now: i64,
    window_days: u32,
    limit: usize,
) -> Vec<FaqRecord> {
    recent(records, limit)
        .into_iter()
        .filter(|r| is_new(r, now, window_days))
        .collect()
}

/// Most viewed first; records never viewed are left out.
pub fn popular(records: &[FaqRecord], limit: usize) -> Vec<FaqRecord> {
    let mut viewed: Vec<FaqRecord> = records
        .iter()
        .filter(|r| r.view_count > 0)
        .cloned()
        .collect();
    viewed.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    viewed.truncate(limit);
    viewed
}

/// Records whose id is in `favorites`, in snapshot order.
pub fn favorites(records: &[FaqRecord], favorites: &PreferenceSet) -> Vec<FaqRecord> {
    records
        .iter()
        .filter(|r| favorites.contains(&r.id))
        .cloned()
        .collect()
}
