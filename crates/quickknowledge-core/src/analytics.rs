//! Search-log analytics.
//!
//! Reduces raw search events to a ranked top-N per keyword over a trailing
//! window. How many log entries get fetched is the store's concern; this
//! module works on whatever slice it is given.

use std::collections::HashMap;

use crate::models::{KeywordStat, SearchLogEntry};

const SECONDS_PER_DAY: i64 = 86_400;

/// Aggregate `entries` into at most `top_n` keyword stats.
///
/// Keeps entries with `timestamp >= now - window_days` (inclusive), groups
/// them by exact keyword, and sorts by count descending. Groups with equal
/// counts keep the order in which their keyword was first encountered.
pub fn aggregate_search_logs(
    entries: &[SearchLogEntry],
    now: i64,
    window_days: u32,
    top_n: usize,
) -> Vec<KeywordStat> {
    let cutoff = now - i64::from(window_days) * SECONDS_PER_DAY;

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut stats: Vec<KeywordStat> = Vec::new();

    for entry in entries.iter().filter(|e| e.timestamp >= cutoff) {
        match index.get(entry.keyword.as_str()) {
            Some(&i) => {
                let stat = &mut stats[i];
                stat.count += 1;
                stat.last_search = stat.last_search.max(entry.timestamp);
            }
            None => {
                index.insert(entry.keyword.as_str(), stats.len());
                stats.push(KeywordStat {
                    keyword: entry.keyword.clone(),
                    count: 1,
                    last_search: entry.timestamp,
                });
            }
        }
    }

    // sort_by is stable: ties stay in encounter order
    stats.sort_by(|a, b| b.count.cmp(&a.count));
    stats.truncate(top_n);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn entry(keyword: &str, days_ago: i64) -> SearchLogEntry {
        SearchLogEntry {
            keyword: keyword.to_string(),
            timestamp: NOW - days_ago * SECONDS_PER_DAY,
        }
    }

    #[test]
    fn window_excludes_old_entries() {
        let entries: Vec<SearchLogEntry> = [0, 5, 29, 31, 40]
            .iter()
            .map(|d| entry(&format!("k{}", d), *d))
            .collect();
        let stats = aggregate_search_logs(&entries, NOW, 30, 10);
        let keywords: Vec<&str> = stats.iter().map(|s| s.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["k0", "k5", "k29"]);
    }

    #[test]
    fn window_lower_bound_is_inclusive() {
        let stats = aggregate_search_logs(&[entry("edge", 30)], NOW, 30, 10);
        assert_eq!(stats.len(), 1);
    }

    #[test]
    fn ranks_by_count_with_last_search() {
        let mut entries = Vec::new();
        for d in [1, 2, 3] {
            entries.push(entry("vpn", d));
        }
        for d in [9, 4, 7, 2, 8] {
            entries.push(entry("wifi", d));
        }
        let stats = aggregate_search_logs(&entries, NOW, 30, 10);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].keyword, "wifi");
        assert_eq!(stats[0].count, 5);
        assert_eq!(stats[0].last_search, NOW - 2 * SECONDS_PER_DAY);
        assert_eq!(stats[1].keyword, "vpn");
        assert_eq!(stats[1].count, 3);
        assert_eq!(stats[1].last_search, NOW - SECONDS_PER_DAY);
    }

    #[test]
    fn ties_keep_encounter_order_and_truncate() {
        let entries = vec![
            entry("b", 1),
            entry("a", 1),
            entry("c", 1),
            entry("a", 2),
            entry("b", 2),
        ];
        let stats = aggregate_search_logs(&entries, NOW, 30, 2);
        let keywords: Vec<&str> = stats.iter().map(|s| s.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["b", "a"]);
    }

    #[test]
    fn keywords_are_not_normalized() {
        let entries = vec![entry("WiFi", 1), entry("wifi", 1)];
        assert_eq!(aggregate_search_logs(&entries, NOW, 30, 10).len(), 2);
    }

    #[test]
    fn empty_window_is_empty_not_error() {
        assert!(aggregate_search_logs(&[], NOW, 30, 10).is_empty());
        assert!(aggregate_search_logs(&[entry("old", 90)], NOW, 30, 10).is_empty());
    }
}
