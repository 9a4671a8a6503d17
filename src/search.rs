//! Listing and keyword search commands.
//!
//! Filtering itself lives in `quickknowledge_core::search`; this module
//! loads records from the store, logs explicit searches, and prints
//! results. The same helpers back the HTTP `/faqs` and `/search` routes.

use anyhow::Result;
use tracing::warn;

use quickknowledge_core::models::FaqRecord;
use quickknowledge_core::search::{self as filter, FilterQuery};
use quickknowledge_core::store::{FaqStore, SearchLogStore};

use crate::context::AppContext;

/// Append a search log entry. Failures are logged and swallowed so a
/// broken log never hides results.
pub async fn log_search<L: SearchLogStore + ?Sized>(logs: &L, keyword: &str) {
    if let Err(e) = logs.append(keyword).await {
        warn!(keyword = %keyword, error = %e, "search log append failed");
    }
}

/// Load all records and apply `query`. When `log` is set and the query has
/// a keyword, the keyword is appended to the search log first.
pub async fn search_faqs<S>(store: &S, query: &FilterQuery, log: bool) -> Result<Vec<FaqRecord>>
where
    S: FaqStore + SearchLogStore + ?Sized,
{
    if log {
        if let Some(keyword) = query.keyword() {
            log_search(store, keyword).await;
        }
    }
    let records = store.get_all().await?;
    Ok(query.apply(&records))
}

pub async fn run_list(ctx: &AppContext, category: Option<String>) -> Result<()> {
    let query = FilterQuery::new(None, category.as_deref());
    let results = search_faqs(ctx.store.as_ref(), &query, false).await?;
    print_faqs(&results);
    Ok(())
}

pub async fn run_search(ctx: &AppContext, keyword: &str, category: Option<String>) -> Result<()> {
    let query = FilterQuery::new(Some(keyword), category.as_deref());
    let results = search_faqs(ctx.store.as_ref(), &query, true).await?;
    print_faqs(&results);
    Ok(())
}

pub async fn run_categories(ctx: &AppContext) -> Result<()> {
    let records = ctx.store.get_all().await?;
    let categories = filter::categories(&records);
    if categories.is_empty() {
        println!("No categories.");
        return Ok(());
    }
    for category in categories {
        let count = records.iter().filter(|r| r.category == category).count();
        println!("{:<24} {:>4}", category, count);
    }
    Ok(())
}

/// Print records as a numbered list.
pub fn print_faqs(records: &[FaqRecord]) {
    if records.is_empty() {
        println!("No results.");
        return;
    }

    for (i, record) in records.iter().enumerate() {
        let date = chrono::DateTime::from_timestamp(record.updated_at, 0)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let category = if record.category.is_empty() {
            "(uncategorized)"
        } else {
            record.category.as_str()
        };

        println!("{}. {} / {}", i + 1, category, record.question);
        println!("    updated: {}", date);
        if !record.tags.is_empty() {
            println!("    tags: {}", record.tags.join(", "));
        }
        println!(
            "    views: {}  helpful: {}",
            record.view_count, record.helpful_count
        );
        println!("    id: {}", record.id);
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickknowledge_core::store::memory::InMemoryStore;
    use quickknowledge_core::FaqDraft;

    #[tokio::test]
    async fn explicit_search_logs_trimmed_keyword() {
        let store = InMemoryStore::new();
        store
            .create(&FaqDraft::new("WiFi password?", "Ask IT").with_category("IT"))
            .await
            .unwrap();

        let query = FilterQuery::new(Some("  wifi "), None);
        let hits = search_faqs(&store, &query, true).await.unwrap();
        assert_eq!(hits.len(), 1);

        let logs = store.recent_logs(10).await.unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].keyword, "wifi");
    }

    #[tokio::test]
    async fn listing_does_not_log() {
        let store = InMemoryStore::new();
        let query = FilterQuery::new(Some("vpn"), None);
        search_faqs(&store, &query, false).await.unwrap();
        let blank = FilterQuery::new(Some("   "), None);
        search_faqs(&store, &blank, true).await.unwrap();
        assert!(store.recent_logs(10).await.unwrap().is_empty());
    }
}
