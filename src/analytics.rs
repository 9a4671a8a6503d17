//! Search analytics: which keywords people looked for recently.
//!
//! Pulls the newest `analytics.fetch_limit` log entries, keeps those
//! inside the `analytics.window_days` window, and prints the top
//! `analytics.top_n` keywords with their last search time.

use anyhow::Result;

use quickknowledge_core::analytics::aggregate_search_logs;
use quickknowledge_core::models::{format_ts_iso, KeywordStat};
use quickknowledge_core::store::SearchLogStore;

use crate::config::AnalyticsConfig;
use crate::context::AppContext;

/// Fetch and aggregate search logs as of `now`.
pub async fn keyword_report<L: SearchLogStore + ?Sized>(
    logs: &L,
    settings: &AnalyticsConfig,
    now: i64,
) -> Result<Vec<KeywordStat>> {
    let entries = logs.recent_logs(settings.fetch_limit).await?;
    Ok(aggregate_search_logs(
        &entries,
        now,
        settings.window_days,
        settings.top_n,
    ))
}

pub async fn run_analytics(ctx: &AppContext) -> Result<()> {
    ctx.require_admin()?;

    let now = chrono::Utc::now().timestamp();
    let stats = keyword_report(ctx.store.as_ref(), &ctx.config.analytics, now).await?;

    println!(
        "Search keywords, last {} days",
        ctx.config.analytics.window_days
    );
    println!("================================");
    println!();

    if stats.is_empty() {
        println!("  No searches recorded.");
        println!();
        return Ok(());
    }

    println!("  {:>4}  {:<32} {:>6}   {}", "RANK", "KEYWORD", "COUNT", "LAST SEARCH");
    println!("  {}", "-".repeat(66));
    for (i, stat) in stats.iter().enumerate() {
        println!(
            "  {:>4}  {:<32} {:>6}   {}",
            i + 1,
            stat.keyword,
            stat.count,
            format_ts_relative(stat.last_search, now)
        );
    }
    println!();

    Ok(())
}

/// Format a Unix timestamp relative to `now` (e.g. "3 hours ago").
fn format_ts_relative(ts: i64, now: i64) -> String {
    let delta = now - ts;

    if delta < 0 {
        return format_ts_iso(ts);
    }

    if delta < 60 {
        "just now".to_string()
    } else if delta < 3600 {
        let mins = delta / 60;
        format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
    } else if delta < 86400 {
        let hours = delta / 3600;
        format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
    } else if delta < 86400 * 30 {
        let days = delta / 86400;
        format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
    } else {
        format_ts_iso(ts)
    }
}
