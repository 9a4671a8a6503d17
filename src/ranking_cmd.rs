//! Recent, popular and favorite lists, plus the two per-reader actions
//! (favorite toggle and helpful vote).

use anyhow::Result;

use quickknowledge_core::feedback::{self, VoteOutcome};
use quickknowledge_core::ranking;
use quickknowledge_core::store::FaqStore;
use quickknowledge_core::FaqError;

use crate::context::AppContext;
use crate::search::print_faqs;

pub async fn run_recent(ctx: &AppContext) -> Result<()> {
    let records = ctx.store.get_all().await?;
    let now = chrono::Utc::now().timestamp();
    let list = ranking::recent_within(
        &records,
        now,
        ctx.config.ranking.recent_days,
        ctx.config.ranking.recent_limit,
    );
    if list.is_empty() {
        println!(
            "Nothing updated in the last {} days.",
            ctx.config.ranking.recent_days
        );
        return Ok(());
    }
    print_faqs(&list);
    Ok(())
}

pub async fn run_popular(ctx: &AppContext) -> Result<()> {
    let records = ctx.store.get_all().await?;
    print_faqs(&ranking::popular(&records, ctx.config.ranking.popular_limit));
    Ok(())
}

pub async fn run_favorites(ctx: &AppContext) -> Result<()> {
    let records = ctx.store.get_all().await?;
    let favorites = ctx.prefs.favorites();
    if favorites.is_empty() {
        println!("No favorites yet. Use `qk favorite <id>` to add one.");
        return Ok(());
    }
    print_faqs(&ranking::favorites(&records, &favorites));
    Ok(())
}

pub async fn run_favorite(ctx: &AppContext, id: &str) -> Result<()> {
    let record = ctx
        .store
        .get_by_id(id)
        .await?
        .ok_or_else(|| FaqError::NotFound(format!("faq {}", id)))?;

    if ctx.prefs.toggle_favorite(id)? {
        println!("Added to favorites: {}", record.question);
    } else {
        println!("Removed from favorites: {}", record.question);
    }
    Ok(())
}

pub async fn run_helpful(ctx: &AppContext, id: &str) -> Result<()> {
    match feedback::vote_helpful(ctx.store.as_ref(), &ctx.prefs, id).await? {
        VoteOutcome::Recorded(count) => {
            println!("Thanks for your feedback. ({} found this helpful)", count)
        }
        VoteOutcome::AlreadyVoted => println!("You already voted for this FAQ."),
    }
    Ok(())
}
