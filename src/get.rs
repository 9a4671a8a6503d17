//! Single-record retrieval.
//!
//! Opening a record counts as a view. The answer is Markdown; `--html`
//! prints it through the fallback renderer used by the HTTP surface.

use anyhow::Result;
use serde::Serialize;

use quickknowledge_core::feedback;
use quickknowledge_core::markdown::{FallbackRenderer, MarkdownRenderer};
use quickknowledge_core::models::{format_ts_iso, FaqRecord};
use quickknowledge_core::store::FaqStore;
use quickknowledge_core::{FaqError, FaqResult};

use crate::context::AppContext;

/// A record as shown to a reader.
#[derive(Debug, Clone, Serialize)]
pub struct FaqView {
    #[serde(flatten)]
    pub record: FaqRecord,
    pub answer_html: String,
    pub updated: String,
    pub is_favorite: bool,
    pub has_voted: bool,
}

/// Fetch a record by id and count the view.
///
/// The returned record already reflects the new view count when the
/// increment succeeded; a failed increment leaves it as loaded.
pub async fn open_faq<S: FaqStore + ?Sized>(store: &S, id: &str) -> FaqResult<FaqRecord> {
    let mut record = store
        .get_by_id(id)
        .await
        .map_err(|e| FaqError::backend(&e))?
        .ok_or_else(|| FaqError::NotFound(format!("faq {}", id)))?;

    if let Some(views) = feedback::record_view(store, id).await {
        record.view_count = views;
    }
    Ok(record)
}

pub fn render_view(record: FaqRecord, is_favorite: bool, has_voted: bool) -> FaqView {
    FaqView {
        answer_html: FallbackRenderer.render(&record.answer),
        updated: format_ts_iso(record.updated_at),
        is_favorite,
        has_voted,
        record,
    }
}

pub async fn run_show(ctx: &AppContext, id: &str, html: bool) -> Result<()> {
    let record = open_faq(ctx.store.as_ref(), id).await?;
    let view = render_view(
        record,
        ctx.prefs.favorites().contains(id),
        ctx.prefs.has_voted(id),
    );

    println!("--- FAQ ---");
    println!("id:       {}", view.record.id);
    println!("question: {}", view.record.question);
    if !view.record.category.is_empty() {
        println!("category: {}", view.record.category);
    }
    if !view.record.tags.is_empty() {
        println!("tags:     {}", view.record.tags.join(", "));
    }
    println!("updated:  {}", view.updated);
    println!(
        "views:    {}  helpful: {}{}",
        view.record.view_count,
        view.record.helpful_count,
        if view.has_voted { " (voted)" } else { "" }
    );
    if view.is_favorite {
        println!("favorite: yes");
    }
    println!();

    println!("--- Answer ---");
    if html {
        println!("{}", view.answer_html);
    } else {
        println!("{}", view.record.answer);
    }

    Ok(())
}
