//! Admin-only commands: record CRUD, bulk delete, sample data, and the
//! admin list itself.

use anyhow::{bail, Result};
use tracing::info;

use quickknowledge_core::batch;
use quickknowledge_core::models::FaqDraft;
use quickknowledge_core::store::FaqStore;
use quickknowledge_core::{FaqError, FaqResult};

use crate::context::AppContext;

/// Field edits from the command line. `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct FaqEdit {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<String>,
    /// Replaces the whole tag list when non-empty.
    pub tags: Vec<String>,
}

impl FaqEdit {
    /// Apply the edit on top of `base`, then validate.
    pub fn apply(self, mut base: FaqDraft) -> FaqResult<FaqDraft> {
        if let Some(q) = self.question {
            base.question = q;
        }
        if let Some(a) = self.answer {
            base.answer = a;
        }
        if let Some(c) = self.category {
            base.category = c.trim().to_string();
        }
        if !self.tags.is_empty() {
            base.tags.clear();
            for tag in self.tags {
                base.push_tag(tag);
            }
        }
        base.validate()?;
        Ok(base)
    }
}

pub async fn run_add(ctx: &AppContext, edit: FaqEdit) -> Result<()> {
    ctx.require_admin()?;
    let draft = edit.apply(FaqDraft::default())?;
    let id = ctx.store.create(&draft).await.map_err(|e| FaqError::backend(&e))?;
    println!("Created {}", id);
    Ok(())
}

pub async fn run_update(ctx: &AppContext, id: &str, edit: FaqEdit) -> Result<()> {
    ctx.require_admin()?;
    let current = ctx
        .store
        .get_by_id(id)
        .await?
        .ok_or_else(|| FaqError::NotFound(format!("faq {}", id)))?;
    let draft = edit.apply(current.draft())?;
    ctx.store.update(id, &draft).await.map_err(|e| FaqError::backend(&e))?;
    println!("Updated {}", id);
    Ok(())
}

pub async fn run_delete(ctx: &AppContext, id: &str) -> Result<()> {
    ctx.require_admin()?;
    if ctx.store.get_by_id(id).await?.is_none() {
        return Err(FaqError::NotFound(format!("faq {}", id)).into());
    }
    ctx.store.delete(id).await.map_err(|e| FaqError::backend(&e))?;
    println!("Deleted {}", id);
    Ok(())
}

pub async fn run_delete_all(ctx: &AppContext, yes: bool) -> Result<()> {
    ctx.require_admin()?;
    if !yes {
        bail!("refusing to delete every FAQ without --yes");
    }
    let report = batch::delete_all(ctx.store.as_ref()).await?;
    info!(succeeded = report.succeeded, failed = report.failed, "bulk delete finished");
    println!(
        "Deleted {} FAQs ({} failed).",
        report.succeeded, report.failed
    );
    Ok(())
}

/// Five starter FAQs covering the usual internal topics.
pub fn sample_drafts() -> Vec<FaqDraft> {
    vec![
        FaqDraft::new(
            "When are expense receipts due?",
            "Submit receipts **within one month** of the expense date.\n\n\
             1. Log in to the expense system\n\
             2. Click \"New claim\"\n\
             3. Upload the receipt image\n\n\
             See the manual at https://example.com/manual for details.",
        )
        .with_category("Finance")
        .with_tags(["expenses", "month-end", "receipts"]),
        FaqDraft::new(
            "What is the office WiFi password?",
            "- **SSID**: `Company-WiFi`\n\
             - **Password**: ask the IT team\n\n\
             The password changes on the 1st of each month. Guests use `Guest-WiFi`.",
        )
        .with_category("IT")
        .with_tags(["WiFi", "network", "password"]),
        FaqDraft::new(
            "How do I request paid leave?",
            "1. Log in to the attendance system\n\
             2. Choose \"Leave request\"\n\
             3. Pick the dates and submit to your manager\n\n\
             Requests are due **3 days in advance**.",
        )
        .with_category("General Affairs")
        .with_tags(["leave", "request", "paid leave"]),
        FaqDraft::new(
            "How do I book a meeting room?",
            "Book rooms from your Outlook calendar: create an event, click \
             \"Add room\" and pick a free room.\n\n\
             MTG-A seats 6, MTG-B seats 10, MTG-C seats 20 and has video conferencing.",
        )
        .with_category("General Affairs")
        .with_tags(["meeting room", "booking", "Outlook"]),
        FaqDraft::new(
            "How do I set up the VPN?",
            "On Windows open Settings, Network, VPN and add a connection:\n\
             - Server: `vpn.company.com`\n\
             - Type: `IKEv2`\n\n\
             Sign in with your employee ID. Full guide: https://example.com/vpn-guide",
        )
        .with_category("IT")
        .with_tags(["VPN", "remote work", "connection"]),
    ]
}

pub async fn run_seed(ctx: &AppContext) -> Result<()> {
    ctx.require_admin()?;
    let drafts = sample_drafts();
    for draft in &drafts {
        ctx.store.create(draft).await.map_err(|e| FaqError::backend(&e))?;
    }
    println!("Inserted {} sample FAQs.", drafts.len());
    Ok(())
}

pub async fn run_admins_list(ctx: &AppContext) -> Result<()> {
    for email in ctx.admins.list_admins().await {
        let marker = if ctx.admins.is_super_admin(&email) {
            " (super-admin)"
        } else {
            ""
        };
        println!("{}{}", email, marker);
    }
    Ok(())
}

pub async fn run_admins_add(ctx: &AppContext, email: &str) -> Result<()> {
    let actor = ctx.require_user()?;
    ctx.admins.add_admin(actor, email).await?;
    println!("Added admin {}", email.trim().to_lowercase());
    Ok(())
}

pub async fn run_admins_remove(ctx: &AppContext, email: &str) -> Result<()> {
    let actor = ctx.require_user()?;
    ctx.admins.remove_admin(actor, email).await?;
    println!("Removed admin {}", email.trim().to_lowercase());
    Ok(())
}
