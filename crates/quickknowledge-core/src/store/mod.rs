//! Storage abstraction for QuickKnowledge.
//!
//! Three narrow traits cover everything the core needs from a backend:
//! [`FaqStore`] for records, [`SearchLogStore`] for the append-only search
//! log, and [`AdminStore`] for the administrator list. Timestamps are
//! assigned by the store on write.
//!
//! Implementations must be `Send + Sync` to work with async runtimes.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{AdminEntry, Counter, FaqDraft, FaqRecord, SearchLogEntry};

/// FAQ record persistence.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get_all`](FaqStore::get_all) | Every record, newest `updated_at` first |
/// | [`get_by_id`](FaqStore::get_by_id) | One record, or `None` |
/// | [`create`](FaqStore::create) | Insert a draft, returning the new id |
/// | [`update`](FaqStore::update) | Overwrite every editable field |
/// | [`delete`](FaqStore::delete) | Remove a record |
/// | [`increment`](FaqStore::increment) | Atomic counter bump |
#[async_trait]
pub trait FaqStore: Send + Sync {
    async fn get_all(&self) -> Result<Vec<FaqRecord>>;

    async fn get_by_id(&self, id: &str) -> Result<Option<FaqRecord>>;

    async fn create(&self, draft: &FaqDraft) -> Result<String>;

    /// Errors if no record has this id.
    async fn update(&self, id: &str, draft: &FaqDraft) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;

    /// Increment a counter by one, treating an absent value as zero, and
    /// return the new value. Does not touch `updated_at`.
    async fn increment(&self, id: &str, counter: Counter) -> Result<i64>;
}

/// Append-only log of confirmed searches.
#[async_trait]
pub trait SearchLogStore: Send + Sync {
    /// Record a search for `keyword`, timestamped by the store.
    async fn append(&self, keyword: &str) -> Result<()>;

    /// The newest `limit` entries, newest first.
    async fn recent_logs(&self, limit: usize) -> Result<Vec<SearchLogEntry>>;
}

/// Administrator list persistence. Authorization rules live in
/// [`crate::session::AdminDirectory`], not here.
#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn list_admins(&self) -> Result<Vec<AdminEntry>>;

    async fn add_admin(&self, email: &str, added_by: &str) -> Result<()>;

    /// Remove every entry for `email`. Removing an unknown email is a no-op.
    async fn remove_admin(&self, email: &str) -> Result<()>;
}

#[async_trait]
impl<T: FaqStore + ?Sized> FaqStore for std::sync::Arc<T> {
    async fn get_all(&self) -> Result<Vec<FaqRecord>> {
        (**self).get_all().await
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<FaqRecord>> {
        (**self).get_by_id(id).await
    }

    async fn create(&self, draft: &FaqDraft) -> Result<String> {
        (**self).create(draft).await
    }

    async fn update(&self, id: &str, draft: &FaqDraft) -> Result<()> {
        (**self).update(id, draft).await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        (**self).delete(id).await
    }

    async fn increment(&self, id: &str, counter: Counter) -> Result<i64> {
        (**self).increment(id, counter).await
    }
}

#[async_trait]
impl<T: SearchLogStore + ?Sized> SearchLogStore for std::sync::Arc<T> {
    async fn append(&self, keyword: &str) -> Result<()> {
        (**self).append(keyword).await
    }

    async fn recent_logs(&self, limit: usize) -> Result<Vec<SearchLogEntry>> {
        (**self).recent_logs(limit).await
    }
}

#[async_trait]
impl<T: AdminStore + ?Sized> AdminStore for std::sync::Arc<T> {
    async fn list_admins(&self) -> Result<Vec<AdminEntry>> {
        (**self).list_admins().await
    }

    async fn add_admin(&self, email: &str, added_by: &str) -> Result<()> {
        (**self).add_admin(email, added_by).await
    }

    async fn remove_admin(&self, email: &str) -> Result<()> {
        (**self).remove_admin(email).await
    }
}
