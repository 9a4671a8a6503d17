//! In-memory store for tests and embedding.
//!
//! Uses `Vec`s behind `std::sync::RwLock`. Records written in the same
//! second are ordered by write sequence so `get_all` stays deterministic.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use crate::models::{AdminEntry, Counter, FaqDraft, FaqRecord, SearchLogEntry};

use super::{AdminStore, FaqStore, SearchLogStore};

struct StoredFaq {
    record: FaqRecord,
    seq: u64,
}

#[derive(Default)]
struct FaqTable {
    rows: Vec<StoredFaq>,
    next_seq: u64,
}

/// In-memory implementation of every store trait.
#[derive(Default)]
pub struct InMemoryStore {
    faqs: RwLock<FaqTable>,
    logs: RwLock<Vec<SearchLogEntry>>,
    admins: RwLock<Vec<AdminEntry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record as-is, keeping its id, counters and timestamp.
    pub fn insert_record(&self, record: FaqRecord) -> Result<()> {
        let mut table = write(&self.faqs)?;
        let seq = table.next_seq;
        table.next_seq += 1;
        table.rows.push(StoredFaq { record, seq });
        Ok(())
    }

    /// Seed a log entry with an explicit timestamp.
    pub fn insert_log(&self, entry: SearchLogEntry) -> Result<()> {
        write(&self.logs)?.push(entry);
        Ok(())
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| anyhow!("in-memory store lock poisoned"))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| anyhow!("in-memory store lock poisoned"))
}

#[async_trait]
impl FaqStore for InMemoryStore {
    async fn get_all(&self) -> Result<Vec<FaqRecord>> {
        let table = read(&self.faqs)?;
        let mut rows: Vec<&StoredFaq> = table.rows.iter().collect();
        rows.sort_by(|a, b| {
            b.record
                .updated_at
                .cmp(&a.record.updated_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(rows.into_iter().map(|s| s.record.clone()).collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<FaqRecord>> {
        let table = read(&self.faqs)?;
        Ok(table
            .rows
            .iter()
            .find(|s| s.record.id == id)
            .map(|s| s.record.clone()))
    }

    async fn create(&self, draft: &FaqDraft) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.insert_record(FaqRecord {
            id: id.clone(),
            question: draft.question.clone(),
            answer: draft.answer.clone(),
            category: draft.category.clone(),
            tags: draft.tags.clone(),
            view_count: 0,
            helpful_count: 0,
            updated_at: now(),
        })?;
        Ok(id)
    }

    async fn update(&self, id: &str, draft: &FaqDraft) -> Result<()> {
        let mut table = write(&self.faqs)?;
        let seq = table.next_seq;
        let stored = match table.rows.iter_mut().find(|s| s.record.id == id) {
            Some(s) => s,
            None => bail!("faq not found: {}", id),
        };
        stored.record.question = draft.question.clone();
        stored.record.answer = draft.answer.clone();
        stored.record.category = draft.category.clone();
        stored.record.tags = draft.tags.clone();
        stored.record.updated_at = now();
        stored.seq = seq;
        table.next_seq += 1;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        write(&self.faqs)?.rows.retain(|s| s.record.id != id);
        Ok(())
    }

    async fn increment(&self, id: &str, counter: Counter) -> Result<i64> {
        let mut table = write(&self.faqs)?;
        let stored = match table.rows.iter_mut().find(|s| s.record.id == id) {
            Some(s) => s,
            None => bail!("faq not found: {}", id),
        };
        let slot = match counter {
            Counter::View => &mut stored.record.view_count,
            Counter::Helpful => &mut stored.record.helpful_count,
        };
        *slot = (*slot).max(0) + 1;
        Ok(*slot)
    }
}

#[async_trait]
impl SearchLogStore for InMemoryStore {
    async fn append(&self, keyword: &str) -> Result<()> {
        self.insert_log(SearchLogEntry {
            keyword: keyword.to_string(),
            timestamp: now(),
        })
    }

    async fn recent_logs(&self, limit: usize) -> Result<Vec<SearchLogEntry>> {
        let logs = read(&self.logs)?;
        let mut entries = logs.clone();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries.truncate(limit);
        Ok(entries)
    }
}

#[async_trait]
impl AdminStore for InMemoryStore {
    async fn list_admins(&self) -> Result<Vec<AdminEntry>> {
        Ok(read(&self.admins)?.clone())
    }

    async fn add_admin(&self, email: &str, added_by: &str) -> Result<()> {
        write(&self.admins)?.push(AdminEntry {
            email: email.to_string(),
            added_at: now(),
            added_by: added_by.to_string(),
        });
        Ok(())
    }

    async fn remove_admin(&self, email: &str) -> Result<()> {
        write(&self.admins)?.retain(|a| a.email != email);
        Ok(())
    }
}
