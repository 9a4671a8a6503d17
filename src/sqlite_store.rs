//! SQLite-backed implementation of the core store traits.
//!
//! Tags are stored as a JSON array in `faqs.tags_json`. Counter columns
//! are nullable and pass through [`counter_or_zero`] on read.

use anyhow::{bail, Result};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::warn;

use quickknowledge_core::models::{
    counter_or_zero, AdminEntry, Counter, FaqDraft, FaqRecord, SearchLogEntry,
};
use quickknowledge_core::store::{AdminStore, FaqStore, SearchLogStore};

/// SQLite implementation of [`FaqStore`], [`SearchLogStore`] and
/// [`AdminStore`].
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

fn encode_tags(tags: &[String]) -> Result<String> {
    Ok(serde_json::to_string(tags)?)
}

fn decode_tags(id: &str, raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(id = %id, error = %e, "unreadable tags column, treating as empty");
        Vec::new()
    })
}

fn faq_from_row(row: &SqliteRow) -> FaqRecord {
    let id: String = row.get("id");
    let tags_json: String = row.get("tags_json");
    let tags = decode_tags(&id, &tags_json);
    FaqRecord {
        question: row.get("question"),
        answer: row.get("answer"),
        category: row.get("category"),
        tags,
        view_count: counter_or_zero(row.get("view_count")),
        helpful_count: counter_or_zero(row.get("helpful_count")),
        updated_at: row.get("updated_at"),
        id,
    }
}

const FAQ_COLUMNS: &str =
    "id, question, answer, category, tags_json, view_count, helpful_count, updated_at";

#[async_trait]
impl FaqStore for SqliteStore {
    async fn get_all(&self) -> Result<Vec<FaqRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM faqs ORDER BY updated_at DESC, seq DESC",
            FAQ_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(faq_from_row).collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<FaqRecord>> {
        let row = sqlx::query(&format!("SELECT {} FROM faqs WHERE id = ?", FAQ_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(faq_from_row))
    }

    async fn create(&self, draft: &FaqDraft) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        sqlx::query(
            r#"
            INSERT INTO faqs (id, question, answer, category, tags_json,
                              view_count, helpful_count, updated_at, seq)
            VALUES (?, ?, ?, ?, ?, 0, 0, ?, (SELECT COALESCE(MAX(seq), 0) + 1 FROM faqs))
            "#,
        )
        .bind(&id)
        .bind(&draft.question)
        .bind(&draft.answer)
        .bind(&draft.category)
        .bind(encode_tags(&draft.tags)?)
        .bind(now())
        .execute(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update(&self, id: &str, draft: &FaqDraft) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE faqs SET
                question = ?,
                answer = ?,
                category = ?,
                tags_json = ?,
                updated_at = ?,
                seq = (SELECT COALESCE(MAX(seq), 0) + 1 FROM faqs)
            WHERE id = ?
            "#,
        )
        .bind(&draft.question)
        .bind(&draft.answer)
        .bind(&draft.category)
        .bind(encode_tags(&draft.tags)?)
        .bind(now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            bail!("faq not found: {}", id);
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        sqlx::query("DELETE FROM faqs WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn increment(&self, id: &str, counter: Counter) -> Result<i64> {
        let column = counter.column();
        let value: Option<i64> = sqlx::query_scalar(&format!(
            "UPDATE faqs SET {col} = MAX(COALESCE({col}, 0), 0) + 1 WHERE id = ? RETURNING {col}",
            col = column
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match value {
            Some(v) => Ok(v),
            None => bail!("faq not found: {}", id),
        }
    }
}

#[async_trait]
impl SearchLogStore for SqliteStore {
    async fn append(&self, keyword: &str) -> Result<()> {
        sqlx::query("INSERT INTO search_logs (keyword, timestamp) VALUES (?, ?)")
            .bind(keyword)
            .bind(now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn recent_logs(&self, limit: usize) -> Result<Vec<SearchLogEntry>> {
        let rows = sqlx::query(
            "SELECT keyword, timestamp FROM search_logs ORDER BY timestamp DESC, id DESC LIMIT ?",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .iter()
            .map(|row| SearchLogEntry {
                keyword: row.get("keyword"),
                timestamp: row.get("timestamp"),
            })
            .collect())
    }
}

#[async_trait]
impl AdminStore for SqliteStore {
    async fn list_admins(&self) -> Result<Vec<AdminEntry>> {
        let rows = sqlx::query("SELECT email, added_at, added_by FROM admins ORDER BY added_at")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .iter()
            .map(|row| AdminEntry {
                email: row.get("email"),
                added_at: row.get("added_at"),
                added_by: row.get("added_by"),
            })
            .collect())
    }

    async fn add_admin(&self, email: &str, added_by: &str) -> Result<()> {
        sqlx::query("INSERT INTO admins (email, added_at, added_by) VALUES (?, ?, ?)")
            .bind(email)
            .bind(now())
            .bind(added_by)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove_admin(&self, email: &str) -> Result<()> {
        sqlx::query("DELETE FROM admins WHERE email = ?")
            .bind(email)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::{db, migrate};
    use tempfile::TempDir;

    async fn open() -> (TempDir, SqliteStore) {
        let tmp = TempDir::new().unwrap();
        let config = Config::in_dir(tmp.path(), "owner@example.com");
        let pool = db::connect(&config).await.unwrap();
        migrate::apply(&pool).await.unwrap();
        (tmp, SqliteStore::new(pool))
    }

    #[tokio::test]
    async fn crud_and_ordering() {
        let (_tmp, store) = open().await;
        let a = store
            .create(&FaqDraft::new("a", "A").with_category("IT").with_tags(["x", "y z"]))
            .await
            .unwrap();
        let b = store.create(&FaqDraft::new("b", "B")).await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec![b.as_str(), a.as_str()]);
        let rec_a = store.get_by_id(&a).await.unwrap().unwrap();
        assert_eq!(rec_a.tags, vec!["x", "y z"]);
        assert_eq!(rec_a.category, "IT");

        store.update(&a, &FaqDraft::new("a2", "A2")).await.unwrap();
        let all = store.get_all().await.unwrap();
        assert_eq!(all[0].id, a);
        assert_eq!(all[0].question, "a2");
        assert!(all[0].tags.is_empty());

        assert!(store.update("missing", &FaqDraft::new("q", "a")).await.is_err());

        store.delete(&b).await.unwrap();
        assert!(store.get_by_id(&b).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn increment_handles_null_counters() {
        let (_tmp, store) = open().await;
        sqlx::query(
            "INSERT INTO faqs (id, question, answer, updated_at) VALUES ('legacy', 'q', 'a', 1)",
        )
        .execute(store.pool())
        .await
        .unwrap();

        let rec = store.get_by_id("legacy").await.unwrap().unwrap();
        assert_eq!(rec.view_count, 0);
        assert_eq!(rec.helpful_count, 0);

        assert_eq!(store.increment("legacy", Counter::View).await.unwrap(), 1);
        assert_eq!(store.increment("legacy", Counter::View).await.unwrap(), 2);
        assert_eq!(store.increment("legacy", Counter::Helpful).await.unwrap(), 1);
        assert!(store.increment("missing", Counter::View).await.is_err());
    }

    #[tokio::test]
    async fn logs_and_admins() {
        let (_tmp, store) = open().await;
        store.append("wifi").await.unwrap();
        store.append("vpn").await.unwrap();
        let logs = store.recent_logs(10).await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].keyword, "vpn");

        store.add_admin("a@example.com", "owner@example.com").await.unwrap();
        assert_eq!(store.list_admins().await.unwrap().len(), 1);
        store.remove_admin("a@example.com").await.unwrap();
        assert!(store.list_admins().await.unwrap().is_empty());
    }
}
