//! Conversation Log Repository
//!
//! Append-only record of every question put to the assistant and the
//! answer it gave. Entries are never updated or deleted.

use anyhow::{Context, Result};
use sdk::ConversationEntry;
use sqlx::{Row, SqlitePool};
use std::time::{SystemTime, UNIX_EPOCH};

/// Repository for the conversation log
#[derive(Clone)]
pub struct ConversationRepository {
    pool: SqlitePool,
}

impl ConversationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Append one exchange, stamped with the current time
    pub async fn append(&self, question: &str, response: &str) -> Result<ConversationEntry> {
        let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64;

        sqlx::query("INSERT INTO conversations (question, response, timestamp) VALUES (?, ?, ?)")
            .bind(question)
            .bind(response)
            .bind(now)
            .execute(&self.pool)
            .await
            .context("Failed to record conversation")?;

        Ok(ConversationEntry {
            question: question.to_string(),
            response: response.to_string(),
            timestamp: now,
        })
    }

    /// Most recent exchanges, newest first
    pub async fn recent(&self, limit: i64) -> Result<Vec<ConversationEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT question, response, timestamp
            FROM conversations
            ORDER BY timestamp DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to fetch conversation history")?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(ConversationEntry {
                question: row.get("question"),
                response: row.get("response"),
                timestamp: row.get("timestamp"),
            });
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use crate::db::Database;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_append_and_recent_newest_first() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::new(&temp_dir.path().join("test.db")).await.unwrap();
        let log = db.conversations();

        log.append("first question", "first answer").await.unwrap();
        log.append("second question", "second answer").await.unwrap();

        let history = log.recent(20).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].question, "second question");
        assert_eq!(history[1].response, "first answer");
    }

    #[tokio::test]
    async fn test_recent_respects_limit() {
        let temp_dir = TempDir::new().unwrap();
        let db = Database::new(&temp_dir.path().join("test.db")).await.unwrap();
        let log = db.conversations();

        for i in 0..5 {
            log.append(&format!("q{}", i), "a").await.unwrap();
        }

        let history = log.recent(3).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].question, "q4");
    }
}
