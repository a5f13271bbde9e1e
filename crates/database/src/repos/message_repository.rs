//! Repository for chat message persistence.

use crate::entities::ChatMessage;
use crate::types::{MessageError, MessageResult};
use sqlx::{Row, SqlitePool};

/// Repository for message database operations
#[derive(Clone)]
pub struct MessageRepository {
    pool: SqlitePool,
}

impl MessageRepository {
    /// Create a new message repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a message draft, returning it with its database id.
    pub async fn create(&self, message: &ChatMessage) -> MessageResult<ChatMessage> {
        let result = sqlx::query(
            "INSERT INTO messages (public_id, community_id, sender_id, content, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&message.public_id)
        .bind(message.community_id)
        .bind(message.sender_id)
        .bind(&message.content)
        .bind(&message.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| MessageError::DatabaseError(e.to_string()))?;

        Ok(ChatMessage {
            id: result.last_insert_rowid(),
            ..message.clone()
        })
    }

    /// List a community's messages in the order they were accepted.
    pub async fn list_by_community(&self, community_id: i64) -> MessageResult<Vec<ChatMessage>> {
        let rows = sqlx::query(
            "SELECT id, public_id, community_id, sender_id, content, created_at
             FROM messages WHERE community_id = ?
             ORDER BY created_at ASC, id ASC",
        )
        .bind(community_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| MessageError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                Ok(ChatMessage {
                    id: row
                        .try_get("id")
                        .map_err(|e| MessageError::DatabaseError(e.to_string()))?,
                    public_id: row
                        .try_get("public_id")
                        .map_err(|e| MessageError::DatabaseError(e.to_string()))?,
                    community_id: row
                        .try_get("community_id")
                        .map_err(|e| MessageError::DatabaseError(e.to_string()))?,
                    sender_id: row
                        .try_get("sender_id")
                        .map_err(|e| MessageError::DatabaseError(e.to_string()))?,
                    content: row
                        .try_get("content")
                        .map_err(|e| MessageError::DatabaseError(e.to_string()))?,
                    created_at: row
                        .try_get("created_at")
                        .map_err(|e| MessageError::DatabaseError(e.to_string()))?,
                })
            })
            .collect()
    }

    /// Count messages persisted for a community
    pub async fn count_for_community(&self, community_id: i64) -> MessageResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM messages WHERE community_id = ?")
            .bind(community_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| MessageError::DatabaseError(e.to_string()))?;

        row.try_get("count")
            .map_err(|e| MessageError::DatabaseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use tempfile::TempDir;

    async fn create_test_pool() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test_messages.db");

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                public_id TEXT NOT NULL UNIQUE,
                community_id INTEGER NOT NULL,
                sender_id INTEGER NOT NULL,
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        (pool, temp_dir)
    }

    async fn post(repo: &MessageRepository, community_id: i64, sender_id: i64, content: &str) -> ChatMessage {
        repo.create(&ChatMessage::new(community_id, sender_id, content.to_string()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_message() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = MessageRepository::new(pool);

        let message = post(&repo, 1, 2, "hello").await;

        assert!(message.id > 0);
        assert_eq!(message.community_id, 1);
        assert_eq!(message.sender_id, 2);
        assert_eq!(message.content, "hello");
    }

    #[tokio::test]
    async fn test_history_preserves_acceptance_order() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = MessageRepository::new(pool);

        post(&repo, 1, 1, "first").await;
        post(&repo, 1, 2, "second").await;
        post(&repo, 1, 1, "third").await;
        // A message in another community must not appear in the history.
        post(&repo, 2, 1, "elsewhere").await;

        let history = repo.list_by_community(1).await.unwrap();
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();

        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(repo.count_for_community(1).await.unwrap(), 3);
        assert_eq!(repo.count_for_community(2).await.unwrap(), 1);
    }
}
