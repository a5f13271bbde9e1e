//! Repository for notification persistence.

use crate::entities::{CreateNotificationRequest, Notification, NotificationType};
use crate::types::{NotificationError, NotificationResult};
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};
use tracing::info;

/// Repository for notification database operations
#[derive(Clone)]
pub struct NotificationRepository {
    pool: SqlitePool,
}

impl NotificationRepository {
    /// Create a new notification repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Persist a batch of notifications with a single multi-row insert.
    ///
    /// Returns the number of rows written. An empty batch is a no-op.
    pub async fn create_bulk(
        &self,
        requests: &[CreateNotificationRequest],
    ) -> NotificationResult<u64> {
        if requests.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now().to_rfc3339();

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "INSERT INTO notifications (recipient_id, community_id, message, notification_type, link, is_read, created_at) ",
        );
        builder.push_values(requests, |mut b, request| {
            b.push_bind(request.recipient_id)
                .push_bind(request.community_id)
                .push_bind(&request.message)
                .push_bind(request.notification_type.as_str())
                .push_bind(&request.link)
                .push_bind(false)
                .push_bind(&now);
        });

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| NotificationError::DatabaseError(e.to_string()))?;

        info!(count = result.rows_affected(), "created notifications");
        Ok(result.rows_affected())
    }

    /// Find notifications for a recipient, newest first
    pub async fn find_by_recipient(&self, recipient_id: i64) -> NotificationResult<Vec<Notification>> {
        let rows = sqlx::query(
            "SELECT id, recipient_id, community_id, message, notification_type, link, is_read, created_at
             FROM notifications WHERE recipient_id = ?
             ORDER BY created_at DESC, id DESC",
        )
        .bind(recipient_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| NotificationError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                let notification_type: String = row
                    .try_get("notification_type")
                    .map_err(|e| NotificationError::DatabaseError(e.to_string()))?;

                Ok(Notification {
                    id: row
                        .try_get("id")
                        .map_err(|e| NotificationError::DatabaseError(e.to_string()))?,
                    recipient_id: row
                        .try_get("recipient_id")
                        .map_err(|e| NotificationError::DatabaseError(e.to_string()))?,
                    community_id: row
                        .try_get("community_id")
                        .map_err(|e| NotificationError::DatabaseError(e.to_string()))?,
                    message: row
                        .try_get("message")
                        .map_err(|e| NotificationError::DatabaseError(e.to_string()))?,
                    notification_type: NotificationType::from(notification_type.as_str()),
                    link: row
                        .try_get("link")
                        .map_err(|e| NotificationError::DatabaseError(e.to_string()))?,
                    is_read: row
                        .try_get("is_read")
                        .map_err(|e| NotificationError::DatabaseError(e.to_string()))?,
                    created_at: row
                        .try_get("created_at")
                        .map_err(|e| NotificationError::DatabaseError(e.to_string()))?,
                })
            })
            .collect()
    }

    /// Count unread notifications for a recipient
    pub async fn unread_count(&self, recipient_id: i64) -> NotificationResult<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM notifications WHERE recipient_id = ? AND is_read = false",
        )
        .bind(recipient_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| NotificationError::DatabaseError(e.to_string()))?;

        row.try_get("count")
            .map_err(|e| NotificationError::DatabaseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use tempfile::TempDir;

    async fn create_test_pool() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test_notifications.db");

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE notifications (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                recipient_id INTEGER NOT NULL,
                community_id INTEGER,
                message TEXT NOT NULL,
                notification_type TEXT NOT NULL,
                link TEXT,
                is_read BOOLEAN NOT NULL DEFAULT false,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        (pool, temp_dir)
    }

    fn request(recipient_id: i64) -> CreateNotificationRequest {
        CreateNotificationRequest {
            recipient_id,
            community_id: Some(7),
            message: "New message from ada".to_string(),
            notification_type: NotificationType::NewMessage,
            link: Some("/community/study-group".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_bulk() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = NotificationRepository::new(pool);

        let written = repo
            .create_bulk(&[request(1), request(2), request(3)])
            .await
            .unwrap();
        assert_eq!(written, 3);

        let for_two = repo.find_by_recipient(2).await.unwrap();
        assert_eq!(for_two.len(), 1);
        assert_eq!(for_two[0].message, "New message from ada");
        assert_eq!(for_two[0].notification_type, NotificationType::NewMessage);
        assert_eq!(for_two[0].link.as_deref(), Some("/community/study-group"));
        assert!(!for_two[0].is_read);
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = NotificationRepository::new(pool);

        let written = repo.create_bulk(&[]).await.unwrap();
        assert_eq!(written, 0);
    }

    #[tokio::test]
    async fn test_unread_count() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = NotificationRepository::new(pool);

        repo.create_bulk(&[request(5), request(5)]).await.unwrap();

        assert_eq!(repo.unread_count(5).await.unwrap(), 2);
        assert_eq!(repo.unread_count(6).await.unwrap(), 0);
    }
}
