//! User repository for database operations.
//!
//! The messaging core only reads users; creation exists for the seeding
//! and test side of the boundary.

use crate::entities::{CreateUserRequest, User};
use crate::types::{UserError, UserResult};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

/// Repository for user database operations
#[derive(Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: i64) -> UserResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, public_id, username, email, is_active, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(|row| Self::map_row(&row)).transpose()
    }

    /// Find user by username
    pub async fn find_by_username(&self, username: &str) -> UserResult<Option<User>> {
        let row = sqlx::query(
            "SELECT id, public_id, username, email, is_active, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        row.map(|row| Self::map_row(&row)).transpose()
    }

    /// Create a new user
    pub async fn create(&self, request: &CreateUserRequest) -> UserResult<User> {
        let now = chrono::Utc::now().to_rfc3339();
        let public_id = Uuid::new_v4().to_string();

        let result = sqlx::query(
            "INSERT INTO users (public_id, username, email, is_active, created_at)
             VALUES (?, ?, ?, true, ?)",
        )
        .bind(&public_id)
        .bind(&request.username)
        .bind(&request.email)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| UserError::DatabaseError(e.to_string()))?;

        Ok(User {
            id: result.last_insert_rowid(),
            public_id,
            username: request.username.clone(),
            email: request.email.clone(),
            is_active: true,
            created_at: now,
        })
    }

    fn map_row(row: &sqlx::sqlite::SqliteRow) -> UserResult<User> {
        Ok(User {
            id: row
                .try_get("id")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            public_id: row
                .try_get("public_id")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            username: row
                .try_get("username")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            email: row
                .try_get("email")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            is_active: row
                .try_get("is_active")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| UserError::DatabaseError(e.to_string()))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use tempfile::TempDir;

    async fn create_test_pool() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test_users.db");

        let options = SqliteConnectOptions::new()
            .filename(&db_path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();

        sqlx::query(
            "CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                public_id TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL UNIQUE,
                email TEXT,
                is_active BOOLEAN NOT NULL DEFAULT true,
                created_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        (pool, temp_dir)
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = UserRepository::new(pool);

        let created = repo
            .create(&CreateUserRequest {
                username: "ada".to_string(),
                email: Some("ada@example.com".to_string()),
            })
            .await
            .unwrap();

        assert!(created.id > 0);
        assert!(created.is_active);

        let found = repo.find_by_id(created.id).await.unwrap();
        assert_eq!(found, Some(created.clone()));

        let by_name = repo.find_by_username("ada").await.unwrap();
        assert_eq!(by_name, Some(created));
    }

    #[tokio::test]
    async fn test_find_missing_user() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = UserRepository::new(pool);

        let found = repo.find_by_id(42).await.unwrap();
        assert!(found.is_none());
    }
}
