//! User resolution for the messaging boundary.

use studyhall_database::{User, UserRepository, UserResult};

/// Resolves sender and recipient identities through the persistence gateway.
///
/// Token verification belongs to the external identity collaborator; at this
/// boundary a user is authenticated when the row exists and is active.
pub struct UserService {
    users: UserRepository,
}

impl UserService {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    /// Resolve an id to an active user; inactive accounts resolve to `None`.
    pub async fn resolve_active(&self, user_id: i64) -> UserResult<Option<User>> {
        let user = self.users.find_by_id(user_id).await?;
        Ok(user.filter(User::is_authenticated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use sqlx::SqlitePool;
    use studyhall_database::CreateUserRequest;
    use tempfile::TempDir;

    async fn create_test_pool() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test_user_service.db");

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
    async fn test_resolves_active_user() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = UserRepository::new(pool);
        let created = repo
            .create(&CreateUserRequest {
                username: "ada".to_string(),
                email: None,
            })
            .await
            .unwrap();

        let service = UserService::new(repo);
        let resolved = service.resolve_active(created.id).await.unwrap();
        assert_eq!(resolved.map(|u| u.username), Some("ada".to_string()));
    }

    #[tokio::test]
    async fn test_inactive_user_resolves_to_none() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = UserRepository::new(pool.clone());
        let created = repo
            .create(&CreateUserRequest {
                username: "ghost".to_string(),
                email: None,
            })
            .await
            .unwrap();

        sqlx::query("UPDATE users SET is_active = false WHERE id = ?")
            .bind(created.id)
            .execute(&pool)
            .await
            .unwrap();

        let service = UserService::new(repo);
        assert!(service.resolve_active(created.id).await.unwrap().is_none());
        assert!(service.resolve_active(999).await.unwrap().is_none());
    }
}
