//! Studyhall Database Crate
//!
//! The persistence gateway of the community messaging core: connection
//! management, migrations, entities, and repository implementations.

use sqlx::SqlitePool;
use studyhall_config::DatabaseConfig;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

// Re-export repositories
pub use repos::{CommunityRepository, MessageRepository, NotificationRepository, UserRepository};

// Re-export entities
pub use entities::{
    community::{Community, CreateCommunityRequest},
    message::ChatMessage,
    notification::{CreateNotificationRequest, Notification, NotificationType},
    user::{CreateUserRequest, User},
};

// Re-export types
pub use types::{
    errors::{CommunityError, DatabaseError, MessageError, NotificationError, UserError},
    CommunityResult, DatabaseResult, MessageResult, NotificationResult, UserResult,
};

/// Initialize the database with migrations
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_database_initialization() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        let config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 1,
        };

        let pool = initialize_database(&config).await.unwrap();

        // Check that foreign keys are enabled
        let result: (bool,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert!(result.0);
    }
}
