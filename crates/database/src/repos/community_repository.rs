//! Repository for community and membership data access.
//!
//! Membership is mutated only through this boundary (seeding, the REST
//! side of the platform); the messaging core calls the read operations.

use crate::entities::{Community, CreateCommunityRequest, User};
use crate::types::{CommunityError, CommunityResult};
use sqlx::{Row, SqlitePool};
use tracing::info;

/// Repository for community database operations
#[derive(Clone)]
pub struct CommunityRepository {
    pool: SqlitePool,
}

impl CommunityRepository {
    /// Create a new community repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a community by its slug
    pub async fn find_by_slug(&self, slug: &str) -> CommunityResult<Option<Community>> {
        let row = sqlx::query(
            "SELECT id, slug, name, description, max_participants, created_at, updated_at
             FROM communities WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CommunityError::DatabaseError(e.to_string()))?;

        row.map(|row| Self::map_row(&row)).transpose()
    }

    /// Find a community by ID
    pub async fn find_by_id(&self, id: i64) -> CommunityResult<Option<Community>> {
        let row = sqlx::query(
            "SELECT id, slug, name, description, max_participants, created_at, updated_at
             FROM communities WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CommunityError::DatabaseError(e.to_string()))?;

        row.map(|row| Self::map_row(&row)).transpose()
    }

    /// Create a new community
    pub async fn create(&self, request: &CreateCommunityRequest) -> CommunityResult<Community> {
        request
            .validate()
            .map_err(CommunityError::DatabaseError)?;

        let now = chrono::Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT INTO communities (slug, name, description, max_participants, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&request.slug)
        .bind(&request.name)
        .bind(&request.description)
        .bind(request.max_participants)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| CommunityError::DatabaseError(e.to_string()))?;

        info!(slug = %request.slug, "created community");

        Ok(Community {
            id: result.last_insert_rowid(),
            slug: request.slug.clone(),
            name: request.name.clone(),
            description: request.description.clone(),
            max_participants: request.max_participants,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Add a user to a community, enforcing the participant limit
    pub async fn add_member(&self, community_id: i64, user_id: i64) -> CommunityResult<()> {
        let community = self
            .find_by_id(community_id)
            .await?
            .ok_or(CommunityError::CommunityNotFound)?;

        if self.is_member(community_id, user_id).await? {
            return Err(CommunityError::AlreadyMember);
        }

        if self.member_count(community_id).await? >= community.max_participants {
            return Err(CommunityError::CapacityReached);
        }

        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO community_members (community_id, user_id, joined_at) VALUES (?, ?, ?)",
        )
        .bind(community_id)
        .bind(user_id)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|e| CommunityError::DatabaseError(e.to_string()))?;

        info!(community_id, user_id, "added participant to community");
        Ok(())
    }

    /// List all members of a community
    pub async fn list_members(&self, community_id: i64) -> CommunityResult<Vec<User>> {
        let rows = sqlx::query(
            "SELECT u.id, u.public_id, u.username, u.email, u.is_active, u.created_at
             FROM community_members cm
             JOIN users u ON u.id = cm.user_id
             WHERE cm.community_id = ?
             ORDER BY cm.joined_at ASC",
        )
        .bind(community_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| CommunityError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                Ok(User {
                    id: row
                        .try_get("id")
                        .map_err(|e| CommunityError::DatabaseError(e.to_string()))?,
                    public_id: row
                        .try_get("public_id")
                        .map_err(|e| CommunityError::DatabaseError(e.to_string()))?,
                    username: row
                        .try_get("username")
                        .map_err(|e| CommunityError::DatabaseError(e.to_string()))?,
                    email: row
                        .try_get("email")
                        .map_err(|e| CommunityError::DatabaseError(e.to_string()))?,
                    is_active: row
                        .try_get("is_active")
                        .map_err(|e| CommunityError::DatabaseError(e.to_string()))?,
                    created_at: row
                        .try_get("created_at")
                        .map_err(|e| CommunityError::DatabaseError(e.to_string()))?,
                })
            })
            .collect()
    }

    /// Count members of a community
    pub async fn member_count(&self, community_id: i64) -> CommunityResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM community_members WHERE community_id = ?")
            .bind(community_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CommunityError::DatabaseError(e.to_string()))?;

        row.try_get("count")
            .map_err(|e| CommunityError::DatabaseError(e.to_string()))
    }

    /// Check if a user is a member of a community
    pub async fn is_member(&self, community_id: i64, user_id: i64) -> CommunityResult<bool> {
        let row = sqlx::query(
            "SELECT 1 FROM community_members WHERE community_id = ? AND user_id = ?",
        )
        .bind(community_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CommunityError::DatabaseError(e.to_string()))?;

        Ok(row.is_some())
    }

    fn map_row(row: &sqlx::sqlite::SqliteRow) -> CommunityResult<Community> {
        Ok(Community {
            id: row
                .try_get("id")
                .map_err(|e| CommunityError::DatabaseError(e.to_string()))?,
            slug: row
                .try_get("slug")
                .map_err(|e| CommunityError::DatabaseError(e.to_string()))?,
            name: row
                .try_get("name")
                .map_err(|e| CommunityError::DatabaseError(e.to_string()))?,
            description: row
                .try_get("description")
                .map_err(|e| CommunityError::DatabaseError(e.to_string()))?,
            max_participants: row
                .try_get("max_participants")
                .map_err(|e| CommunityError::DatabaseError(e.to_string()))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| CommunityError::DatabaseError(e.to_string()))?,
            updated_at: row
                .try_get("updated_at")
                .map_err(|e| CommunityError::DatabaseError(e.to_string()))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::CreateUserRequest;
    use crate::repos::UserRepository;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use tempfile::TempDir;

    async fn create_test_pool() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test_communities.db");

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

        sqlx::query(
            "CREATE TABLE communities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                slug TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL UNIQUE,
                description TEXT,
                max_participants INTEGER NOT NULL DEFAULT 50,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        sqlx::query(
            "CREATE TABLE community_members (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                community_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                joined_at TEXT NOT NULL,
                UNIQUE(community_id, user_id)
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        (pool, temp_dir)
    }

    fn community_request(slug: &str, capacity: i64) -> CreateCommunityRequest {
        CreateCommunityRequest {
            slug: slug.to_string(),
            name: format!("{slug} community"),
            description: None,
            max_participants: capacity,
        }
    }

    async fn seed_user(pool: &SqlitePool, username: &str) -> User {
        UserRepository::new(pool.clone())
            .create(&CreateUserRequest {
                username: username.to_string(),
                email: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find_by_slug() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = CommunityRepository::new(pool);

        let created = repo.create(&community_request("study-group", 10)).await.unwrap();
        let found = repo.find_by_slug("study-group").await.unwrap();

        assert_eq!(found, Some(created));
        assert!(repo.find_by_slug("does-not-exist").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_membership_listing() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = CommunityRepository::new(pool.clone());

        let community = repo.create(&community_request("rust-101", 10)).await.unwrap();
        let ada = seed_user(&pool, "ada").await;
        let lin = seed_user(&pool, "lin").await;

        repo.add_member(community.id, ada.id).await.unwrap();
        repo.add_member(community.id, lin.id).await.unwrap();

        let members = repo.list_members(community.id).await.unwrap();
        assert_eq!(members.len(), 2);
        assert!(repo.is_member(community.id, ada.id).await.unwrap());
        assert!(!repo.is_member(community.id, 999).await.unwrap());
        assert_eq!(repo.member_count(community.id).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_capacity_limit_enforced() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = CommunityRepository::new(pool.clone());

        let community = repo.create(&community_request("tiny", 1)).await.unwrap();
        let ada = seed_user(&pool, "ada").await;
        let lin = seed_user(&pool, "lin").await;

        repo.add_member(community.id, ada.id).await.unwrap();
        let denied = repo.add_member(community.id, lin.id).await;

        assert!(matches!(denied, Err(CommunityError::CapacityReached)));
    }

    #[tokio::test]
    async fn test_duplicate_membership_rejected() {
        let (pool, _temp_dir) = create_test_pool().await;
        let repo = CommunityRepository::new(pool.clone());

        let community = repo.create(&community_request("dupes", 5)).await.unwrap();
        let ada = seed_user(&pool, "ada").await;

        repo.add_member(community.id, ada.id).await.unwrap();
        let again = repo.add_member(community.id, ada.id).await;

        assert!(matches!(again, Err(CommunityError::AlreadyMember)));
    }
}
