//! Chat message entity definitions

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a persisted message within a community.
///
/// Messages are immutable once written; history retrieval orders them by
/// creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Database primary key
    pub id: i64,
    /// Publicly accessible UUID
    pub public_id: String,
    /// Community this message belongs to
    pub community_id: i64,
    /// User ID who sent the message
    pub sender_id: i64,
    /// Message content
    pub content: String,
    /// Creation timestamp
    pub created_at: String,
}

impl ChatMessage {
    /// Create a new message instance
    pub fn new(community_id: i64, sender_id: i64, content: String) -> Self {
        Self {
            id: 0, // Will be set by database
            public_id: Uuid::new_v4().to_string(),
            community_id,
            sender_id,
            content,
            created_at: Utc::now().to_rfc3339(),
        }
    }

    /// Validate message data
    pub fn validate(&self) -> Result<(), String> {
        if self.content.is_empty() {
            return Err("Message content cannot be empty".to_string());
        }

        if self.content.len() > 10_000 {
            return Err("Message content too long (max 10,000 characters)".to_string());
        }

        Ok(())
    }
}
