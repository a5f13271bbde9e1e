//! Community entity definitions

use serde::{Deserialize, Serialize};

/// A named group-chat context with a bounded membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Community {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub max_participants: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Request to create a new community (seed/test side of the boundary)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommunityRequest {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub max_participants: i64,
}

impl CreateCommunityRequest {
    /// Validate the create request
    pub fn validate(&self) -> Result<(), String> {
        if self.slug.trim().is_empty() {
            return Err("Community slug cannot be empty".to_string());
        }

        if self.name.trim().is_empty() {
            return Err("Community name cannot be empty".to_string());
        }

        if self.max_participants < 1 {
            return Err("Community must allow at least one participant".to_string());
        }

        Ok(())
    }
}
