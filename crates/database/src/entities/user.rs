//! User entity definitions
//!
//! Identity issuance lives outside this core; these types only model what
//! the messaging layer needs to resolve a sender or a notification target.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub public_id: String,
    pub username: String,
    pub email: Option<String>,
    pub is_active: bool,
    pub created_at: String,
}

/// Request for creating a new user (seed/test side of the boundary)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: Option<String>,
}

impl User {
    /// Whether this user may act as a message sender.
    pub fn is_authenticated(&self) -> bool {
        self.is_active
    }
}
