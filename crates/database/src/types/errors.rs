//! Error types for the persistence gateway.

use thiserror::Error;

/// Errors raised while preparing the database itself
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Migration error: {0}")]
    MigrationError(String),
}

/// Errors for user lookups
#[derive(Debug, Error)]
pub enum UserError {
    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Errors for community and membership operations
#[derive(Debug, Error)]
pub enum CommunityError {
    #[error("Community not found")]
    CommunityNotFound,

    #[error("User is already a participant")]
    AlreadyMember,

    #[error("Max participant limit reached")]
    CapacityReached,

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Errors for message persistence
#[derive(Debug, Error)]
pub enum MessageError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// Errors for notification persistence
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
pub type UserResult<T> = Result<T, UserError>;
pub type CommunityResult<T> = Result<T, CommunityError>;
pub type MessageResult<T> = Result<T, MessageError>;
pub type NotificationResult<T> = Result<T, NotificationError>;
