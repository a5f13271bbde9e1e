//! Shared types for the persistence gateway.

pub mod errors;

pub use errors::{
    CommunityError, CommunityResult, DatabaseError, DatabaseResult, MessageError, MessageResult,
    NotificationError, NotificationResult, UserError, UserResult,
};
