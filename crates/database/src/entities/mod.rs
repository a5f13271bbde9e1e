//! Domain entities persisted by the gateway.

pub mod community;
pub mod message;
pub mod notification;
pub mod user;

pub use community::{Community, CreateCommunityRequest};
pub use message::ChatMessage;
pub use notification::{CreateNotificationRequest, Notification, NotificationType};
pub use user::{CreateUserRequest, User};
