//! Business-logic services injected into the gateway state.

pub mod community_service;
pub mod message_service;
pub mod user_service;

pub use community_service::CommunityService;
pub use message_service::MessageService;
pub use user_service::UserService;
