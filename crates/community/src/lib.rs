//! # Studyhall Community Crate
//!
//! Domain core of the realtime community layer: per-connection session
//! primitives, the room and user-notification registries, wire-level event
//! envelopes, business-logic services, and the notification fan-out.
//!
//! The registries are plain structs owned by the gateway's composition
//! root and injected into handlers; there is no module-level mutable
//! state.

pub mod events;
pub mod fanout;
pub mod notify;
pub mod registry;
pub mod services;
pub mod session;

// Re-export main types for convenience
pub use events::{
    ChatEvent, ErrorEnvelope, FrameError, InboundFrame, NotificationEvent, RoomEvent,
    INVALID_MESSAGE_OR_USER, UNKNOWN_USER_OR_COMMUNITY,
};
pub use fanout::NotificationFanout;
pub use notify::{user_key, UserNotificationRegistry};
pub use registry::{room_key, RoomRegistry};
pub use services::{CommunityService, MessageService, UserService};
pub use session::{OutboundReceiver, SessionClosed, SessionHandle, SessionId, SessionState};
