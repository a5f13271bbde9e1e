//! Wire-level event envelopes.
//!
//! Every payload exchanged over a connection carries an explicit `type`
//! tag (or is the bare `{"error": ...}` object), and inbound frames are
//! decoded exactly once here, at the transport boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error text for an unusable inbound frame.
pub const INVALID_MESSAGE_OR_USER: &str = "Invalid message or user";

/// Error text for a well-formed frame the server cannot act on.
pub const UNKNOWN_USER_OR_COMMUNITY: &str = "User not authenticated or community not found";

/// Raw inbound chat frame as sent by clients.
///
/// `type` is absent on the default chat path and `"video_call"` for
/// signaling; any other value also selects the chat path.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundFrame {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<i64>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// Why an inbound frame could not be turned into a [`ChatEvent`].
#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("malformed frame: {0}")]
    Malformed(String),

    #[error("missing user id")]
    MissingUser,

    #[error("missing or empty message")]
    MissingMessage,
}

/// An inbound chat event, decoded once and matched exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// Default path: persist and broadcast.
    Message { sender_id: i64, text: String },
    /// Ephemeral signaling: broadcast only.
    VideoCall { sender_id: i64, payload: String },
}

impl ChatEvent {
    /// Decode one text frame into an event.
    pub fn decode(text: &str) -> Result<Self, FrameError> {
        let frame: InboundFrame =
            serde_json::from_str(text).map_err(|e| FrameError::Malformed(e.to_string()))?;

        let sender_id = frame.user.ok_or(FrameError::MissingUser)?;
        let message = frame
            .message
            .filter(|message| !message.is_empty())
            .ok_or(FrameError::MissingMessage)?;

        match frame.kind.as_deref() {
            Some("video_call") => Ok(ChatEvent::VideoCall {
                sender_id,
                payload: message,
            }),
            _ => Ok(ChatEvent::Message {
                sender_id,
                text: message,
            }),
        }
    }

    pub fn sender_id(&self) -> i64 {
        match self {
            ChatEvent::Message { sender_id, .. } | ChatEvent::VideoCall { sender_id, .. } => {
                *sender_id
            }
        }
    }
}

/// Events broadcast to every session in a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    ChatMessage {
        content: String,
        user: String,
        #[serde(rename = "userID")]
        user_id: i64,
    },
    VideoCall {
        message: String,
        user: String,
        #[serde(rename = "userID")]
        user_id: i64,
    },
}

/// Events pushed to a single user's notification session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationEvent {
    NewMessage {
        message: String,
        community: String,
        link: String,
    },
}

/// Inline error reply to the acting session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

impl ErrorEnvelope {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }

    pub fn invalid_message_or_user() -> Self {
        Self::new(INVALID_MESSAGE_OR_USER)
    }
}
