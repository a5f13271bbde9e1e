//! User notification registry: at most one live push channel per user.

use crate::session::{SessionHandle, SessionId};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Registry key for a user's notification channel.
pub fn user_key(user_id: i64) -> String {
    format!("user_{user_id}")
}

/// Shared registry of live notification sessions, keyed by user.
///
/// The registry holds the only sender for a notification session, so
/// replacing a user's entry drops the displaced handle, closes its channel,
/// and with it the old socket.
#[derive(Default)]
pub struct UserNotificationRegistry {
    sessions: RwLock<HashMap<String, SessionHandle>>,
}

impl UserNotificationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session for a user, replacing (and thereby closing) any
    /// previous one.
    pub async fn register(&self, user_key: &str, handle: SessionHandle) {
        let mut sessions = self.sessions.write().await;
        if let Some(displaced) = sessions.insert(user_key.to_string(), handle) {
            debug!(user = user_key, session = %displaced.id(), "replaced notification session");
        }
    }

    /// Remove the mapping only if it still points at this session, so a
    /// replaced session's late disconnect cannot evict its successor.
    pub async fn unregister(&self, user_key: &str, session_id: SessionId) {
        let mut sessions = self.sessions.write().await;
        if sessions
            .get(user_key)
            .is_some_and(|session| session.id() == session_id)
        {
            sessions.remove(user_key);
        }
    }

    /// Best-effort push. Returns whether the payload was queued on a live
    /// session; a user without one is a non-error no-op.
    pub async fn push(&self, user_key: &str, payload: &str) -> bool {
        let session = {
            let sessions = self.sessions.read().await;
            match sessions.get(user_key) {
                Some(session) => session.clone(),
                None => return false,
            }
        };

        match session.send(payload) {
            Ok(()) => true,
            Err(_) => {
                debug!(user = user_key, "notification session defunct, push dropped");
                false
            }
        }
    }

    /// Whether a user currently has a live notification session.
    pub async fn is_registered(&self, user_key: &str) -> bool {
        self.sessions.read().await.contains_key(user_key)
    }
}
