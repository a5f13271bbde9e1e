//! Room registry: maps a room key to the sessions currently joined to it.

use crate::session::{SessionHandle, SessionId};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Registry key for a community chat room.
pub fn room_key(slug: &str) -> String {
    format!("chat_{slug}")
}

/// Shared registry of live chat sessions, grouped by room.
///
/// Owned by the gateway's composition root and injected into handlers.
/// One lock guards the whole map; broadcasts snapshot the member list
/// under the lock and deliver without it, so no socket I/O happens while
/// the lock is held (sends only enqueue on per-session channels).
#[derive(Default)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, Vec<SessionHandle>>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session to the named room, creating the room on first join.
    pub async fn join(&self, room_key: &str, handle: SessionHandle) {
        let mut rooms = self.rooms.write().await;
        rooms.entry(room_key.to_string()).or_default().push(handle);
        debug!(room = room_key, "session joined room");
    }

    /// Remove a session from the named room, pruning the room once empty.
    pub async fn leave(&self, room_key: &str, session_id: SessionId) {
        let mut rooms = self.rooms.write().await;
        if let Some(sessions) = rooms.get_mut(room_key) {
            sessions.retain(|session| session.id() != session_id);
            if sessions.is_empty() {
                rooms.remove(room_key);
            }
        }
        debug!(room = room_key, %session_id, "session left room");
    }

    /// Deliver a payload to every session in the room at call time.
    ///
    /// Snapshot semantics: sessions joining after the snapshot are not
    /// guaranteed delivery. A session whose receiver is gone is skipped;
    /// it never aborts delivery to the rest. Returns the delivered count.
    pub async fn broadcast(&self, room_key: &str, payload: &str) -> usize {
        let snapshot = {
            let rooms = self.rooms.read().await;
            match rooms.get(room_key) {
                Some(sessions) => sessions.clone(),
                None => return 0,
            }
        };

        let mut delivered = 0;
        for session in &snapshot {
            match session.send(payload) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    debug!(room = room_key, session = %session.id(), "skipping defunct session");
                }
            }
        }
        delivered
    }

    /// Number of sessions currently joined to the room.
    pub async fn session_count(&self, room_key: &str) -> usize {
        let rooms = self.rooms.read().await;
        rooms.get(room_key).map_or(0, Vec::len)
    }
}
