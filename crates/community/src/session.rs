//! Per-connection session primitives.
//!
//! A session is the in-memory side of one open WebSocket. The connection
//! task owns the receiving half of an unbounded channel and pumps it to the
//! socket; registries hold cloneable [`SessionHandle`]s around the sending
//! half. Dropping every handle closes the channel and, with it, the
//! connection's writer.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::mpsc;

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier for one live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    fn next() -> Self {
        Self(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// Receiving half of a session's outbound channel, pumped by its writer task.
pub type OutboundReceiver = mpsc::UnboundedReceiver<String>;

/// The session's receiver is gone; the connection is closing or closed.
#[derive(Debug, Error, PartialEq)]
#[error("session channel closed")]
pub struct SessionClosed;

/// Cloneable sender handle for one session's outbound channel.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    tx: mpsc::UnboundedSender<String>,
}

impl SessionHandle {
    /// Create a fresh session, returning the handle and the receiver the
    /// connection's writer task will drain.
    pub fn channel() -> (Self, OutboundReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                id: SessionId::next(),
                tx,
            },
            rx,
        )
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Queue a serialized payload for delivery on this session's socket.
    pub fn send(&self, payload: impl Into<String>) -> Result<(), SessionClosed> {
        self.tx.send(payload.into()).map_err(|_| SessionClosed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Lifecycle of one connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connecting,
    Open,
    Closing,
    Closed,
}

impl SessionState {
    /// Attempt a transition, returning whether it is legal. `Closed` is
    /// terminal; a failed handshake may go straight from `Connecting` to
    /// `Closed`.
    pub fn advance(&mut self, next: SessionState) -> bool {
        use SessionState::*;
        let legal = matches!(
            (*self, next),
            (Connecting, Open) | (Connecting, Closed) | (Open, Closing) | (Closing, Closed)
        );
        if legal {
            *self = next;
        }
        legal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_are_unique() {
        let (a, _rx_a) = SessionHandle::channel();
        let (b, _rx_b) = SessionHandle::channel();
        assert_ne!(a.id(), b.id());
    }

    #[tokio::test]
    async fn test_send_reaches_receiver() {
        let (handle, mut rx) = SessionHandle::channel();
        handle.send("ping").unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("ping"));
    }

    #[test]
    fn test_send_after_receiver_dropped_fails() {
        let (handle, rx) = SessionHandle::channel();
        drop(rx);
        assert_eq!(handle.send("ping"), Err(SessionClosed));
        assert!(handle.is_closed());
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut state = SessionState::Connecting;
        assert!(state.advance(SessionState::Open));
        assert!(state.advance(SessionState::Closing));
        assert!(state.advance(SessionState::Closed));

        // Closed is terminal
        assert!(!state.advance(SessionState::Open));
        assert_eq!(state, SessionState::Closed);
    }

    #[test]
    fn test_failed_handshake_closes_directly() {
        let mut state = SessionState::Connecting;
        assert!(state.advance(SessionState::Closed));
    }

    #[test]
    fn test_illegal_transitions_rejected() {
        let mut state = SessionState::Connecting;
        assert!(!state.advance(SessionState::Closing));
        assert_eq!(state, SessionState::Connecting);

        assert!(state.advance(SessionState::Open));
        assert!(!state.advance(SessionState::Connecting));
        assert!(!state.advance(SessionState::Closed));
    }
}
