//! Per-user notification WebSocket handler.
//!
//! A push-only channel: the registry holds the session's only sender, so
//! a later registration for the same user drops this one and the writer
//! task closes the socket.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use studyhall_community::{user_key, SessionHandle, SessionState};
use studyhall_database::User;
use tracing::info;

use crate::error::GatewayError;
use crate::state::GatewayState;

/// Notification WebSocket connection handler.
///
/// The handshake requires a resolvable, active user; otherwise the socket
/// never opens.
pub async fn notification_websocket_handler(
    ws: WebSocketUpgrade,
    Path(user_id): Path<i64>,
    State(state): State<Arc<GatewayState>>,
) -> Result<Response, GatewayError> {
    let user = state
        .user_service
        .resolve_active(user_id)
        .await?
        .ok_or_else(|| GatewayError::NotFound(format!("user {user_id}")))?;

    Ok(ws.on_upgrade(move |socket| handle_notification_socket(socket, state, user)))
}

async fn handle_notification_socket(socket: WebSocket, state: Arc<GatewayState>, user: User) {
    let (mut sink, mut stream) = socket.split();
    let (session, mut outbound) = SessionHandle::channel();
    let session_id = session.id();
    let key = user_key(user.id);

    let mut lifecycle = SessionState::Connecting;
    // The registry takes the only sender; a replacement registration closes
    // this session's channel.
    state.notification_registry.register(&key, session).await;
    lifecycle.advance(SessionState::Open);
    info!(user = %key, session = %session_id, "notification session open");

    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = outbound.recv().await {
            if sink.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
        // Channel closed: either this session was replaced or the server is
        // shutting the connection down.
        let _ = sink.close().await;
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = stream.next().await {
            let Ok(msg) = msg else { break };
            // Push-only channel: inbound frames are ignored.
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    }

    lifecycle.advance(SessionState::Closing);
    state.notification_registry.unregister(&key, session_id).await;
    lifecycle.advance(SessionState::Closed);
    info!(user = %key, session = %session_id, "notification session closed");
}
