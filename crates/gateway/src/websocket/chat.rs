//! Community chat WebSocket handler.
//!
//! One connection per room membership: the session joins the room registry
//! on upgrade, inbound frames are decoded once into [`ChatEvent`]s, and
//! accepted messages are persisted, broadcast, and fanned out as
//! notifications.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use studyhall_community::{
    room_key, ChatEvent, ErrorEnvelope, RoomEvent, SessionHandle, SessionState,
    UNKNOWN_USER_OR_COMMUNITY,
};
use studyhall_database::Community;
use tracing::{debug, info, warn};

use crate::error::GatewayError;
use crate::state::GatewayState;

/// Chat WebSocket connection handler.
///
/// The room slug is resolved before the upgrade; an unknown slug rejects
/// the handshake and the socket is never admitted to the registry.
pub async fn chat_websocket_handler(
    ws: WebSocketUpgrade,
    Path(slug): Path<String>,
    State(state): State<Arc<GatewayState>>,
) -> Result<Response, GatewayError> {
    let community = state
        .community_service
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| GatewayError::NotFound(format!("community {slug}")))?;

    Ok(ws.on_upgrade(move |socket| handle_chat_socket(socket, state, community)))
}

/// Drive one chat connection from admission to cleanup.
async fn handle_chat_socket(socket: WebSocket, state: Arc<GatewayState>, community: Community) {
    let (mut sink, mut stream) = socket.split();
    let (session, mut outbound) = SessionHandle::channel();
    let key = room_key(&community.slug);

    let mut lifecycle = SessionState::Connecting;
    state.room_registry.join(&key, session.clone()).await;
    lifecycle.advance(SessionState::Open);
    info!(room = %key, session = %session.id(), "chat session open");

    // Writer task: drain the session's outbound channel onto the socket.
    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = outbound.recv().await {
            if sink.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    // Reader loop: decode and handle inbound frames.
    let reader_state = Arc::clone(&state);
    let reader_session = session.clone();
    let reader_community = community.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = stream.next().await {
            let Ok(msg) = msg else { break };
            match msg {
                Message::Text(text) => {
                    handle_chat_frame(&reader_state, &reader_community, &reader_session, &text)
                        .await;
                }
                Message::Close(_) => break,
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    }

    lifecycle.advance(SessionState::Closing);
    state.room_registry.leave(&key, session.id()).await;
    lifecycle.advance(SessionState::Closed);
    info!(room = %key, session = %session.id(), "chat session closed");
}

/// Handle one inbound text frame.
///
/// A frame the server cannot act on is answered with an inline error
/// envelope to the acting session only; the connection stays open.
async fn handle_chat_frame(
    state: &Arc<GatewayState>,
    community: &Community,
    session: &SessionHandle,
    text: &str,
) {
    let event = match ChatEvent::decode(text) {
        Ok(event) => event,
        Err(error) => {
            debug!(%error, "rejected inbound frame");
            send_error(session, ErrorEnvelope::invalid_message_or_user());
            return;
        }
    };

    let sender = match state.user_service.resolve_active(event.sender_id()).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            send_error(session, ErrorEnvelope::invalid_message_or_user());
            return;
        }
        Err(error) => {
            warn!(%error, "failed to resolve sender");
            send_error(session, ErrorEnvelope::invalid_message_or_user());
            return;
        }
    };

    let key = room_key(&community.slug);

    match event {
        ChatEvent::VideoCall { payload, .. } => {
            // Ephemeral signaling: broadcast only, no persistence, no
            // notifications.
            let event = RoomEvent::VideoCall {
                message: payload,
                user: sender.username.clone(),
                user_id: sender.id,
            };
            if let Ok(payload) = serde_json::to_string(&event) {
                state.room_registry.broadcast(&key, &payload).await;
            }
        }
        ChatEvent::Message { text: content, .. } => {
            // The room may have been deleted since the handshake.
            let community = match state.community_service.find_by_slug(&community.slug).await {
                Ok(Some(community)) => community,
                Ok(None) => {
                    send_error(session, ErrorEnvelope::new(UNKNOWN_USER_OR_COMMUNITY));
                    return;
                }
                Err(error) => {
                    warn!(%error, "failed to re-resolve community");
                    send_error(session, ErrorEnvelope::new(UNKNOWN_USER_OR_COMMUNITY));
                    return;
                }
            };

            if let Err(error) = state
                .message_service
                .post(&community, &sender, &content)
                .await
            {
                warn!(%error, room = %key, "failed to persist message");
                send_error(session, ErrorEnvelope::new("Failed to save message"));
                return;
            }

            let event = RoomEvent::ChatMessage {
                content,
                user: sender.username.clone(),
                user_id: sender.id,
            };
            if let Ok(payload) = serde_json::to_string(&event) {
                state.room_registry.broadcast(&key, &payload).await;
            }

            if let Err(error) = state.fanout.notify_room_members(&community, &sender).await {
                warn!(%error, room = %key, "notification fan-out failed");
            }
        }
    }
}

fn send_error(session: &SessionHandle, envelope: ErrorEnvelope) {
    if let Ok(payload) = serde_json::to_string(&envelope) {
        let _ = session.send(payload);
    }
}
