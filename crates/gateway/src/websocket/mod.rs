//! WebSocket endpoints for the gateway

pub mod chat;
pub mod notifications;

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::state::GatewayState;

/// Create all WebSocket routes
pub fn create_websocket_routes() -> Router<Arc<GatewayState>> {
    Router::new()
        // Chat rooms are addressed by community slug
        .route("/ws/community/:slug", get(chat::chat_websocket_handler))
        // Notification channels are addressed by user id
        .route(
            "/ws/notifications/:user_id",
            get(notifications::notification_websocket_handler),
        )
}
