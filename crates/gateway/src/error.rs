//! Error types for the gateway layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Gateway error types
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("WebSocket error: {0}")]
    WebSocketError(String),
}

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::DatabaseError(_)
            | GatewayError::ServiceError(_)
            | GatewayError::WebSocketError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = json!({
            "error": status.as_str(),
            "message": self.to_string(),
        });

        (status, Json(error_response)).into_response()
    }
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Convert from domain error types
impl From<studyhall_database::UserError> for GatewayError {
    fn from(error: studyhall_database::UserError) -> Self {
        match error {
            studyhall_database::UserError::UserNotFound => {
                GatewayError::NotFound("User not found".to_string())
            }
            studyhall_database::UserError::DatabaseError(msg) => GatewayError::DatabaseError(msg),
        }
    }
}

impl From<studyhall_database::CommunityError> for GatewayError {
    fn from(error: studyhall_database::CommunityError) -> Self {
        match error {
            studyhall_database::CommunityError::CommunityNotFound => {
                GatewayError::NotFound("Community not found".to_string())
            }
            studyhall_database::CommunityError::AlreadyMember
            | studyhall_database::CommunityError::CapacityReached => {
                GatewayError::InvalidRequest(error.to_string())
            }
            studyhall_database::CommunityError::DatabaseError(msg) => {
                GatewayError::DatabaseError(msg)
            }
        }
    }
}

impl From<studyhall_database::MessageError> for GatewayError {
    fn from(error: studyhall_database::MessageError) -> Self {
        match error {
            studyhall_database::MessageError::Validation(msg) => GatewayError::InvalidRequest(msg),
            studyhall_database::MessageError::DatabaseError(msg) => {
                GatewayError::DatabaseError(msg)
            }
        }
    }
}

impl From<sqlx::Error> for GatewayError {
    fn from(error: sqlx::Error) -> Self {
        GatewayError::DatabaseError(error.to_string())
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(error: serde_json::Error) -> Self {
        GatewayError::InvalidRequest(format!("JSON serialization error: {}", error))
    }
}
