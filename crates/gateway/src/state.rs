//! Shared application state for the gateway

use sqlx::SqlitePool;
use std::sync::Arc;
use studyhall_community::{
    CommunityService, MessageService, NotificationFanout, RoomRegistry, UserNotificationRegistry,
    UserService,
};
use studyhall_config::DatabaseConfig;
use studyhall_database::{CommunityRepository, MessageRepository, NotificationRepository, UserRepository};

use crate::error::{GatewayError, GatewayResult};

/// Shared application state: the composition root for services and the two
/// connection registries. Constructed once and shared as `Arc` across all
/// handlers.
pub struct GatewayState {
    /// Database connection pool
    pub pool: SqlitePool,
    /// Community lookup and membership reads
    pub community_service: CommunityService,
    /// Message acceptance and history
    pub message_service: MessageService,
    /// Sender/recipient resolution
    pub user_service: UserService,
    /// Live chat sessions grouped by room
    pub room_registry: Arc<RoomRegistry>,
    /// Live notification sessions keyed by user
    pub notification_registry: Arc<UserNotificationRegistry>,
    /// Notification creation and push on room broadcasts
    pub fanout: NotificationFanout,
}

impl GatewayState {
    /// Create a new gateway state with all services initialized
    pub fn new(pool: SqlitePool) -> Self {
        let room_registry = Arc::new(RoomRegistry::new());
        let notification_registry = Arc::new(UserNotificationRegistry::new());

        let community_service = CommunityService::new(CommunityRepository::new(pool.clone()));
        let message_service = MessageService::new(MessageRepository::new(pool.clone()));
        let user_service = UserService::new(UserRepository::new(pool.clone()));

        let fanout = NotificationFanout::new(
            CommunityRepository::new(pool.clone()),
            NotificationRepository::new(pool.clone()),
            Arc::clone(&notification_registry),
        );

        Self {
            pool,
            community_service,
            message_service,
            user_service,
            room_registry,
            notification_registry,
            fanout,
        }
    }

    /// Create gateway state from database configuration
    pub async fn from_config(config: &DatabaseConfig) -> GatewayResult<Self> {
        let pool = studyhall_database::initialize_database(config)
            .await
            .map_err(|e| {
                GatewayError::DatabaseError(format!("Failed to initialize database: {e}"))
            })?;

        Ok(Self::new(pool))
    }
}
