//! Notification fan-out for room broadcasts.
//!
//! Best-effort, at-least-once: the durable row is written first, live
//! delivery is attempted per recipient, and a member without an open
//! notification session simply misses the live push.

use crate::events::NotificationEvent;
use crate::notify::{user_key, UserNotificationRegistry};
use std::sync::Arc;
use studyhall_database::{
    Community, CommunityRepository, CommunityResult, CreateNotificationRequest,
    NotificationRepository, NotificationType, User,
};
use tracing::warn;

/// Creates notification records for a room broadcast and pushes them to
/// every member with a live notification session.
pub struct NotificationFanout {
    communities: CommunityRepository,
    notifications: NotificationRepository,
    registry: Arc<UserNotificationRegistry>,
}

impl NotificationFanout {
    pub fn new(
        communities: CommunityRepository,
        notifications: NotificationRepository,
        registry: Arc<UserNotificationRegistry>,
    ) -> Self {
        Self {
            communities,
            notifications,
            registry,
        }
    }

    /// Notify every member of `community` except the sender about a new
    /// message. Returns the number of live pushes delivered.
    pub async fn notify_room_members(
        &self,
        community: &Community,
        sender: &User,
    ) -> CommunityResult<usize> {
        let members = self.communities.list_members(community.id).await?;
        let recipients: Vec<User> = members
            .into_iter()
            .filter(|member| member.id != sender.id)
            .collect();

        if recipients.is_empty() {
            return Ok(0);
        }

        let message = format!("New message from {}", sender.username);
        let link = format!("/community/{}", community.slug);

        let requests: Vec<CreateNotificationRequest> = recipients
            .iter()
            .map(|member| CreateNotificationRequest {
                recipient_id: member.id,
                community_id: Some(community.id),
                message: message.clone(),
                notification_type: NotificationType::NewMessage,
                link: Some(link.clone()),
            })
            .collect();

        // A failed batch must not abort live delivery; the push is still
        // attempted for every recipient.
        if let Err(error) = self.notifications.create_bulk(&requests).await {
            warn!(%error, community = %community.slug, "failed to persist notification batch");
        }

        let event = NotificationEvent::NewMessage {
            message,
            community: community.slug.clone(),
            link,
        };
        let payload = match serde_json::to_string(&event) {
            Ok(payload) => payload,
            Err(error) => {
                warn!(%error, "failed to serialize notification event");
                return Ok(0);
            }
        };

        let mut delivered = 0;
        for member in &recipients {
            if self.registry.push(&user_key(member.id), &payload).await {
                delivered += 1;
            }
        }

        Ok(delivered)
    }
}
