//! Message acceptance and history retrieval.

use studyhall_database::{
    ChatMessage, Community, MessageError, MessageRepository, MessageResult, User,
};

/// Business logic for accepting chat messages.
pub struct MessageService {
    messages: MessageRepository,
}

impl MessageService {
    pub fn new(messages: MessageRepository) -> Self {
        Self { messages }
    }

    /// Validate and persist one accepted chat message.
    pub async fn post(
        &self,
        community: &Community,
        sender: &User,
        content: &str,
    ) -> MessageResult<ChatMessage> {
        let draft = ChatMessage::new(community.id, sender.id, content.to_string());
        draft.validate().map_err(MessageError::Validation)?;

        self.messages.create(&draft).await
    }

    /// A community's message history in acceptance order.
    pub async fn history(&self, community_id: i64) -> MessageResult<Vec<ChatMessage>> {
        self.messages.list_by_community(community_id).await
    }
}
