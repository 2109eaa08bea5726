/**
 * Chat Handler Types
 *
 * Request and response types for the chat endpoints.
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Create conversation request
#[derive(Deserialize, Serialize, Debug)]
pub struct CreateConversationRequest {
    /// The other participant
    #[serde(rename = "recipientId")]
    pub recipient_id: Uuid,
}

/// Create conversation response
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateConversationResponse {
    /// Id of the new conversation
    #[serde(rename = "conversationId")]
    pub conversation_id: Uuid,
}

/// Send message request
#[derive(Deserialize, Serialize, Debug)]
pub struct SendMessageRequest {
    /// Message text
    pub content: String,
}

/// Reaction request, shared by add and remove
#[derive(Deserialize, Serialize, Debug)]
pub struct ReactionRequest {
    /// The emoji to add or remove
    pub emoji: String,
}

/// Wizz acknowledgement
#[derive(Serialize, Deserialize, Debug)]
pub struct WizzResponse {
    /// Human-readable outcome
    pub message: String,
}
