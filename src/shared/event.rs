/**
 * Broadcast Event Envelope
 *
 * This module defines the event types pushed to connected clients
 * over the realtime channel. Every push is a named event plus a JSON
 * payload; events are transient and never stored.
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::chat::MessageView;

/// Kind of broadcast event
///
/// The wire names are fixed by the browser client and must not change.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EventKind {
    /// A conversation's message list changed (new message sent)
    #[serde(rename = "send-chat-update")]
    ChatUpdate,
    /// A message's reaction set changed (reaction added or removed)
    #[serde(rename = "reaction-update")]
    ReactionUpdate,
    /// A conversation was created; recipients should refresh their list
    #[serde(rename = "conversation-list-update")]
    ConversationListUpdate,
    /// Someone sent a wizz attention ping
    #[serde(rename = "wizz-received")]
    WizzReceived,
}

impl EventKind {
    /// Wire name of the event, for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChatUpdate => "send-chat-update",
            Self::ReactionUpdate => "reaction-update",
            Self::ConversationListUpdate => "conversation-list-update",
            Self::WizzReceived => "wizz-received",
        }
    }
}

/// An event pushed to connected clients
///
/// This is the frame serialized onto the channel. It can be cloned
/// freely and carries no delivery state; the broadcaster decides which
/// connections receive it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BroadcastEvent {
    /// What happened
    pub event: EventKind,
    /// Event payload (JSON-serializable data)
    pub payload: serde_json::Value,
    /// When the event was emitted
    pub timestamp: String,
}

impl BroadcastEvent {
    /// Create a new broadcast event
    pub fn new(event: EventKind, payload: serde_json::Value) -> Self {
        Self {
            event,
            payload,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// A conversation's refreshed message list
    pub fn chat_update(messages: &[MessageView]) -> Self {
        Self::new(EventKind::ChatUpdate, serde_json::json!(messages))
    }

    /// A message refreshed after its reactions changed
    pub fn reaction_update(message: &MessageView) -> Self {
        Self::new(
            EventKind::ReactionUpdate,
            serde_json::json!({
                "messageId": message.id,
                "message": message,
            }),
        )
    }

    /// A new conversation the recipient participates in
    pub fn conversation_list_update(conversation_id: Uuid, participants: &[String]) -> Self {
        Self::new(
            EventKind::ConversationListUpdate,
            serde_json::json!({
                "conversationId": conversation_id,
                "participants": participants,
            }),
        )
    }

    /// A wizz attention ping
    pub fn wizz(sender_id: Uuid, sender_username: &str, conversation_id: Uuid) -> Self {
        let timestamp = chrono::Utc::now().to_rfc3339();
        Self {
            event: EventKind::WizzReceived,
            payload: serde_json::json!({
                "senderId": sender_id,
                "senderUsername": sender_username,
                "conversationId": conversation_id,
                "timestamp": timestamp,
            }),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::chat::UserSummary;

    fn sample_message() -> MessageView {
        MessageView {
            id: Uuid::new_v4(),
            content: "hey".to_string(),
            sender: UserSummary {
                id: Uuid::new_v4(),
                username: "alice".to_string(),
                message_color: "#112233".to_string(),
            },
            reactions: vec![],
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_event_kind_wire_names() {
        assert_eq!(
            serde_json::to_string(&EventKind::ChatUpdate).unwrap(),
            "\"send-chat-update\""
        );
        assert_eq!(
            serde_json::to_string(&EventKind::ReactionUpdate).unwrap(),
            "\"reaction-update\""
        );
        assert_eq!(
            serde_json::to_string(&EventKind::ConversationListUpdate).unwrap(),
            "\"conversation-list-update\""
        );
        assert_eq!(
            serde_json::to_string(&EventKind::WizzReceived).unwrap(),
            "\"wizz-received\""
        );
    }

    #[test]
    fn test_chat_update_payload_is_message_list() {
        let messages = vec![sample_message(), sample_message()];
        let event = BroadcastEvent::chat_update(&messages);

        assert_eq!(event.event, EventKind::ChatUpdate);
        assert_eq!(event.payload.as_array().unwrap().len(), 2);
        assert!(!event.timestamp.is_empty());
    }

    #[test]
    fn test_reaction_update_carries_message_id() {
        let message = sample_message();
        let event = BroadcastEvent::reaction_update(&message);

        assert_eq!(event.event, EventKind::ReactionUpdate);
        assert_eq!(
            event.payload["messageId"],
            serde_json::json!(message.id)
        );
        assert_eq!(event.payload["message"]["content"], "hey");
    }

    #[test]
    fn test_conversation_list_update_payload() {
        let conversation_id = Uuid::new_v4();
        let participants = vec!["alice".to_string(), "bob".to_string()];
        let event = BroadcastEvent::conversation_list_update(conversation_id, &participants);

        assert_eq!(event.event, EventKind::ConversationListUpdate);
        assert_eq!(
            event.payload["conversationId"],
            serde_json::json!(conversation_id)
        );
        assert_eq!(event.payload["participants"][1], "bob");
    }

    #[test]
    fn test_wizz_payload_timestamps_agree() {
        let sender = Uuid::new_v4();
        let conversation = Uuid::new_v4();
        let event = BroadcastEvent::wizz(sender, "alice", conversation);

        assert_eq!(event.event, EventKind::WizzReceived);
        assert_eq!(event.payload["senderUsername"], "alice");
        assert_eq!(event.payload["timestamp"], event.timestamp.as_str());
    }

    #[test]
    fn test_event_serialization_roundtrip() {
        let event = BroadcastEvent::wizz(Uuid::new_v4(), "alice", Uuid::new_v4());
        let json = serde_json::to_string(&event).unwrap();
        let decoded: BroadcastEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, decoded);
    }
}
