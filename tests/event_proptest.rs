//! Property-based tests for broadcast events

use proptest::prelude::*;
use uuid::Uuid;
use wizzchat::shared::chat::{MessageView, UserSummary};
use wizzchat::shared::event::{BroadcastEvent, EventKind};

fn message(content: String, username: String, color: String) -> MessageView {
    MessageView {
        id: Uuid::new_v4(),
        content,
        sender: UserSummary {
            id: Uuid::new_v4(),
            username,
            message_color: color,
        },
        reactions: vec![],
        created_at: chrono::Utc::now(),
    }
}

proptest! {
    #[test]
    fn chat_update_roundtrip(
        content in ".*",
        username in "[a-z][a-z0-9_]{2,29}",
    ) {
        let messages = vec![message(content, username, "#3B82F6".to_string())];
        let event = BroadcastEvent::chat_update(&messages);
        let json = serde_json::to_string(&event).unwrap();
        let decoded: BroadcastEvent = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(decoded.event, EventKind::ChatUpdate);
        prop_assert_eq!(decoded.payload, event.payload);
    }

    #[test]
    fn reaction_update_keeps_message_id(content in ".*") {
        let message = message(content, "alice".to_string(), "#abc".to_string());
        let event = BroadcastEvent::reaction_update(&message);
        let json = serde_json::to_string(&event).unwrap();
        let decoded: BroadcastEvent = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(
            decoded.payload["messageId"].clone(),
            serde_json::json!(message.id)
        );
    }

    #[test]
    fn wizz_roundtrip(username in "[a-z][a-z0-9_]{2,29}") {
        let event = BroadcastEvent::wizz(Uuid::new_v4(), &username, Uuid::new_v4());
        let json = serde_json::to_string(&event).unwrap();
        let decoded: BroadcastEvent = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(decoded, event);
    }

    #[test]
    fn conversation_list_update_preserves_participants(
        participants in proptest::collection::vec("[a-z][a-z0-9_]{2,29}", 0..5)
    ) {
        let event = BroadcastEvent::conversation_list_update(Uuid::new_v4(), &participants);
        let json = serde_json::to_string(&event).unwrap();
        let decoded: BroadcastEvent = serde_json::from_str(&json).unwrap();

        let decoded_participants: Vec<String> =
            serde_json::from_value(decoded.payload["participants"].clone()).unwrap();
        prop_assert_eq!(decoded_participants, participants);
    }

    #[test]
    fn events_always_carry_a_timestamp(content in ".*") {
        let messages = vec![message(content, "alice".to_string(), "#abc".to_string())];
        let event = BroadcastEvent::chat_update(&messages);
        prop_assert!(!event.timestamp.is_empty());
    }
}
