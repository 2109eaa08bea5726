/**
 * Chat View Types
 *
 * This module defines the JSON shapes served to clients for
 * conversations, messages, and reactions. They are assembled from
 * database rows by the persistence layer and reused verbatim as
 * broadcast payloads, so REST responses and channel pushes always
 * agree on field names.
 *
 * Field names are camelCase on the wire because the browser client
 * fixed them that way.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user as shown inside conversations and messages
///
/// Carries only what the chat UI needs to render a participant:
/// identity, display name, and the color their messages appear in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// User ID (UUID)
    pub id: Uuid,
    /// Display username
    pub username: String,
    /// Hex color used for this user's messages
    pub message_color: String,
}

/// A single emoji reaction on a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReactionView {
    /// Reaction ID (UUID)
    pub id: Uuid,
    /// The emoji that was added
    pub emoji: String,
    /// The user who reacted
    pub user: ReactionUser,
}

/// The reacting user, reduced to id and username
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReactionUser {
    /// User ID (UUID)
    pub id: Uuid,
    /// Display username
    pub username: String,
}

/// A message with its sender and reactions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    /// Message ID (UUID)
    pub id: Uuid,
    /// Message text
    pub content: String,
    /// The sending user
    pub sender: UserSummary,
    /// Reactions in the order they were added
    pub reactions: Vec<ReactionView>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// A conversation as listed on the dashboard
///
/// Carries the participants and only the latest message, so listing
/// conversations never loads full histories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    /// Conversation ID (UUID)
    pub id: Uuid,
    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,
    /// Everyone in the conversation
    pub participants: Vec<UserSummary>,
    /// The most recent message, if any
    pub last_message: Option<MessageView>,
}

/// A conversation with its full ordered message history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    /// Conversation ID (UUID)
    pub id: Uuid,
    /// Last activity timestamp
    pub updated_at: DateTime<Utc>,
    /// Everyone in the conversation
    pub participants: Vec<UserSummary>,
    /// Messages in insertion order (oldest first)
    pub messages: Vec<MessageView>,
}
