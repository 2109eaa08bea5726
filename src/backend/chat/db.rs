//! Database operations for conversations, messages, and reactions
//!
//! This module contains all persistence for the chat domain and the
//! assembly of the view types served to clients and broadcast over the
//! channel. Handlers never run SQL directly; everything goes through
//! these functions.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

use crate::shared::chat::{
    ConversationSummary, ConversationView, MessageView, ReactionUser, ReactionView, UserSummary,
};

/// Create a conversation between two users
///
/// Inserts the conversation row and both participant rows.
pub async fn create_conversation(
    pool: &PgPool,
    user_a: Uuid,
    user_b: Uuid,
) -> Result<Uuid, sqlx::Error> {
    let conversation_id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO conversations (id, created_at, updated_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(conversation_id)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        INSERT INTO conversation_participants (conversation_id, user_id, joined_at)
        VALUES ($1, $2, $3), ($1, $4, $3)
        "#,
    )
    .bind(conversation_id)
    .bind(user_a)
    .bind(now)
    .bind(user_b)
    .execute(pool)
    .await?;

    Ok(conversation_id)
}

/// Whether a conversation exists
pub async fn conversation_exists(
    pool: &PgPool,
    conversation_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) as count FROM conversations WHERE id = $1
        "#,
    )
    .bind(conversation_id)
    .fetch_one(pool)
    .await?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

/// Check if a user is a participant in a conversation
pub async fn is_participant(
    pool: &PgPool,
    conversation_id: Uuid,
    user_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) as count
        FROM conversation_participants
        WHERE conversation_id = $1 AND user_id = $2
        "#,
    )
    .bind(conversation_id)
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

/// Ids of every conversation the user participates in
///
/// This is the membership query the channel resolver runs at connect
/// time. Only ids come back; no message payload is fetched here.
pub async fn conversation_ids_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT conversation_id
        FROM conversation_participants
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row.get("conversation_id")).collect())
}

/// Participants of a conversation as user summaries
pub async fn participant_summaries(
    pool: &PgPool,
    conversation_id: Uuid,
) -> Result<Vec<UserSummary>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT u.id, u.username, u.message_color
        FROM conversation_participants cp
        INNER JOIN users u ON u.id = cp.user_id
        WHERE cp.conversation_id = $1
        ORDER BY u.username ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| UserSummary {
            id: row.get("id"),
            username: row.get("username"),
            message_color: row.get("message_color"),
        })
        .collect())
}

/// Conversations for a user, most recently updated first
///
/// Each summary carries the participants and only the latest message,
/// so the dashboard list never loads full histories.
pub async fn conversations_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<ConversationSummary>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT c.id, c.updated_at
        FROM conversations c
        INNER JOIN conversation_participants cp ON c.id = cp.conversation_id
        WHERE cp.user_id = $1
        ORDER BY c.updated_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut conversations = Vec::new();
    for row in rows {
        let conversation_id: Uuid = row.get("id");
        let updated_at: DateTime<Utc> = row.get("updated_at");

        let participants = participant_summaries(pool, conversation_id).await?;
        let last_message = latest_message(pool, conversation_id).await?;

        conversations.push(ConversationSummary {
            id: conversation_id,
            updated_at,
            participants,
            last_message,
        });
    }

    Ok(conversations)
}

/// A conversation with its full ordered message history
///
/// Returns `None` when the conversation does not exist.
pub async fn conversation_view(
    pool: &PgPool,
    conversation_id: Uuid,
) -> Result<Option<ConversationView>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, updated_at FROM conversations WHERE id = $1
        "#,
    )
    .bind(conversation_id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let updated_at: DateTime<Utc> = row.get("updated_at");
    let participants = participant_summaries(pool, conversation_id).await?;
    let messages = messages_for_conversation(pool, conversation_id).await?;

    Ok(Some(ConversationView {
        id: conversation_id,
        updated_at,
        participants,
        messages,
    }))
}

/// Append a message and touch the conversation's activity timestamp
pub async fn insert_message(
    pool: &PgPool,
    conversation_id: Uuid,
    sender_id: Uuid,
    content: &str,
) -> Result<Uuid, sqlx::Error> {
    let message_id = Uuid::new_v4();
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO messages (id, conversation_id, sender_id, content, created_at)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(message_id)
    .bind(conversation_id)
    .bind(sender_id)
    .bind(content)
    .bind(now)
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        UPDATE conversations SET updated_at = $1 WHERE id = $2
        "#,
    )
    .bind(now)
    .bind(conversation_id)
    .execute(pool)
    .await?;

    Ok(message_id)
}

/// Messages of a conversation in insertion order, with senders and
/// reactions attached
pub async fn messages_for_conversation(
    pool: &PgPool,
    conversation_id: Uuid,
) -> Result<Vec<MessageView>, sqlx::Error> {
    let message_rows = sqlx::query(
        r#"
        SELECT m.id, m.content, m.created_at,
               u.id AS sender_id, u.username AS sender_username,
               u.message_color AS sender_color
        FROM messages m
        INNER JOIN users u ON u.id = m.sender_id
        WHERE m.conversation_id = $1
        ORDER BY m.created_at ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    // One query for all reactions of the conversation, grouped by
    // message afterwards
    let reaction_rows = sqlx::query(
        r#"
        SELECT r.id, r.message_id, r.emoji,
               u.id AS user_id, u.username
        FROM reactions r
        INNER JOIN users u ON u.id = r.user_id
        INNER JOIN messages m ON m.id = r.message_id
        WHERE m.conversation_id = $1
        ORDER BY r.created_at ASC
        "#,
    )
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    let mut reactions_by_message: HashMap<Uuid, Vec<ReactionView>> = HashMap::new();
    for row in reaction_rows {
        let message_id: Uuid = row.get("message_id");
        reactions_by_message
            .entry(message_id)
            .or_default()
            .push(ReactionView {
                id: row.get("id"),
                emoji: row.get("emoji"),
                user: ReactionUser {
                    id: row.get("user_id"),
                    username: row.get("username"),
                },
            });
    }

    Ok(message_rows
        .into_iter()
        .map(|row| {
            let message_id: Uuid = row.get("id");
            MessageView {
                id: message_id,
                content: row.get("content"),
                sender: UserSummary {
                    id: row.get("sender_id"),
                    username: row.get("sender_username"),
                    message_color: row.get("sender_color"),
                },
                reactions: reactions_by_message.remove(&message_id).unwrap_or_default(),
                created_at: row.get("created_at"),
            }
        })
        .collect())
}

/// One message with its sender and reactions
///
/// Returns `None` when the message does not exist.
pub async fn message_view(
    pool: &PgPool,
    message_id: Uuid,
) -> Result<Option<MessageView>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT m.id, m.content, m.created_at,
               u.id AS sender_id, u.username AS sender_username,
               u.message_color AS sender_color
        FROM messages m
        INNER JOIN users u ON u.id = m.sender_id
        WHERE m.id = $1
        "#,
    )
    .bind(message_id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let reaction_rows = sqlx::query(
        r#"
        SELECT r.id, r.emoji, u.id AS user_id, u.username
        FROM reactions r
        INNER JOIN users u ON u.id = r.user_id
        WHERE r.message_id = $1
        ORDER BY r.created_at ASC
        "#,
    )
    .bind(message_id)
    .fetch_all(pool)
    .await?;

    let reactions = reaction_rows
        .into_iter()
        .map(|r| ReactionView {
            id: r.get("id"),
            emoji: r.get("emoji"),
            user: ReactionUser {
                id: r.get("user_id"),
                username: r.get("username"),
            },
        })
        .collect();

    Ok(Some(MessageView {
        id: row.get("id"),
        content: row.get("content"),
        sender: UserSummary {
            id: row.get("sender_id"),
            username: row.get("sender_username"),
            message_color: row.get("sender_color"),
        },
        reactions,
        created_at: row.get("created_at"),
    }))
}

/// The conversation a message belongs to, if the message exists
pub async fn message_conversation_id(
    pool: &PgPool,
    message_id: Uuid,
) -> Result<Option<Uuid>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT conversation_id FROM messages WHERE id = $1
        "#,
    )
    .bind(message_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| r.get("conversation_id")))
}

/// Add an emoji reaction to a message.
///
/// Returns false when this user already added this emoji to this
/// message; the reaction is never double-counted.
pub async fn add_reaction(
    pool: &PgPool,
    message_id: Uuid,
    user_id: Uuid,
    emoji: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO reactions (id, message_id, user_id, emoji, created_at)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (user_id, message_id, emoji) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(message_id)
    .bind(user_id)
    .bind(emoji)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Remove an emoji reaction from a message.
///
/// Returns false when no such reaction exists.
pub async fn remove_reaction(
    pool: &PgPool,
    message_id: Uuid,
    user_id: Uuid,
    emoji: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        DELETE FROM reactions
        WHERE message_id = $1 AND user_id = $2 AND emoji = $3
        "#,
    )
    .bind(message_id)
    .bind(user_id)
    .bind(emoji)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// The most recent message of a conversation, if any
async fn latest_message(
    pool: &PgPool,
    conversation_id: Uuid,
) -> Result<Option<MessageView>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT m.id, m.content, m.created_at,
               u.id AS sender_id, u.username AS sender_username,
               u.message_color AS sender_color
        FROM messages m
        INNER JOIN users u ON u.id = m.sender_id
        WHERE m.conversation_id = $1
        ORDER BY m.created_at DESC
        LIMIT 1
        "#,
    )
    .bind(conversation_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| MessageView {
        id: row.get("id"),
        content: row.get("content"),
        sender: UserSummary {
            id: row.get("sender_id"),
            username: row.get("sender_username"),
            message_color: row.get("sender_color"),
        },
        // The dashboard preview does not render reactions
        reactions: Vec::new(),
        created_at: row.get("created_at"),
    }))
}
