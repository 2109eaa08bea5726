/**
 * Message Handler
 *
 * Handler for POST /api/chat/{conversation_id}: append a message to a
 * conversation, then push the refreshed message list to the
 * conversation's room.
 *
 * # Write-then-broadcast
 *
 * The broadcast happens only after the insert succeeds. There is no
 * transaction spanning both: a successful write whose broadcast
 * reaches nobody is fine, because clients refetch over REST whenever
 * they (re)open a conversation.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::backend::chat::db;
use crate::backend::chat::handlers::types::SendMessageRequest;
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::realtime::registry::RoomId;
use crate::backend::server::state::AppState;
use crate::shared::chat::MessageView;
use crate::shared::event::BroadcastEvent;

/// Send a message in a conversation
///
/// Returns the stored message. Connected participants additionally
/// receive a `send-chat-update` event carrying the conversation's full
/// refreshed message list.
///
/// # Errors
///
/// * `400 Bad Request` - Empty message content
/// * `403 Forbidden` - Caller is not a participant
/// * `404 Not Found` - Conversation does not exist
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(conversation_id): Path<Uuid>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<MessageView>, ApiError> {
    let pool = state.pool()?;

    if request.content.trim().is_empty() {
        return Err(ApiError::validation("Message content cannot be empty"));
    }

    if !db::conversation_exists(pool, conversation_id).await? {
        return Err(ApiError::NotFound("Conversation"));
    }
    if !db::is_participant(pool, conversation_id, user.user_id).await? {
        return Err(ApiError::NotAParticipant);
    }

    let message_id =
        db::insert_message(pool, conversation_id, user.user_id, &request.content).await?;

    tracing::info!(
        conversation_id = %conversation_id,
        message_id = %message_id,
        sender = %user.user_id,
        "message stored"
    );

    // Write succeeded; push the refreshed list to the room
    let messages = db::messages_for_conversation(pool, conversation_id).await?;
    state.broadcaster.emit_to_room(
        RoomId::new(conversation_id),
        &BroadcastEvent::chat_update(&messages),
    );

    let message = messages
        .into_iter()
        .find(|m| m.id == message_id)
        .ok_or(ApiError::NotFound("Message"))?;

    Ok(Json(message))
}
