/**
 * Reaction Handlers
 *
 * Handlers for message reactions:
 *
 * - `POST   /api/chat/{conversation_id}/messages/{message_id}/reactions`
 * - `DELETE /api/chat/{conversation_id}/messages/{message_id}/reactions`
 *
 * A reaction is (user, message, emoji), unique as a triple. Adding one
 * that already exists is a conflict, never a double count; removing
 * one that does not exist is an error, never a silent success. Either
 * change pushes a `reaction-update` with the refreshed message to the
 * conversation's room.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::backend::chat::db;
use crate::backend::chat::handlers::types::ReactionRequest;
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::realtime::registry::RoomId;
use crate::backend::server::state::AppState;
use crate::shared::chat::MessageView;
use crate::shared::event::BroadcastEvent;

/// Validate the request target and the caller's membership.
///
/// The message must exist and belong to the conversation in the path,
/// and the caller must be a participant.
async fn check_reaction_target(
    pool: &PgPool,
    conversation_id: Uuid,
    message_id: Uuid,
    user_id: Uuid,
) -> Result<(), ApiError> {
    let owning_conversation = db::message_conversation_id(pool, message_id)
        .await?
        .ok_or(ApiError::NotFound("Message"))?;
    if owning_conversation != conversation_id {
        return Err(ApiError::NotFound("Message"));
    }
    if !db::is_participant(pool, conversation_id, user_id).await? {
        return Err(ApiError::NotAParticipant);
    }
    Ok(())
}

/// Broadcast the refreshed message after its reactions changed
async fn broadcast_reaction_update(
    state: &AppState,
    pool: &PgPool,
    conversation_id: Uuid,
    message_id: Uuid,
) -> Result<MessageView, ApiError> {
    let message = db::message_view(pool, message_id)
        .await?
        .ok_or(ApiError::NotFound("Message"))?;

    state.broadcaster.emit_to_room(
        RoomId::new(conversation_id),
        &BroadcastEvent::reaction_update(&message),
    );

    Ok(message)
}

/// Add an emoji reaction to a message
///
/// # Errors
///
/// * `400 Bad Request` - Empty emoji
/// * `403 Forbidden` - Caller is not a participant
/// * `404 Not Found` - Message does not exist in this conversation
/// * `409 Conflict` - Caller already added this emoji to this message
pub async fn add_reaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((conversation_id, message_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<ReactionRequest>,
) -> Result<Json<MessageView>, ApiError> {
    let pool = state.pool()?;

    if request.emoji.trim().is_empty() {
        return Err(ApiError::validation("Emoji cannot be empty"));
    }

    check_reaction_target(pool, conversation_id, message_id, user.user_id).await?;

    let added = db::add_reaction(pool, message_id, user.user_id, &request.emoji).await?;
    if !added {
        return Err(ApiError::DuplicateReaction);
    }

    tracing::info!(
        message_id = %message_id,
        user_id = %user.user_id,
        emoji = %request.emoji,
        "reaction added"
    );

    let message = broadcast_reaction_update(&state, pool, conversation_id, message_id).await?;
    Ok(Json(message))
}

/// Remove an emoji reaction from a message
///
/// # Errors
///
/// * `403 Forbidden` - Caller is not a participant
/// * `404 Not Found` - Message or reaction does not exist
pub async fn remove_reaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((conversation_id, message_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<ReactionRequest>,
) -> Result<Json<MessageView>, ApiError> {
    let pool = state.pool()?;

    check_reaction_target(pool, conversation_id, message_id, user.user_id).await?;

    let removed = db::remove_reaction(pool, message_id, user.user_id, &request.emoji).await?;
    if !removed {
        return Err(ApiError::ReactionNotFound);
    }

    tracing::info!(
        message_id = %message_id,
        user_id = %user.user_id,
        emoji = %request.emoji,
        "reaction removed"
    );

    let message = broadcast_reaction_update(&state, pool, conversation_id, message_id).await?;
    Ok(Json(message))
}
