/**
 * Conversation Handlers
 *
 * Handlers for creating and reading conversations:
 *
 * - `POST /api/chat` - create a conversation with another user
 * - `GET  /api/chat` - list the caller's conversations
 * - `GET  /api/chat/{conversation_id}` - one conversation with history
 *
 * Creating a conversation notifies each participant's connections with
 * a `conversation-list-update` event. The new room has no bound
 * sessions yet - clients bind to it with a `join-conversation` control
 * message (or on their next reconnect).
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::backend::auth::users::get_user_by_id;
use crate::backend::chat::db;
use crate::backend::chat::handlers::types::{
    CreateConversationRequest, CreateConversationResponse,
};
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::chat::{ConversationSummary, ConversationView};
use crate::shared::event::BroadcastEvent;

/// Create a conversation with another user
///
/// # Errors
///
/// * `400 Bad Request` - Recipient is the caller
/// * `404 Not Found` - Recipient does not exist
pub async fn create_conversation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateConversationRequest>,
) -> Result<Json<CreateConversationResponse>, ApiError> {
    let pool = state.pool()?;

    if request.recipient_id == user.user_id {
        return Err(ApiError::validation(
            "Cannot start a conversation with yourself",
        ));
    }

    get_user_by_id(pool, request.recipient_id)
        .await?
        .ok_or(ApiError::NotFound("Recipient"))?;

    let conversation_id =
        db::create_conversation(pool, user.user_id, request.recipient_id).await?;

    tracing::info!(
        conversation_id = %conversation_id,
        creator = %user.user_id,
        recipient = %request.recipient_id,
        "conversation created"
    );

    // Write succeeded; notify each participant's live connections.
    // Their sessions are not bound to the new room yet, so this goes
    // per-user rather than per-room.
    let participants = db::participant_summaries(pool, conversation_id).await?;
    let usernames: Vec<String> = participants.iter().map(|p| p.username.clone()).collect();
    let event = BroadcastEvent::conversation_list_update(conversation_id, &usernames);
    for participant in &participants {
        state.broadcaster.emit_to_user(participant.id, &event);
    }

    Ok(Json(CreateConversationResponse { conversation_id }))
}

/// List the caller's conversations, most recently updated first
pub async fn get_conversations(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<ConversationSummary>>, ApiError> {
    let pool = state.pool()?;
    let conversations = db::conversations_for_user(pool, user.user_id).await?;
    Ok(Json(conversations))
}

/// One conversation with its full ordered message history
///
/// # Errors
///
/// * `403 Forbidden` - Caller is not a participant
/// * `404 Not Found` - Conversation does not exist
pub async fn get_conversation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<ConversationView>, ApiError> {
    let pool = state.pool()?;

    if !db::conversation_exists(pool, conversation_id).await? {
        return Err(ApiError::NotFound("Conversation"));
    }
    if !db::is_participant(pool, conversation_id, user.user_id).await? {
        return Err(ApiError::NotAParticipant);
    }

    let view = db::conversation_view(pool, conversation_id)
        .await?
        .ok_or(ApiError::NotFound("Conversation"))?;

    Ok(Json(view))
}
