/**
 * Wizz Handler
 *
 * Handler for POST /api/chat/{conversation_id}/wizz - the attention
 * ping. A wizz is pure broadcast: nothing is persisted, and a
 * recipient who is offline at emit time simply never sees it.
 */

use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::backend::auth::users::get_user_by_id;
use crate::backend::chat::db;
use crate::backend::chat::handlers::types::WizzResponse;
use crate::backend::error::ApiError;
use crate::backend::middleware::auth::AuthUser;
use crate::backend::realtime::registry::RoomId;
use crate::backend::server::state::AppState;
use crate::shared::event::BroadcastEvent;

/// Send a wizz to a conversation
///
/// Emits a `wizz-received` event to the conversation's room, carrying
/// the sender's identity and username so recipients can shake the
/// right window.
///
/// # Errors
///
/// * `403 Forbidden` - Caller is not a participant
/// * `404 Not Found` - Conversation does not exist
pub async fn send_wizz(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<WizzResponse>, ApiError> {
    let pool = state.pool()?;

    if !db::conversation_exists(pool, conversation_id).await? {
        return Err(ApiError::NotFound("Conversation"));
    }
    if !db::is_participant(pool, conversation_id, user.user_id).await? {
        return Err(ApiError::NotAParticipant);
    }

    let sender = get_user_by_id(pool, user.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    state.broadcaster.emit_to_room(
        RoomId::new(conversation_id),
        &BroadcastEvent::wizz(sender.id, &sender.username, conversation_id),
    );

    tracing::info!(
        conversation_id = %conversation_id,
        sender = %sender.username,
        "wizz sent"
    );

    Ok(Json(WizzResponse {
        message: "Wizz sent".to_string(),
    }))
}
