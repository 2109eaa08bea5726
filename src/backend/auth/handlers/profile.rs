/**
 * Profile Update Handler
 *
 * This module implements the handler for PATCH /api/auth/profile,
 * which lets the authenticated user change their username and message
 * color. Omitted fields are left unchanged.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use sqlx::PgPool;

use crate::backend::auth::handlers::signup::{is_valid_message_color, is_valid_username};
use crate::backend::auth::handlers::types::{UpdateProfileRequest, UserResponse};
use crate::backend::auth::users::{get_user_by_username, update_profile};
use crate::backend::middleware::auth::AuthUser;

/// Profile update handler
///
/// Validates the requested changes with the same rules as signup and
/// applies them. A username already held by another account is a
/// conflict.
///
/// # Errors
///
/// * `400 Bad Request` - Invalid username or color
/// * `401 Unauthorized` - Missing or invalid token
/// * `409 Conflict` - Username already taken
/// * `503 Service Unavailable` - Database is not configured
/// * `500 Internal Server Error` - Database update failed
pub async fn patch_profile(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, (StatusCode, String)> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "Database not configured".to_string(),
        )
    })?;

    if let Some(ref username) = request.username {
        if !is_valid_username(username) {
            tracing::warn!("Invalid username format: {}", username);
            return Err((
                StatusCode::BAD_REQUEST,
                "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores".to_string(),
            ));
        }

        // Reject a username held by a different account
        match get_user_by_username(&pool, username).await {
            Ok(Some(existing)) if existing.id != user.user_id => {
                tracing::warn!("Username already exists: {}", username);
                return Err((StatusCode::CONFLICT, "Username already taken".to_string()));
            }
            Ok(_) => {}
            Err(e) => {
                tracing::error!("Database error: {:?}", e);
                return Err((
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error".to_string(),
                ));
            }
        }
    }

    if let Some(ref color) = request.message_color {
        if !is_valid_message_color(color) {
            tracing::warn!("Invalid message color: {}", color);
            return Err((
                StatusCode::BAD_REQUEST,
                "Message color must be a hex color like #3B82F6".to_string(),
            ));
        }
    }

    let updated = update_profile(
        &pool,
        user.user_id,
        request.username.as_deref(),
        request.message_color.as_deref(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to update profile: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to update profile".to_string(),
        )
    })?;

    tracing::info!("Profile updated for user: {}", updated.username);

    Ok(Json(UserResponse::from(&updated)))
}
