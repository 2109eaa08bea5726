/**
 * Logout Handler
 *
 * This module implements the handler for POST /api/auth/logout, which
 * marks the authenticated user offline. Tokens are stateless and stay
 * valid until expiry; logout only updates the presence flag.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use sqlx::PgPool;

use crate::backend::auth::handlers::types::MessageResponse;
use crate::backend::auth::users::set_online;
use crate::backend::middleware::auth::AuthUser;

/// Logout handler
///
/// Marks the authenticated user offline. The user to log out comes
/// from the verified token, never from the request body.
///
/// # Errors
///
/// * `401 Unauthorized` - Missing or invalid token
/// * `503 Service Unavailable` - Database is not configured
/// * `500 Internal Server Error` - Database update failed
pub async fn logout(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<MessageResponse>, StatusCode> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    set_online(&pool, user.user_id, false).await.map_err(|e| {
        tracing::error!("Failed to update online status: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    tracing::info!("User logged out: {}", user.user_id);

    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}
