/**
 * Get Current User Handler
 *
 * This module implements the handler for GET /api/auth/me, which
 * returns information about the currently authenticated user.
 *
 * # Authentication
 *
 * This endpoint sits behind the auth middleware; the verified user id
 * arrives through the `AuthUser` extractor.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use sqlx::PgPool;

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::auth::users::get_user_by_id;
use crate::backend::middleware::auth::AuthUser;

/// Get current user handler
///
/// Returns the authenticated user's information without sensitive
/// data (no password hash).
///
/// # Errors
///
/// * `401 Unauthorized` - Missing or invalid token
/// * `404 Not Found` - User no longer exists
/// * `503 Service Unavailable` - Database is not configured
/// * `500 Internal Server Error` - Database query failed
pub async fn get_me(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<UserResponse>, StatusCode> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    let user = get_user_by_id(&pool, user.user_id)
        .await
        .map_err(|e| {
            tracing::error!("Database error: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", user.user_id);
            StatusCode::NOT_FOUND
        })?;

    Ok(Json(UserResponse::from(&user)))
}
