/**
 * User Directory Handler
 *
 * This module implements the handler for GET /api/users, the
 * directory clients browse when starting a new conversation.
 */

use axum::{extract::State, http::StatusCode, response::Json};
use sqlx::PgPool;

use crate::backend::auth::handlers::types::UserResponse;
use crate::backend::auth::users::list_users;
use crate::backend::middleware::auth::AuthUser;

/// List all users, ordered by username
///
/// # Errors
///
/// * `401 Unauthorized` - Missing or invalid token
/// * `503 Service Unavailable` - Database is not configured
/// * `500 Internal Server Error` - Database query failed
pub async fn get_users(
    State(pool): State<Option<PgPool>>,
    AuthUser(_user): AuthUser,
) -> Result<Json<Vec<UserResponse>>, StatusCode> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        StatusCode::SERVICE_UNAVAILABLE
    })?;

    let users = list_users(&pool).await.map_err(|e| {
        tracing::error!("Database error: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(users.iter().map(UserResponse::from).collect()))
}
