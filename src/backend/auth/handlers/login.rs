/**
 * Login Handler
 *
 * This module implements the user authentication handler for
 * POST /api/auth/login.
 *
 * # Authentication Process
 *
 * 1. Look up user by email
 * 2. Verify password using bcrypt
 * 3. Mark the user online
 * 4. Generate JWT token
 * 5. Return token and user info
 *
 * # Security
 *
 * - Passwords are verified using bcrypt
 * - Invalid credentials return 401 Unauthorized (no information leakage)
 * - JWT tokens are generated with 30-day expiration
 * - User passwords are never returned in responses
 */
use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::verify;
use sqlx::PgPool;

use crate::backend::auth::handlers::types::{AuthResponse, LoginRequest, UserResponse};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{get_user_by_email, set_online};

/// Login handler
///
/// This handler processes user authentication requests. It verifies
/// the email and password, flips the online flag, and returns a JWT
/// token if authentication succeeds.
///
/// # Arguments
///
/// * `State(pool)` - Database connection pool
/// * `Json(request)` - Login request containing email and password
///
/// # Returns
///
/// JSON response with JWT token and user info, or an error status code
///
/// # Errors
///
/// * `401 Unauthorized` - If user is not found or password is incorrect
/// * `503 Service Unavailable` - If database is not configured
/// * `500 Internal Server Error` - If database query or token generation fails
///
/// # Security Notes
///
/// - Invalid credentials return the same error code to prevent user enumeration
/// - Password verification uses constant-time comparison (via bcrypt)
/// - Passwords are never logged or returned in responses
pub async fn login(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, StatusCode> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        StatusCode::SERVICE_UNAVAILABLE
    })?;
    tracing::info!("Login request for: {}", request.email);

    let user = get_user_by_email(&pool, &request.email)
        .await
        .map_err(|e| {
            tracing::error!("Database error: {:?}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or_else(|| {
            tracing::warn!("User not found: {}", request.email);
            StatusCode::UNAUTHORIZED
        })?;

    // Verify password
    let valid = verify(&request.password, &user.password_hash).map_err(|e| {
        tracing::error!("Password verification error: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    if !valid {
        tracing::warn!("Invalid password for user: {}", request.email);
        return Err(StatusCode::UNAUTHORIZED);
    }

    // Mark the user online
    set_online(&pool, user.id, true).await.map_err(|e| {
        tracing::error!("Failed to update online status: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    // Create token
    let token = create_token(user.id, user.email.clone()).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    tracing::info!(
        "User logged in successfully: {} ({})",
        user.username,
        user.email
    );

    let mut response_user = UserResponse::from(&user);
    response_user.is_online = true;

    Ok(Json(AuthResponse {
        token,
        user: response_user,
    }))
}
