/**
 * Signup Handler
 *
 * This module implements the user registration handler for
 * POST /api/auth/signup.
 *
 * # Registration Process
 *
 * 1. Validate username, email, password, and optional message color
 * 2. Check if username or email already exists
 * 3. Hash password using bcrypt
 * 4. Create user in database
 * 5. Generate JWT token
 * 6. Return token and user info
 *
 * # Security
 *
 * - Passwords are hashed using bcrypt with DEFAULT_COST
 * - Passwords are never returned in responses
 * - JWT tokens are generated with 30-day expiration
 */

use axum::{extract::State, http::StatusCode, response::Json};
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::backend::auth::handlers::types::{AuthResponse, SignupRequest, UserResponse};
use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{
    create_user, get_user_by_email, get_user_by_username, DEFAULT_MESSAGE_COLOR,
};

/// Validate username format
///
/// Usernames must be:
/// - 3-30 characters long
/// - Contain only alphanumeric characters and underscores
/// - Start with a letter
pub(crate) fn is_valid_username(username: &str) -> bool {
    if username.len() < 3 || username.len() > 30 {
        return false;
    }

    let mut chars = username.chars();

    // First character must be a letter
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }

    // Rest can be alphanumeric or underscore
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate a hex message color: `#RGB` or `#RRGGBB`
pub(crate) fn is_valid_message_color(color: &str) -> bool {
    let Some(digits) = color.strip_prefix('#') else {
        return false;
    };
    (digits.len() == 3 || digits.len() == 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
}

/// Sign up handler
///
/// This handler processes user registration requests. It validates the
/// input, creates a new user account, and returns a JWT token for
/// immediate authentication.
///
/// # Arguments
///
/// * `State(pool)` - Database connection pool
/// * `Json(request)` - Signup request
///
/// # Returns
///
/// JSON response with JWT token and user info, or an error status code
///
/// # Errors
///
/// * `400 Bad Request` - Invalid username, email, password, or color
/// * `409 Conflict` - Username or email already taken
/// * `503 Service Unavailable` - Database is not configured
/// * `500 Internal Server Error` - Hashing, insertion, or token failure
pub async fn signup(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<SignupRequest>,
) -> Result<Json<AuthResponse>, (StatusCode, String)> {
    let pool = pool.ok_or_else(|| {
        tracing::error!("Database not configured");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "Database not configured".to_string(),
        )
    })?;
    tracing::info!(
        "Signup request for username: {}, email: {}",
        request.username,
        request.email
    );

    // Validate username format
    if !is_valid_username(&request.username) {
        tracing::warn!("Invalid username format: {}", request.username);
        return Err((
            StatusCode::BAD_REQUEST,
            "Username must be 3-30 chars, start with a letter, and contain only letters, numbers, and underscores".to_string(),
        ));
    }

    // Validate email format (basic check)
    if !request.email.contains('@') {
        tracing::warn!("Invalid email format: {}", request.email);
        return Err((StatusCode::BAD_REQUEST, "Invalid email format".to_string()));
    }

    // Validate password length
    if request.password.len() < 8 {
        tracing::warn!("Password too short");
        return Err((
            StatusCode::BAD_REQUEST,
            "Password must be at least 8 characters".to_string(),
        ));
    }

    // Validate the chosen color, defaulting when omitted
    let message_color = match request.message_color {
        Some(color) if !is_valid_message_color(&color) => {
            tracing::warn!("Invalid message color: {}", color);
            return Err((
                StatusCode::BAD_REQUEST,
                "Message color must be a hex color like #3B82F6".to_string(),
            ));
        }
        Some(color) => color,
        None => DEFAULT_MESSAGE_COLOR.to_string(),
    };

    // Check if username already exists
    if let Ok(Some(_)) = get_user_by_username(&pool, &request.username).await {
        tracing::warn!("Username already exists: {}", request.username);
        return Err((StatusCode::CONFLICT, "Username already taken".to_string()));
    }

    // Check if email already exists
    if let Ok(Some(_)) = get_user_by_email(&pool, &request.email).await {
        tracing::warn!("Email already exists: {}", request.email);
        return Err((StatusCode::CONFLICT, "Email already registered".to_string()));
    }

    // Hash password
    let password_hash = hash(&request.password, DEFAULT_COST).map_err(|e| {
        tracing::error!("Failed to hash password: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
    })?;

    // Create user
    let user = create_user(
        &pool,
        request.username.clone(),
        request.email.clone(),
        password_hash,
        message_color,
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to create user: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create user".to_string(),
        )
    })?;

    // Create token
    let token = create_token(user.id, user.email.clone()).map_err(|e| {
        tracing::error!("Failed to create token: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
    })?;

    tracing::info!("User created successfully: {} ({})", user.username, user.email);

    Ok(Json(AuthResponse {
        token,
        user: UserResponse::from(&user),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_usernames() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("alice_42"));
        assert!(is_valid_username("Bob"));
    }

    #[test]
    fn test_invalid_usernames() {
        assert!(!is_valid_username("ab"));
        assert!(!is_valid_username("1alice"));
        assert!(!is_valid_username("_alice"));
        assert!(!is_valid_username("alice!"));
        assert!(!is_valid_username(&"a".repeat(31)));
    }

    #[test]
    fn test_valid_message_colors() {
        assert!(is_valid_message_color("#3B82F6"));
        assert!(is_valid_message_color("#abc"));
        assert!(is_valid_message_color("#ABCDEF"));
    }

    #[test]
    fn test_invalid_message_colors() {
        assert!(!is_valid_message_color("3B82F6"));
        assert!(!is_valid_message_color("#12345"));
        assert!(!is_valid_message_color("#GGGGGG"));
        assert!(!is_valid_message_color(""));
    }
}
