/**
 * Authentication Handler Types
 *
 * This module defines the request and response types used by the
 * authentication handlers. They are shared across signup, login,
 * logout, me, and profile handlers.
 */

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::auth::users::User;

/// Sign up request
///
/// Contains the identity and credentials for user registration, plus
/// an optional chat message color.
#[derive(Deserialize, Serialize, Debug)]
pub struct SignupRequest {
    /// User's email address
    pub email: String,
    /// User's chosen username (3-30 chars, alphanumeric + underscore)
    pub username: String,
    /// User's password (will be hashed before storage)
    pub password: String,
    /// Optional hex message color; a default is assigned when omitted
    #[serde(default, rename = "messageColor")]
    pub message_color: Option<String>,
}

/// Login request
#[derive(Deserialize, Serialize, Debug)]
pub struct LoginRequest {
    /// User's email address
    pub email: String,
    /// User's password (will be verified against stored hash)
    pub password: String,
}

/// Profile update request
///
/// Both fields optional; omitted fields are left unchanged.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct UpdateProfileRequest {
    /// New username
    pub username: Option<String>,
    /// New hex message color
    #[serde(default, rename = "messageColor")]
    pub message_color: Option<String>,
}

/// Auth response
///
/// Returned by signup and login handlers. Contains the JWT token
/// and user information for immediate authentication.
#[derive(Serialize, Deserialize, Debug)]
pub struct AuthResponse {
    /// JWT token for authentication (30-day expiration)
    pub token: String,
    /// User information (without sensitive data)
    pub user: UserResponse,
}

/// User response (without sensitive data)
///
/// Contains user information that is safe to return to clients.
/// Does not include the password hash.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// User's unique ID (UUID)
    pub id: Uuid,
    /// User's username
    pub username: String,
    /// User's email address
    pub email: String,
    /// Hex color used for this user's chat messages
    pub message_color: String,
    /// Whether the user is currently logged in
    pub is_online: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            message_color: user.message_color.clone(),
            is_online: user.is_online,
        }
    }
}

/// Plain acknowledgement body
#[derive(Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    /// Human-readable outcome
    pub message: String,
}
