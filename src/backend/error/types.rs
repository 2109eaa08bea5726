/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in HTTP handlers and can be converted to HTTP
 * responses.
 *
 * # Error Categories
 *
 * ## API Errors
 *
 * Chat handlers return `ApiError`, which maps each failure to an HTTP
 * status: missing records, duplicate reactions, non-participants, bad
 * input, and persistence failures.
 *
 * ## Connection Errors
 *
 * The realtime layer has its own `ConnectError` (see
 * `realtime::session`); those never become HTTP responses - they are
 * handled at the connection boundary by disconnecting.
 */

use axum::http::StatusCode;
use thiserror::Error;

/// Errors produced by the chat API handlers
///
/// Each variant carries enough context for the response body and maps
/// to exactly one HTTP status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The caller is not authenticated
    #[error("Unauthorized")]
    Unauthorized,

    /// The caller is authenticated but not a participant of the
    /// conversation they are acting on
    #[error("Not a participant of this conversation")]
    NotAParticipant,

    /// A referenced record does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The same user already reacted with the same emoji
    #[error("Reaction already added to this message")]
    DuplicateReaction,

    /// Removing a reaction that was never added
    #[error("Reaction not found")]
    ReactionNotFound,

    /// Request payload failed validation
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable error message
        message: String,
    },

    /// The server is running without a database
    #[error("Database not configured")]
    DatabaseUnavailable,

    /// Persistence failure
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ApiError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Unauthorized` - 401
    /// - `NotAParticipant` - 403
    /// - `NotFound` / `ReactionNotFound` - 404
    /// - `DuplicateReaction` - 409
    /// - `Validation` - 400
    /// - `DatabaseUnavailable` - 503
    /// - `Database` - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotAParticipant => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::DuplicateReaction => StatusCode::CONFLICT,
            Self::ReactionNotFound => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message for the response body
    ///
    /// Database errors are not echoed to clients; they collapse to a
    /// generic message while the detail goes to the log.
    pub fn message(&self) -> String {
        match self {
            Self::Database(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}
