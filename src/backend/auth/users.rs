/**
 * User Model and Database Operations
 *
 * This module handles user data and database operations.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::shared::chat::UserSummary;

/// Default message color assigned at signup when none is chosen
pub const DEFAULT_MESSAGE_COLOR: &str = "#3B82F6";

/// User struct representing a user in the database
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID)
    pub id: uuid::Uuid,
    /// Username (unique, 3-30 chars, alphanumeric + underscore)
    pub username: String,
    /// User email address
    pub email: String,
    /// Hashed password (bcrypt)
    pub password_hash: String,
    /// Hex color used for this user's chat messages
    pub message_color: String,
    /// Whether the user is currently logged in
    pub is_online: bool,
    /// Created at timestamp
    pub created_at: DateTime<Utc>,
    /// Updated at timestamp
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Reduce to the summary shape used inside conversations
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            username: self.username.clone(),
            message_color: self.message_color.clone(),
        }
    }
}

/// Create a new user
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `username` - User's chosen username
/// * `email` - User email
/// * `password_hash` - Hashed password
/// * `message_color` - Chat message color (hex)
///
/// # Returns
/// Created user or error
pub async fn create_user(
    pool: &PgPool,
    username: String,
    email: String,
    password_hash: String,
    message_color: String,
) -> Result<User, sqlx::Error> {
    let id = uuid::Uuid::new_v4();
    let now = Utc::now();

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, username, email, password_hash, message_color, is_online, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, FALSE, $6, $7)
        RETURNING id, username, email, password_hash, message_color, is_online, created_at, updated_at
        "#
    )
    .bind(id)
    .bind(&username)
    .bind(&email)
    .bind(&password_hash)
    .bind(&message_color)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// Get user by email
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `email` - User email
///
/// # Returns
/// User or None if not found
pub async fn get_user_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, message_color, is_online, created_at, updated_at
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get user by username
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `username` - Username
///
/// # Returns
/// User or None if not found
pub async fn get_user_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, message_color, is_online, created_at, updated_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Get user by ID
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `id` - User ID
///
/// # Returns
/// User or None if not found
pub async fn get_user_by_id(pool: &PgPool, id: uuid::Uuid) -> Result<Option<User>, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, message_color, is_online, created_at, updated_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// Set a user's online flag
///
/// Flipped by login and logout only; the realtime layer never touches
/// presence.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `user_id` - User ID
/// * `is_online` - New online state
pub async fn set_online(
    pool: &PgPool,
    user_id: uuid::Uuid,
    is_online: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE users
        SET is_online = $1, updated_at = $2
        WHERE id = $3
        "#,
    )
    .bind(is_online)
    .bind(Utc::now())
    .bind(user_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Update a user's profile fields
///
/// Only the provided fields change; `None` leaves a column untouched.
///
/// # Arguments
/// * `pool` - Database connection pool
/// * `user_id` - User ID
/// * `username` - New username, if changing
/// * `message_color` - New message color, if changing
///
/// # Returns
/// Updated user or error
pub async fn update_profile(
    pool: &PgPool,
    user_id: uuid::Uuid,
    username: Option<&str>,
    message_color: Option<&str>,
) -> Result<User, sqlx::Error> {
    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users
        SET username = COALESCE($1, username),
            message_color = COALESCE($2, message_color),
            updated_at = $3
        WHERE id = $4
        RETURNING id, username, email, password_hash, message_color, is_online, created_at, updated_at
        "#,
    )
    .bind(username)
    .bind(message_color)
    .bind(Utc::now())
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// List all users ordered by username
///
/// Backs the user directory used to start conversations.
pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, message_color, is_online, created_at, updated_at
        FROM users
        ORDER BY username ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}
