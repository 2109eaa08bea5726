//! Shared test fixtures and helpers

#![allow(dead_code)]

pub mod database;

use sqlx::PgPool;
use uuid::Uuid;
use wizzchat::backend::auth::users::{create_user, User};

/// Create a user with a unique username/email for test isolation
pub async fn create_test_user(pool: &PgPool, name_hint: &str) -> User {
    let suffix = &Uuid::new_v4().simple().to_string()[..8];
    let username = format!("{}_{}", name_hint, suffix);
    let email = format!("{}@example.com", username);
    let password_hash = bcrypt::hash("password123", bcrypt::DEFAULT_COST).unwrap();

    create_user(
        pool,
        username,
        email,
        password_hash,
        "#3B82F6".to_string(),
    )
    .await
    .expect("Failed to create test user")
}
