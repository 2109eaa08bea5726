/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * `AppState` is the central state container of the server:
 * - The optional PostgreSQL connection pool
 * - The realtime broadcaster (connection/room registry)
 *
 * # Thread Safety
 *
 * Both fields are cheap to clone: the pool is internally reference
 * counted, and the broadcaster is held behind an `Arc`. The
 * broadcaster owns the only shared mutable state (its registry) and
 * guards it internally.
 *
 * # State Extraction
 *
 * The `FromRef` implementations allow Axum handlers to extract just
 * the part of the state they need - auth handlers take the pool alone,
 * chat handlers take the whole state.
 */

use axum::extract::FromRef;
use sqlx::PgPool;
use std::sync::Arc;

use crate::backend::error::ApiError;
use crate::backend::realtime::registry::Broadcaster;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    ///
    /// `None` if the database is not configured (no `DATABASE_URL`).
    /// Handlers must check before using the database.
    pub db_pool: Option<PgPool>,

    /// Realtime broadcaster
    ///
    /// The single owner of the connection/room registry. Handlers emit
    /// through it after successful writes; the channel gateway
    /// registers connections with it.
    pub broadcaster: Arc<Broadcaster>,
}

impl AppState {
    /// New state around an optional pool and a fresh broadcaster
    pub fn new(db_pool: Option<PgPool>) -> Self {
        Self {
            db_pool,
            broadcaster: Arc::new(Broadcaster::new()),
        }
    }

    /// The pool, or `DatabaseUnavailable` when running without one
    pub fn pool(&self) -> Result<&PgPool, ApiError> {
        self.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)
    }
}

/// Allow handlers to extract the optional database pool directly
impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

/// Allow handlers to extract the broadcaster directly
impl FromRef<AppState> for Arc<Broadcaster> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.broadcaster.clone()
    }
}
