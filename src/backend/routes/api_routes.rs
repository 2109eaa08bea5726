/**
 * API Route Handlers
 *
 * This module defines route configuration for the account endpoints:
 *
 * ## Authentication
 * - `POST /api/auth/signup` - User registration
 * - `POST /api/auth/login` - User login
 * - `POST /api/auth/logout` - Mark the user offline
 * - `GET  /api/auth/me` - Get current user info
 * - `PATCH /api/auth/profile` - Update username / message color
 *
 * ## Directory
 * - `GET /api/users` - User directory
 *
 * Signup and login are public; everything else requires a JWT in the
 * `Authorization` header, enforced by the auth middleware.
 */

use axum::{middleware, Router};

use crate::backend::auth::{get_me, get_users, login, logout, patch_profile, signup};
use crate::backend::middleware::auth::auth_middleware;
use crate::backend::server::state::AppState;

/// Public authentication routes (no token required)
pub fn public_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", axum::routing::post(signup))
        .route("/api/auth/login", axum::routing::post(login))
}

/// Account routes behind the auth middleware
pub fn protected_account_routes(app_state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", axum::routing::get(get_me))
        .route("/api/auth/logout", axum::routing::post(logout))
        .route("/api/auth/profile", axum::routing::patch(patch_profile))
        .route("/api/users", axum::routing::get(get_users))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ))
}
