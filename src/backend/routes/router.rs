/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Groups
 *
 * 1. Public auth routes (signup, login)
 * 2. Protected account routes (me, logout, profile, directory)
 * 3. Protected chat routes (conversations, messages, reactions, wizz)
 * 4. The realtime channel (`/ws`)
 * 5. Fallback handler (404)
 *
 * A CORS layer wraps everything so the browser client on another
 * origin can call the API and open the channel.
 */

use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::backend::routes::api_routes::{protected_account_routes, public_auth_routes};
use crate::backend::routes::chat_routes::{channel_routes, chat_routes};
use crate::backend::server::config::frontend_origin;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Arguments
///
/// * `app_state` - Application state containing the pool and broadcaster
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new()
        .merge(public_auth_routes())
        .merge(protected_account_routes(&app_state))
        .merge(chat_routes(&app_state))
        .merge(channel_routes());

    // Allow the browser client's origin
    let origin = frontend_origin();
    let allowed_origin = origin.parse::<HeaderValue>().unwrap_or_else(|_| {
        tracing::warn!("Invalid FRONTEND_URL {:?}, falling back to localhost", origin);
        HeaderValue::from_static("http://localhost:3000")
    });
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let router = router.layer(cors);

    // Fallback handler for 404
    let router = router.fallback(|| async { "404 Not Found" });

    // Use AppState as router state
    router.with_state(app_state)
}
