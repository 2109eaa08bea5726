/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP
 * server: state creation, database loading, and route configuration.
 *
 * # Initialization Process
 *
 * 1. Load optional services (database) and run migrations
 * 2. Create the application state with a fresh broadcaster
 * 3. Create and configure the router
 *
 * Nothing realtime is restored at startup: channel sessions exist only
 * while their connections do, so a restarted server simply starts with
 * an empty registry and clients reconnect.
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
///
/// # Returns
///
/// Configured Axum Router ready to serve requests
///
/// # Error Handling
///
/// The function is designed to be resilient:
/// - Missing database: the server starts and answers 503 on data routes
/// - Migration failures: logged but don't prevent startup
pub async fn create_app() -> Router<()> {
    tracing::info!("Initializing wizzchat backend server");

    // Step 1: Load optional services
    let db_pool = load_database().await;

    // Step 2: Create app state; the broadcaster starts with an empty
    // connection registry
    let app_state = AppState::new(db_pool);

    tracing::info!("Application state and broadcaster initialized");

    // Step 3: Create router with all routes
    create_router(app_state)
}
