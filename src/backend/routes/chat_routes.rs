/**
 * Chat Route Handlers
 *
 * This module defines route configuration for the chat endpoints and
 * the realtime channel.
 *
 * # Routes
 *
 * - `POST /api/chat` - Create a conversation
 * - `GET  /api/chat` - List the caller's conversations
 * - `GET  /api/chat/{conversation_id}` - One conversation with history
 * - `POST /api/chat/{conversation_id}` - Send a message
 * - `POST /api/chat/{conversation_id}/messages/{message_id}/reactions` - Add reaction
 * - `DELETE /api/chat/{conversation_id}/messages/{message_id}/reactions` - Remove reaction
 * - `POST /api/chat/{conversation_id}/wizz` - Wizz attention ping
 * - `GET  /ws` - WebSocket channel upgrade
 *
 * All REST routes sit behind the auth middleware. The channel route is
 * public at the HTTP layer: its token travels as a query parameter and
 * is verified by the gateway itself, which drops the connection on
 * failure instead of answering 401.
 */

use axum::{middleware, Router};

use crate::backend::chat::handlers::{
    add_reaction, create_conversation, get_conversation, get_conversations, remove_reaction,
    send_message, send_wizz,
};
use crate::backend::middleware::auth::auth_middleware;
use crate::backend::realtime::gateway::channel_upgrade;
use crate::backend::server::state::AppState;

/// Chat REST routes behind the auth middleware
pub fn chat_routes(app_state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/chat",
            axum::routing::post(create_conversation).get(get_conversations),
        )
        .route(
            "/api/chat/{conversation_id}",
            axum::routing::get(get_conversation).post(send_message),
        )
        .route(
            "/api/chat/{conversation_id}/messages/{message_id}/reactions",
            axum::routing::post(add_reaction).delete(remove_reaction),
        )
        .route(
            "/api/chat/{conversation_id}/wizz",
            axum::routing::post(send_wizz),
        )
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            auth_middleware,
        ))
}

/// The realtime channel route
pub fn channel_routes() -> Router<AppState> {
    Router::new().route("/ws", axum::routing::get(channel_upgrade))
}
