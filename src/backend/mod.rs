//! Backend Server
//!
//! The server side of wizzchat: an Axum HTTP server exposing the chat
//! REST API and a WebSocket channel for realtime fan-out, backed by
//! PostgreSQL.
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs       - Module exports
//! ├── main.rs      - Server binary entry point
//! ├── server/      - Configuration, state, initialization
//! ├── auth/        - Users, JWT sessions, auth handlers
//! ├── chat/        - Conversations, messages, reactions
//! ├── realtime/    - Channel sessions, rooms, broadcasting
//! ├── middleware/  - Request middleware (auth)
//! ├── routes/      - Route configuration
//! └── error/       - Error types and HTTP conversion
//! ```

/// Configuration, state, initialization
pub mod server;

/// Users, JWT sessions, auth handlers
pub mod auth;

/// Conversations, messages, reactions
pub mod chat;

/// Channel sessions, rooms, broadcasting
pub mod realtime;

/// Request middleware
pub mod middleware;

/// Route configuration
pub mod routes;

/// Error types and HTTP conversion
pub mod error;
