//! wizzchat - Main Library
//!
//! Wizzchat is a two-tier chat application: this crate is the server,
//! a browser client consumes it. It provides account management,
//! one-to-one conversations with emoji reactions, and a "wizz"
//! attention ping, with realtime delivery over a WebSocket channel.
//!
//! # Overview
//!
//! - REST API for auth, conversations, messages, and reactions (Axum)
//! - PostgreSQL persistence via sqlx
//! - bcrypt password hashing and JWT session tokens
//! - A realtime layer binding authenticated connections to
//!   per-conversation rooms and fanning out events to them
//!
//! # Module Structure
//!
//! - **`shared`** - Wire types: conversation/message views and the
//!   broadcast event envelope
//! - **`backend`** - The Axum server: handlers, persistence, the
//!   realtime channel, and bootstrap
//!
//! # Realtime Model
//!
//! Clients open `GET /ws?token=...`; the server verifies the token,
//! binds the connection to one room per conversation membership, and
//! pushes `send-chat-update`, `reaction-update`,
//! `conversation-list-update`, and `wizz-received` events as REST
//! writes land. Delivery is best-effort with no queuing for offline
//! clients - REST refetch is always a valid recovery path, so chat
//! keeps working even with the channel down.

/// Wire types shared with clients
pub mod shared;

/// The Axum server
pub mod backend;
