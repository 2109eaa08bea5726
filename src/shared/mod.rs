//! Types shared across the wire boundary
//!
//! This module holds the data shapes that cross the HTTP/WebSocket
//! boundary: conversation and message views, and the broadcast event
//! envelope pushed over the realtime channel.
//!
//! # Module Structure
//!
//! ```text
//! shared/
//! ├── mod.rs   - Module exports
//! ├── chat.rs  - Conversation, message, and reaction view types
//! └── event.rs - Broadcast event envelope and event kinds
//! ```

/// Conversation, message, and reaction view types
pub mod chat;

/// Broadcast event envelope and event kinds
pub mod event;

// Re-export commonly used types
pub use chat::{ConversationSummary, ConversationView, MessageView, ReactionView, UserSummary};
pub use event::{BroadcastEvent, EventKind};
