//! Chat HTTP Handlers
//!
//! Handlers for the `/api/chat` endpoints. Every mutating handler
//! follows the same shape: validate, write through the store, then
//! hand the result to the broadcaster.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs           - Handler exports
//! ├── types.rs         - Request/response types
//! ├── conversations.rs - Create/list/read conversations
//! ├── messages.rs      - Send message
//! ├── reactions.rs     - Add/remove reactions
//! └── wizz.rs          - Wizz attention ping
//! ```

/// Request/response types
pub mod types;

/// Create/list/read conversations
pub mod conversations;

/// Send message
pub mod messages;

/// Add/remove reactions
pub mod reactions;

/// Wizz attention ping
pub mod wizz;

// Re-export handlers for route configuration
pub use conversations::{create_conversation, get_conversation, get_conversations};
pub use messages::send_message;
pub use reactions::{add_reaction, remove_reaction};
pub use wizz::send_wizz;
