//! Realtime Conversation Synchronization
//!
//! This module is the realtime layer of the server: it binds
//! authenticated WebSocket connections to conversation rooms and fans
//! out message, reaction, and wizz events to them.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs      - Module exports and documentation
//! ├── registry.rs - Connection/room registry and event fan-out
//! ├── session.rs  - Channel session lifecycle and membership resolution
//! └── gateway.rs  - WebSocket endpoint driving sessions
//! ```
//!
//! # Design
//!
//! The registry is an explicit object owned by the [`Broadcaster`] and
//! injected wherever emission is needed - never ambient process-wide
//! state - so tests can build one with fake connections and assert on
//! deliveries. Rooms are typed conversation ids. Events carrying
//! conversation content are emitted to their room (or to a specific
//! user's connections), not globally.
//!
//! Delivery is best-effort, at most once. There is no queueing for
//! offline recipients and no acknowledgement; a client that misses an
//! event recovers through its normal REST fetch.

/// Connection/room registry and event fan-out
pub mod registry;

/// Channel session lifecycle and membership resolution
pub mod session;

/// WebSocket endpoint driving sessions
pub mod gateway;

// Re-export commonly used types
pub use gateway::channel_upgrade;
pub use registry::{Broadcaster, ClientConnection, ConnectionId, RoomId};
pub use session::{ChannelSession, ConnectError, SessionState};
