//! Routes Module
//!
//! Route configuration for the HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs         - Module exports
//! ├── router.rs      - Router assembly, CORS, fallback
//! ├── api_routes.rs  - Auth and directory routes
//! └── chat_routes.rs - Chat routes and the realtime channel
//! ```

/// Router assembly, CORS, fallback
pub mod router;

/// Auth and directory routes
pub mod api_routes;

/// Chat routes and the realtime channel
pub mod chat_routes;

pub use router::create_router;
