//! Authentication HTTP Handlers
//!
//! Handlers for the `/api/auth` endpoints and the user directory.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs       - Handler exports
//! ├── types.rs     - Request/response types
//! ├── signup.rs    - User registration handler
//! ├── login.rs     - User authentication handler
//! ├── logout.rs    - Presence-clearing logout handler
//! ├── me.rs        - Get current user handler
//! ├── profile.rs   - Profile update handler
//! └── directory.rs - User directory handler
//! ```

/// Request/response types
pub mod types;

/// User registration handler
pub mod signup;

/// User authentication handler
pub mod login;

/// Presence-clearing logout handler
pub mod logout;

/// Get current user handler
pub mod me;

/// Profile update handler
pub mod profile;

/// User directory handler
pub mod directory;

// Re-export handlers for route configuration
pub use directory::get_users;
pub use login::login;
pub use logout::logout;
pub use me::get_me;
pub use profile::patch_profile;
pub use signup::signup;
