//! Error Module
//!
//! Error types for the backend and their conversion to HTTP responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports
//! ├── types.rs      - ApiError definition and status mapping
//! └── conversion.rs - IntoResponse implementation
//! ```

/// ApiError definition and status mapping
pub mod types;

/// IntoResponse implementation
pub mod conversion;

pub use types::ApiError;
