//! Authentication Module
//!
//! This module handles user authentication, registration, and session
//! management. It provides HTTP handlers for authentication endpoints
//! and manages user data and JWT tokens.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs      - Module exports and documentation
//! ├── users.rs    - User model and database operations
//! ├── sessions.rs - JWT token management
//! └── handlers/   - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Signup**: email + username + password → user created → JWT returned
//! 2. **Login**: email + password → credentials verified, user marked online → JWT returned
//! 3. **Protected requests**: JWT in the `Authorization` header, verified by middleware
//! 4. **Channel handshake**: the same JWT as a `token` query parameter on the WebSocket upgrade
//!
//! # Security
//!
//! - Passwords are hashed using bcrypt before storage
//! - JWT tokens are used for stateless authentication
//! - Tokens expire after 30 days
//! - Invalid credentials return 401 (no information leakage)

/// User data model and database operations
pub mod users;

/// JWT token generation and validation
pub mod sessions;

/// HTTP handlers for authentication endpoints
pub mod handlers;

// Re-export commonly used items
pub use handlers::{get_me, get_users, login, logout, patch_profile, signup};
pub use sessions::{create_token, verify_token, Claims};
pub use users::User;
