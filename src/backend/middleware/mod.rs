//! Middleware Module
//!
//! Request middleware applied around route handlers.
//!
//! - **`auth`** - JWT verification for protected routes

/// JWT verification for protected routes
pub mod auth;

pub use auth::{auth_middleware, AuthUser, AuthenticatedUser};
