//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases and application services
//! - `infra/` - In-memory store implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Password login with optional "remember me" session
//! - Cookie login from a remember-me token
//! - Admin-only account creation behind a privilege gate
//! - Sign out revoking both privilege and session
//!
//! ## Security Model
//! - Passwords hashed with Argon2id by default, bcrypt selectable;
//!   either format keeps verifying after a configuration change
//! - Hashing runs on the blocking pool, never under a store lock
//! - Session tokens are 32 random bytes, HMAC-signed, bound server-side
//! - The admin marker is a signed server-side grant, not a client flag
//! - Unknown users and wrong passwords are indistinguishable

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::memory::InMemoryAuthStore;
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::memory::InMemoryAuthStore as AuthStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
