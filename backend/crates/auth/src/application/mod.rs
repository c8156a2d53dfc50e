//! Application Layer
//!
//! Use cases and application services.

pub mod add_user;
pub mod check_session;
pub mod config;
pub mod gate;
pub mod hashing;
pub mod session;
pub mod sign_in;
pub mod sign_out;

// Re-exports
pub use add_user::{AddUserInput, AddUserOutput, AddUserUseCase};
pub use check_session::{CheckSessionUseCase, SessionUser};
pub use config::AuthConfig;
pub use gate::AuthorizationGate;
pub use session::SessionManager;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::{SignOutOutput, SignOutUseCase};
