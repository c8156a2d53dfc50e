//! Value Object Module

pub mod identity;
pub mod signed_token;
pub mod user_password;
pub mod user_role;
