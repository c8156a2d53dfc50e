//! Entities

pub mod auth_session;
pub mod privilege_grant;
pub mod user;
