//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (CSPRNG tokens, HMAC-SHA256, Base64url)
//! - Password hashing (Argon2id by default, bcrypt as an option)
//! - Cookie management

pub mod cookie;
pub mod crypto;
pub mod password;
