//! Server Configuration
//!
//! Read once at startup from the environment (after `.env` is loaded).

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use auth::AuthConfig;
use base64::Engine;
use base64::engine::general_purpose;
use platform::password::{DEFAULT_BCRYPT_COST, HashAlgorithm, MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_SEED_ADMIN: &str = "admin";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in production")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub auth: AuthConfig,
    pub seed_admin_user: String,
    pub seed_admin_password: String,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; `from_env` uses the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr: SocketAddr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|e| invalid("BIND_ADDR", e))?;

        let mut auth = match lookup("AUTH_SESSION_SECRET") {
            Some(secret_b64) => AuthConfig {
                session_secret: decode_secret(&secret_b64)?,
                ..AuthConfig::default()
            },
            None if cfg!(debug_assertions) => AuthConfig::default(),
            None => return Err(ConfigError::Missing("AUTH_SESSION_SECRET")),
        };

        auth.cookie_secure = match lookup("COOKIE_SECURE") {
            Some(value) => value
                .parse::<bool>()
                .map_err(|e| invalid("COOKIE_SECURE", e))?,
            None => !cfg!(debug_assertions),
        };

        auth.hash_algorithm = hash_algorithm(
            lookup("PASSWORD_HASH_ALGORITHM").as_deref(),
            lookup("PASSWORD_HASH_COST").as_deref(),
        )?;

        if let Some(secs) = lookup("PRIVILEGE_TTL_SECS") {
            let secs = secs
                .parse::<u64>()
                .map_err(|e| invalid("PRIVILEGE_TTL_SECS", e))?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    var: "PRIVILEGE_TTL_SECS",
                    reason: "must be positive".to_string(),
                });
            }
            auth.privilege_ttl = Duration::from_secs(secs);
        }

        auth.password_pepper = lookup("PASSWORD_PEPPER")
            .filter(|p| !p.is_empty())
            .map(String::into_bytes);

        Ok(Self {
            bind_addr,
            auth,
            seed_admin_user: lookup("SEED_ADMIN_USER")
                .unwrap_or_else(|| DEFAULT_SEED_ADMIN.to_string()),
            seed_admin_password: lookup("SEED_ADMIN_PASSWORD")
                .unwrap_or_else(|| DEFAULT_SEED_ADMIN.to_string()),
        })
    }
}

fn decode_secret(secret_b64: &str) -> Result<[u8; 32], ConfigError> {
    let bytes = general_purpose::STANDARD
        .decode(secret_b64.trim())
        .map_err(|e| invalid("AUTH_SESSION_SECRET", e))?;

    bytes.try_into().map_err(|bytes: Vec<u8>| ConfigError::Invalid {
        var: "AUTH_SESSION_SECRET",
        reason: format!("expected 32 bytes, got {}", bytes.len()),
    })
}

fn hash_algorithm(name: Option<&str>, cost: Option<&str>) -> Result<HashAlgorithm, ConfigError> {
    match name.unwrap_or("argon2id") {
        "argon2id" => Ok(HashAlgorithm::default()),
        "bcrypt" => {
            let cost = match cost {
                Some(c) => c.parse::<u32>().map_err(|e| invalid("PASSWORD_HASH_COST", e))?,
                None => DEFAULT_BCRYPT_COST,
            };

            if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
                return Err(ConfigError::Invalid {
                    var: "PASSWORD_HASH_COST",
                    reason: format!("must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}"),
                });
            }

            Ok(HashAlgorithm::Bcrypt { cost })
        }
        other => Err(ConfigError::Invalid {
            var: "PASSWORD_HASH_ALGORITHM",
            reason: format!("unknown algorithm {other:?}"),
        }),
    }
}

fn invalid(var: &'static str, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        var,
        reason: err.to_string(),
    }
}
