//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::time::Duration;

use platform::cookie::CookieConfig;
use platform::crypto::random_bytes;
use platform::password::{HashAlgorithm, PasswordHasher};

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// How long an admin stays elevated after a password login
pub const DEFAULT_PRIVILEGE_TTL: Duration = Duration::from_secs(15 * 60);

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Remember-me session cookie name
    pub session_cookie_name: String,
    /// Admin privilege marker cookie name
    pub privilege_cookie_name: String,
    /// Informational cookie set on admin login (`HH:MM:SS`)
    pub last_seen_cookie_name: String,
    /// Session secret key for HMAC signing (32 bytes)
    pub session_secret: [u8; 32],
    /// Lifetime of a privilege grant and of its marker cookie
    pub privilege_ttl: Duration,
    /// Algorithm and cost for new password hashes
    pub hash_algorithm: HashAlgorithm,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
}

/// Production defaults with a fresh random secret; tokens signed under it
/// do not survive a restart unless the secret is configured.
impl Default for AuthConfig {
    fn default() -> Self {
        let mut session_secret = [0u8; 32];
        session_secret.copy_from_slice(&random_bytes(32));

        Self {
            session_cookie_name: "session".to_string(),
            privilege_cookie_name: "admin".to_string(),
            last_seen_cookie_name: "last-seen".to_string(),
            session_secret,
            privilege_ttl: DEFAULT_PRIVILEGE_TTL,
            hash_algorithm: HashAlgorithm::default(),
            password_pepper: None,
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
        }
    }
}

impl AuthConfig {
    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::default()
        }
    }

    /// Hasher for the configured algorithm and pepper
    pub fn password_hasher(&self) -> PasswordHasher {
        let hasher = PasswordHasher::new(self.hash_algorithm);
        match &self.password_pepper {
            Some(pepper) => hasher.with_pepper(pepper.clone()),
            None => hasher,
        }
    }

    /// Remember-me cookie; no Max-Age, it lives until revoked
    pub fn session_cookie(&self) -> CookieConfig {
        self.cookie(&self.session_cookie_name, true)
    }

    /// Expires with the grant behind it
    pub fn privilege_cookie(&self) -> CookieConfig {
        CookieConfig {
            max_age_secs: Some(i64::try_from(self.privilege_ttl.as_secs()).unwrap_or(i64::MAX)),
            ..self.cookie(&self.privilege_cookie_name, true)
        }
    }

    /// Readable by scripts; carries no authority
    pub fn last_seen_cookie(&self) -> CookieConfig {
        self.cookie(&self.last_seen_cookie_name, false)
    }

    fn cookie(&self, name: &str, http_only: bool) -> CookieConfig {
        CookieConfig {
            name: name.to_string(),
            secure: self.cookie_secure,
            http_only,
            same_site: self.cookie_same_site,
            path: "/".to_string(),
            max_age_secs: None,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("session_cookie_name", &self.session_cookie_name)
            .field("privilege_cookie_name", &self.privilege_cookie_name)
            .field("last_seen_cookie_name", &self.last_seen_cookie_name)
            .field("session_secret", &"[REDACTED]")
            .field("privilege_ttl", &self.privilege_ttl)
            .field("hash_algorithm", &self.hash_algorithm.name())
            .field("password_pepper", &self.password_pepper.as_ref().map(|_| "[REDACTED]"))
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_same_site", &self.cookie_same_site)
            .finish()
    }
}
