//! User Password Value Object
//!
//! Domain wrappers around `platform::password`. The raw secret is
//! zeroized on drop and never leaves this module in clear; the stored
//! form is an opaque hash string.
//!
//! ## Usage
//! ```rust,ignore
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//! use platform::password::PasswordHasher;
//!
//! let hasher = PasswordHasher::default();
//! let raw = RawPassword::new("admin".to_string())?;
//! let hashed = UserPassword::from_raw(&raw, &hasher)?;
//! assert!(hashed.verify(&raw, &hasher));
//! ```

use platform::password::{
    ClearTextPassword, HashAlgorithm, HashedPassword, PasswordHashError, PasswordHasher,
    PasswordInputError,
};
use std::fmt;

use crate::error::{AuthError, AuthResult};

// ============================================================================
// Raw Password (User Input)
// ============================================================================

/// Raw password from user input
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    pub fn new(raw: String) -> AuthResult<Self> {
        let clear_text = ClearTextPassword::new(raw).map_err(|e| match e {
            PasswordInputError::Empty => {
                AuthError::InvalidPassword("password cannot be empty".to_string())
            }
            PasswordInputError::TooLong { max, actual } => AuthError::InvalidPassword(format!(
                "password must be at most {max} characters (got {actual})"
            )),
        })?;

        Ok(Self(clear_text))
    }

    pub(crate) fn inner(&self) -> &ClearTextPassword {
        &self.0
    }

    /// Costs as much as [`UserPassword::verify`]; always false
    pub fn verify_missing(&self, hasher: &PasswordHasher) -> bool {
        hasher.verify_missing(&self.0)
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawPassword").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// User Password (Hashed, for storage)
// ============================================================================

/// Hashed user password as kept in the credential store
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    /// Hash a raw password.
    ///
    /// Fails closed: if the primitive rejects its parameters nothing is
    /// returned that could be stored.
    pub fn from_raw(raw: &RawPassword, hasher: &PasswordHasher) -> AuthResult<Self> {
        let hashed = hasher.hash(raw.inner()).map_err(|e| match e {
            PasswordHashError::HashingFailed(msg) => AuthError::HashingFailure(msg),
            PasswordHashError::InputTooLong { max_bytes } => AuthError::InvalidPassword(format!(
                "password must be at most {max_bytes} bytes with the configured algorithm"
            )),
            PasswordHashError::InvalidHashFormat => {
                AuthError::HashingFailure("primitive produced an invalid hash".to_string())
            }
        })?;

        Ok(Self(hashed))
    }

    /// Restore a previously stored hash
    pub fn from_stored(stored: impl Into<String>) -> AuthResult<Self> {
        let hashed = HashedPassword::from_stored(stored)
            .map_err(|_| AuthError::Internal("Invalid stored password hash".to_string()))?;

        Ok(Self(hashed))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Constant-time check of `raw` against this hash
    pub fn verify(&self, raw: &RawPassword, hasher: &PasswordHasher) -> bool {
        hasher.verify(raw.inner(), &self.0)
    }

    pub fn needs_rehash(&self, algorithm: &HashAlgorithm) -> bool {
        self.0.needs_rehash(algorithm)
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

impl fmt::Display for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[HASHED_PASSWORD]")
    }
}

// ============================================================================
// Tests
// ============================================================================
