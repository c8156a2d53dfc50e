//! Identity Value Object
//!
//! The unique, case-sensitive key of a user account.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

/// Longest identity accepted, in characters
pub const MAX_IDENTITY_LENGTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[display("{_0}")]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Validate an identity taken from user input.
    ///
    /// The value is kept byte-for-byte: no trimming, no case folding.
    /// Lookups are exact matches.
    pub fn new(raw: impl Into<String>) -> AuthResult<Self> {
        let raw = raw.into();

        if raw.is_empty() {
            return Err(AuthError::InvalidIdentity(
                "identity cannot be empty".to_string(),
            ));
        }

        let len = raw.chars().count();
        if len > MAX_IDENTITY_LENGTH {
            return Err(AuthError::InvalidIdentity(format!(
                "identity must be at most {MAX_IDENTITY_LENGTH} characters (got {len})"
            )));
        }

        if raw.chars().any(char::is_control) {
            return Err(AuthError::InvalidIdentity(
                "identity contains control characters".to_string(),
            ));
        }

        Ok(Self(raw))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Identity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identity() {
        let identity = Identity::new("admin").unwrap();
        assert_eq!(identity.as_str(), "admin");
        assert_eq!(identity.to_string(), "admin");
    }

    #[test]
    fn test_case_sensitive() {
        assert_ne!(Identity::new("Bob").unwrap(), Identity::new("bob").unwrap());
    }

    #[test]
    fn test_not_trimmed() {
        assert_ne!(Identity::new(" bob").unwrap(), Identity::new("bob").unwrap());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(matches!(
            Identity::new(""),
            Err(AuthError::InvalidIdentity(_))
        ));
    }

    #[test]
    fn test_rejects_control_characters() {
        assert!(Identity::new("bob\n").is_err());
        assert!(Identity::new("b\0b").is_err());
    }

    #[test]
    fn test_rejects_too_long() {
        assert!(Identity::new("x".repeat(MAX_IDENTITY_LENGTH)).is_ok());
        assert!(Identity::new("x".repeat(MAX_IDENTITY_LENGTH + 1)).is_err());
    }
}
