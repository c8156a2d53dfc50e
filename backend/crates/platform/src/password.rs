//! Password Hashing and Verification
//!
//! Adaptive, salted one-way hashing for secrets at rest:
//! - Argon2id (memory-hard, OWASP parameters) is the default
//! - bcrypt is available with a configurable cost factor
//! - Verification detects the stored format, so hashes produced under a
//!   previous configuration keep verifying
//! - Clear text is NFKC-normalized and zeroized on drop
//!
//! ## Security Features
//! - Constant-time comparison inside both primitives
//! - Optional pepper (application-wide secret appended before hashing)
//! - Invalid cost parameters fail the operation instead of producing a
//!   weak or malformed hash
//! - bcrypt input over 72 bytes (pepper included) is rejected, never truncated

use std::fmt;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
    password_hash::SaltString,
};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

// ============================================================================
// Constants
// ============================================================================

/// Upper bound on accepted input, in Unicode code points.
pub const MAX_PASSWORD_LENGTH: usize = 1024;

/// Smallest cost bcrypt accepts.
pub const MIN_BCRYPT_COST: u32 = 4;

/// Largest cost bcrypt accepts.
pub const MAX_BCRYPT_COST: u32 = 31;

/// Cost used when bcrypt is selected without an explicit cost.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// bcrypt reads at most this many bytes of password plus pepper
pub const BCRYPT_MAX_INPUT_BYTES: usize = 72;

/// OWASP Argon2id parameters: m=19456 (19 MiB), t=2, p=1
pub const DEFAULT_ARGON2_MEMORY_KIB: u32 = 19 * 1024;
pub const DEFAULT_ARGON2_ITERATIONS: u32 = 2;
pub const DEFAULT_ARGON2_PARALLELISM: u32 = 1;

// ============================================================================
// Error Types
// ============================================================================

/// Rejected clear text input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordInputError {
    #[error("Password cannot be empty")]
    Empty,

    #[error("Password must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
}

/// Password hashing errors
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// The primitive refused to hash (cost out of range, bad parameters)
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    /// Input is longer than the algorithm can distinguish
    #[error("Password must be at most {max_bytes} bytes for this algorithm")]
    InputTooLong { max_bytes: usize },

    /// Stored value is neither a PHC Argon2 string nor a bcrypt string
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Algorithm selection
// ============================================================================

/// Hashing algorithm and its cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Argon2id {
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    },
    Bcrypt {
        cost: u32,
    },
}

impl Default for HashAlgorithm {
    fn default() -> Self {
        HashAlgorithm::Argon2id {
            memory_kib: DEFAULT_ARGON2_MEMORY_KIB,
            iterations: DEFAULT_ARGON2_ITERATIONS,
            parallelism: DEFAULT_ARGON2_PARALLELISM,
        }
    }
}

impl HashAlgorithm {
    /// bcrypt with the default cost
    pub const fn bcrypt() -> Self {
        HashAlgorithm::Bcrypt {
            cost: DEFAULT_BCRYPT_COST,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            HashAlgorithm::Argon2id { .. } => "argon2id",
            HashAlgorithm::Bcrypt { .. } => "bcrypt",
        }
    }
}

/// Format of a stored hash, detected from its prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashFormat {
    /// PHC string, `$argon2id$v=19$m=...`
    Argon2,
    /// Modular crypt format, `$2a$`, `$2b$`, `$2x$` or `$2y$`
    Bcrypt,
}

impl HashFormat {
    fn detect(hash: &str) -> Option<Self> {
        if hash.starts_with("$argon2") {
            Some(HashFormat::Argon2)
        } else if hash.starts_with("$2") {
            Some(HashFormat::Bcrypt)
        } else {
            None
        }
    }
}

// ============================================================================
// Clear Text Password (Zeroized on drop)
// ============================================================================

/// Clear text password with automatic memory zeroization
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextPassword(String);

impl ClearTextPassword {
    /// Normalize (NFKC) and accept any non-empty secret up to
    /// [`MAX_PASSWORD_LENGTH`] code points.
    ///
    /// No strength policy is applied here; accounts such as the bootstrap
    /// administrator are seeded with short secrets.
    pub fn new(raw: String) -> Result<Self, PasswordInputError> {
        let mut raw = raw;
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();

        if normalized.is_empty() {
            return Err(PasswordInputError::Empty);
        }

        let char_count = normalized.chars().count();
        if char_count > MAX_PASSWORD_LENGTH {
            return Err(PasswordInputError::TooLong {
                max: MAX_PASSWORD_LENGTH,
                actual: char_count,
            });
        }

        Ok(Self(normalized))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for ClearTextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextPassword")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Password (Safe to store)
// ============================================================================

/// Stored password hash (Argon2 PHC string or bcrypt MCF string)
#[derive(Clone, PartialEq, Eq)]
pub struct HashedPassword {
    hash: String,
}

impl HashedPassword {
    /// Accept a previously stored hash after checking its format
    pub fn from_stored(s: impl Into<String>) -> Result<Self, PasswordHashError> {
        let hash = s.into();

        match HashFormat::detect(&hash) {
            Some(HashFormat::Argon2) => {
                PasswordHash::new(&hash).map_err(|_| PasswordHashError::InvalidHashFormat)?;
            }
            // $2b$NN$ + 22 chars salt + 31 chars hash
            Some(HashFormat::Bcrypt) if hash.len() == 60 => {}
            _ => return Err(PasswordHashError::InvalidHashFormat),
        }

        Ok(Self { hash })
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    pub fn format(&self) -> Option<HashFormat> {
        HashFormat::detect(&self.hash)
    }

    /// True when this hash was not produced with `algorithm` and its
    /// exact cost parameters.
    pub fn needs_rehash(&self, algorithm: &HashAlgorithm) -> bool {
        match (self.format(), algorithm) {
            (
                Some(HashFormat::Argon2),
                HashAlgorithm::Argon2id {
                    memory_kib,
                    iterations,
                    parallelism,
                },
            ) => {
                let Ok(parsed) = PasswordHash::new(&self.hash) else {
                    return true;
                };
                parsed.algorithm != Algorithm::Argon2id.ident()
                    || parsed.params.get_decimal("m") != Some(*memory_kib)
                    || parsed.params.get_decimal("t") != Some(*iterations)
                    || parsed.params.get_decimal("p") != Some(*parallelism)
            }
            (Some(HashFormat::Bcrypt), HashAlgorithm::Bcrypt { cost }) => {
                bcrypt_cost(&self.hash) != Some(*cost)
            }
            _ => true,
        }
    }
}

impl fmt::Debug for HashedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedPassword")
            .field("hash", &"[HASH]")
            .finish()
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// Configured password hasher
#[derive(Clone, Default)]
pub struct PasswordHasher {
    algorithm: HashAlgorithm,
    pepper: Option<Vec<u8>>,
}

impl PasswordHasher {
    pub fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            algorithm,
            pepper: None,
        }
    }

    /// Append an application-wide secret to every password before hashing
    pub fn with_pepper(mut self, pepper: impl Into<Vec<u8>>) -> Self {
        self.pepper = Some(pepper.into());
        self
    }

    pub fn algorithm(&self) -> &HashAlgorithm {
        &self.algorithm
    }

    /// Hash with a fresh random salt.
    ///
    /// Two calls with the same input return different strings; both verify.
    pub fn hash(&self, password: &ClearTextPassword) -> Result<HashedPassword, PasswordHashError> {
        let input = self.peppered(password);

        let hash = match self.algorithm {
            HashAlgorithm::Argon2id {
                memory_kib,
                iterations,
                parallelism,
            } => {
                let params = Params::new(memory_kib, iterations, parallelism, None)
                    .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;
                let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

                // 128-bit random salt
                let salt = SaltString::generate(OsRng);

                argon2
                    .hash_password(input.as_slice(), &salt)
                    .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?
                    .to_string()
            }
            HashAlgorithm::Bcrypt { cost } => {
                if input.len() > BCRYPT_MAX_INPUT_BYTES {
                    return Err(PasswordHashError::InputTooLong {
                        max_bytes: BCRYPT_MAX_INPUT_BYTES,
                    });
                }
                bcrypt::hash(input.as_slice(), cost)
                    .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?
            }
        };

        Ok(HashedPassword { hash })
    }

    /// Verify `password` against `hashed`.
    ///
    /// The algorithm and its parameters are taken from the stored string,
    /// not from this hasher's configuration. A malformed stored value never
    /// verifies.
    pub fn verify(&self, password: &ClearTextPassword, hashed: &HashedPassword) -> bool {
        let input = self.peppered(password);

        match hashed.format() {
            Some(HashFormat::Argon2) => match PasswordHash::new(hashed.as_str()) {
                Ok(parsed) => Argon2::default()
                    .verify_password(input.as_slice(), &parsed)
                    .is_ok(),
                Err(_) => false,
            },
            // Longer input would be cut to a prefix that may match
            Some(HashFormat::Bcrypt) if input.len() > BCRYPT_MAX_INPUT_BYTES => false,
            Some(HashFormat::Bcrypt) => {
                bcrypt::verify(input.as_slice(), hashed.as_str()).unwrap_or(false)
            }
            None => false,
        }
    }

    /// Spend the work of one `verify` for an account that does not exist.
    ///
    /// Always false. Keeps a lookup miss as slow as a wrong password.
    pub fn verify_missing(&self, password: &ClearTextPassword) -> bool {
        let _ = self.hash(password);
        false
    }

    fn peppered(&self, password: &ClearTextPassword) -> Zeroizing<Vec<u8>> {
        let mut combined = Zeroizing::new(password.as_bytes().to_vec());
        if let Some(pepper) = &self.pepper {
            combined.extend_from_slice(pepper);
        }
        combined
    }
}

impl fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("algorithm", &self.algorithm)
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Cost field of a `$2b$NN$...` string
fn bcrypt_cost(hash: &str) -> Option<u32> {
    hash.split('$').nth(2)?.parse().ok()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_argon2() -> HashAlgorithm {
        HashAlgorithm::Argon2id {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn fast_bcrypt() -> HashAlgorithm {
        HashAlgorithm::Bcrypt {
            cost: MIN_BCRYPT_COST,
        }
    }

    fn clear(s: &str) -> ClearTextPassword {
        ClearTextPassword::new(s.to_string()).unwrap()
    }

    #[test]
    fn test_empty_password_rejected() {
        let result = ClearTextPassword::new(String::new());
        assert_eq!(result.unwrap_err(), PasswordInputError::Empty);
    }

    #[test]
    fn test_too_long_password_rejected() {
        let result = ClearTextPassword::new("a".repeat(MAX_PASSWORD_LENGTH + 1));
        assert!(matches!(result, Err(PasswordInputError::TooLong { .. })));
    }

    #[test]
    fn test_short_password_accepted() {
        assert!(ClearTextPassword::new("pw".to_string()).is_ok());
    }

    #[test]
    fn test_argon2_hash_and_verify() {
        let hasher = PasswordHasher::new(fast_argon2());
        let hashed = hasher.hash(&clear("admin")).unwrap();

        assert!(hashed.as_str().starts_with("$argon2id$"));
        assert!(hasher.verify(&clear("admin"), &hashed));
        assert!(!hasher.verify(&clear("wrong"), &hashed));
    }

    #[test]
    fn test_bcrypt_hash_and_verify() {
        let hasher = PasswordHasher::new(fast_bcrypt());
        let hashed = hasher.hash(&clear("admin")).unwrap();

        assert!(hashed.as_str().starts_with("$2"));
        assert!(hasher.verify(&clear("admin"), &hashed));
        assert!(!hasher.verify(&clear("Admin"), &hashed));
    }

    #[test]
    fn test_default_algorithm_is_owasp_argon2id() {
        let hasher = PasswordHasher::default();
        let hashed = hasher.hash(&clear("correct horse")).unwrap();
        assert!(hashed.as_str().contains("m=19456,t=2,p=1"));
        assert!(hasher.verify(&clear("correct horse"), &hashed));
    }

    #[test]
    fn test_hash_is_salted() {
        for algorithm in [fast_argon2(), fast_bcrypt()] {
            let hasher = PasswordHasher::new(algorithm);
            let first = hasher.hash(&clear("same secret")).unwrap();
            let second = hasher.hash(&clear("same secret")).unwrap();

            assert_ne!(first, second);
            assert!(hasher.verify(&clear("same secret"), &first));
            assert!(hasher.verify(&clear("same secret"), &second));
        }
    }

    #[test]
    fn test_bcrypt_cost_out_of_range_fails_closed() {
        let too_low = PasswordHasher::new(HashAlgorithm::Bcrypt { cost: 3 });
        assert!(matches!(
            too_low.hash(&clear("admin")),
            Err(PasswordHashError::HashingFailed(_))
        ));

        let too_high = PasswordHasher::new(HashAlgorithm::Bcrypt { cost: 32 });
        assert!(too_high.hash(&clear("admin")).is_err());
    }

    #[test]
    fn test_invalid_argon2_params_fail_closed() {
        let hasher = PasswordHasher::new(HashAlgorithm::Argon2id {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });
        assert!(matches!(
            hasher.hash(&clear("admin")),
            Err(PasswordHashError::HashingFailed(_))
        ));
    }

    #[test]
    fn test_verify_across_algorithms() {
        let bcrypt_hasher = PasswordHasher::new(fast_bcrypt());
        let legacy = bcrypt_hasher.hash(&clear("admin")).unwrap();

        let argon2_hasher = PasswordHasher::new(fast_argon2());
        assert!(argon2_hasher.verify(&clear("admin"), &legacy));
        assert!(legacy.needs_rehash(argon2_hasher.algorithm()));
        assert!(!legacy.needs_rehash(bcrypt_hasher.algorithm()));
    }

    #[test]
    fn test_needs_rehash_on_parameter_change() {
        let hasher = PasswordHasher::new(fast_argon2());
        let hashed = hasher.hash(&clear("admin")).unwrap();

        assert!(!hashed.needs_rehash(&fast_argon2()));
        assert!(hashed.needs_rehash(&HashAlgorithm::default()));
        assert!(hashed.needs_rehash(&HashAlgorithm::bcrypt()));
    }

    #[test]
    fn test_pepper() {
        let hasher = PasswordHasher::new(fast_bcrypt()).with_pepper(b"pepper".to_vec());
        let hashed = hasher.hash(&clear("admin")).unwrap();

        assert!(hasher.verify(&clear("admin"), &hashed));

        let unpeppered = PasswordHasher::new(fast_bcrypt());
        assert!(!unpeppered.verify(&clear("admin"), &hashed));
    }

    #[test]
    fn test_stored_roundtrip() {
        let hasher = PasswordHasher::new(fast_argon2());
        let hashed = hasher.hash(&clear("admin")).unwrap();

        let restored = HashedPassword::from_stored(hashed.as_str().to_string()).unwrap();
        assert!(hasher.verify(&clear("admin"), &restored));
    }

    #[test]
    fn test_invalid_stored_hash() {
        assert!(HashedPassword::from_stored("admin").is_err());
        assert!(HashedPassword::from_stored("$2b$04$short").is_err());
        assert!(HashedPassword::from_stored("$argon2id$garbage").is_err());
    }

    #[test]
    fn test_debug_redaction() {
        let password = clear("secret");
        let debug_output = format!("{:?}", password);
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("secret"));

        let hasher = PasswordHasher::new(fast_bcrypt()).with_pepper(b"pepper-value".to_vec());
        assert!(!format!("{:?}", hasher).contains("pepper-value"));
    }

    #[test]
    fn test_nfkc_normalization() {
        let hasher = PasswordHasher::new(fast_bcrypt());
        // U+FF41 FULLWIDTH LATIN SMALL LETTER A normalizes to "a"
        let hashed = hasher.hash(&clear("\u{FF41}dmin")).unwrap();
        assert!(hasher.verify(&clear("admin"), &hashed));
    }

    #[test]
    fn test_bcrypt_rejects_input_it_would_truncate() {
        let hasher = PasswordHasher::new(fast_bcrypt());
        let prefix = "a".repeat(BCRYPT_MAX_INPUT_BYTES);

        let result = hasher.hash(&clear(&format!("{prefix}X")));
        assert!(matches!(
            result,
            Err(PasswordHashError::InputTooLong { max_bytes: 72 })
        ));

        // Exactly 72 bytes still hashes, and a longer guess never matches it
        let stored = hasher.hash(&clear(&prefix)).unwrap();
        assert!(hasher.verify(&clear(&prefix), &stored));
        assert!(!hasher.verify(&clear(&format!("{prefix}Y")), &stored));
    }

    #[test]
    fn test_bcrypt_pepper_counts_toward_limit() {
        let hasher = PasswordHasher::new(fast_bcrypt()).with_pepper(b"pepper".to_vec());
        let result = hasher.hash(&clear(&"a".repeat(BCRYPT_MAX_INPUT_BYTES - 2)));
        assert!(matches!(result, Err(PasswordHashError::InputTooLong { .. })));

        // Argon2 has no such limit
        let argon2 = PasswordHasher::new(fast_argon2()).with_pepper(b"pepper".to_vec());
        let long = "a".repeat(BCRYPT_MAX_INPUT_BYTES);
        let stored = argon2.hash(&clear(&format!("{long}X"))).unwrap();
        assert!(!argon2.verify(&clear(&format!("{long}Y")), &stored));
    }

    #[test]
    fn test_verify_missing_is_always_false() {
        for algorithm in [fast_argon2(), fast_bcrypt()] {
            let hasher = PasswordHasher::new(algorithm);
            assert!(!hasher.verify_missing(&clear("admin")));
        }
    }

    #[test]
    fn test_bcrypt_cost_parse() {
        assert_eq!(
            bcrypt_cost("$2b$12$abcdefghijklmnopqrstuuabcdefghijklmnopqrstuvwxyz01234"),
            Some(12)
        );
        assert_eq!(bcrypt_cost("nothing"), None);
    }
}
