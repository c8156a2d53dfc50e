//! Off-lock password hashing
//!
//! Hashing is CPU-bound by design; it runs on the blocking pool and
//! always completes before any store lock is taken.

use platform::password::PasswordHasher;

use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::AuthResult;

/// Result of checking a password against a stored hash
#[derive(Debug)]
pub enum Verification {
    Invalid,
    /// `upgraded` carries a fresh hash when the stored one uses an
    /// outdated algorithm or cost
    Valid { upgraded: Option<UserPassword> },
}

impl Verification {
    pub fn is_valid(&self) -> bool {
        matches!(self, Verification::Valid { .. })
    }
}

/// Hash `raw` on the blocking pool
pub async fn hash_password(hasher: PasswordHasher, raw: RawPassword) -> AuthResult<UserPassword> {
    tokio::task::spawn_blocking(move || UserPassword::from_raw(&raw, &hasher)).await?
}

/// Verify `raw` against `stored` on the blocking pool.
///
/// On success the hash is recomputed with the configured algorithm if the
/// stored one is outdated. A failure to rehash is logged and ignored; the
/// login itself already succeeded.
pub async fn verify_password(
    hasher: PasswordHasher,
    stored: UserPassword,
    raw: RawPassword,
) -> AuthResult<Verification> {
    let verification = tokio::task::spawn_blocking(move || {
        if !stored.verify(&raw, &hasher) {
            return Verification::Invalid;
        }

        if !stored.needs_rehash(hasher.algorithm()) {
            return Verification::Valid { upgraded: None };
        }

        match UserPassword::from_raw(&raw, &hasher) {
            Ok(fresh) => Verification::Valid {
                upgraded: Some(fresh),
            },
            Err(e) => {
                tracing::warn!(error = %e, "Password rehash failed");
                Verification::Valid { upgraded: None }
            }
        }
    })
    .await?;

    Ok(verification)
}

/// Burn one verification on the blocking pool for an unknown identity
pub async fn verify_missing(hasher: PasswordHasher, raw: RawPassword) -> AuthResult<()> {
    tokio::task::spawn_blocking(move || raw.verify_missing(&hasher)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::password::{HashAlgorithm, MIN_BCRYPT_COST};

    fn bcrypt(cost: u32) -> PasswordHasher {
        PasswordHasher::new(HashAlgorithm::Bcrypt { cost })
    }

    fn raw(s: &str) -> RawPassword {
        RawPassword::new(s.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_hash_then_verify() {
        let hasher = bcrypt(MIN_BCRYPT_COST);
        let stored = hash_password(hasher.clone(), raw("pw")).await.unwrap();

        let ok = verify_password(hasher.clone(), stored.clone(), raw("pw"))
            .await
            .unwrap();
        assert!(matches!(ok, Verification::Valid { upgraded: None }));

        let bad = verify_password(hasher, stored, raw("nope")).await.unwrap();
        assert!(!bad.is_valid());
    }

    #[tokio::test]
    async fn test_outdated_cost_is_upgraded() {
        let stored = hash_password(bcrypt(MIN_BCRYPT_COST), raw("pw")).await.unwrap();

        let stronger = bcrypt(MIN_BCRYPT_COST + 1);
        let Verification::Valid {
            upgraded: Some(fresh),
        } = verify_password(stronger.clone(), stored, raw("pw")).await.unwrap()
        else {
            panic!("expected an upgraded hash");
        };

        assert!(!fresh.needs_rehash(stronger.algorithm()));
        assert!(fresh.verify(&raw("pw"), &stronger));
    }

    #[tokio::test]
    async fn test_verify_missing_does_the_work() {
        let hasher = bcrypt(MIN_BCRYPT_COST);
        verify_missing(hasher.clone(), raw("pw")).await.unwrap();

        // Input the primitive refuses still completes
        verify_missing(hasher, raw(&"a".repeat(100))).await.unwrap();
    }

    #[tokio::test]
    async fn test_failing_primitive_stores_nothing() {
        let result = hash_password(bcrypt(99), raw("pw")).await;
        assert!(matches!(
            result,
            Err(crate::error::AuthError::HashingFailure(_))
        ));
    }
}
