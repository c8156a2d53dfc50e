//! Privilege Grant Entity
//!
//! Server-side record behind the admin privilege marker. It exists only
//! after a successful password login of an admin and disappears on
//! logout, on expiry, on the next elevation of the same admin, or when a
//! one-shot admin action consumes it.

use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::domain::value_object::{identity::Identity, signed_token::TokenId};

#[derive(Debug, Clone)]
pub struct PrivilegeGrant {
    pub grant_id: TokenId,
    /// Admin who was elevated
    pub identity: Identity,
    pub granted_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl PrivilegeGrant {
    pub fn new(identity: Identity, ttl: Duration) -> Self {
        let granted_at = Utc::now();
        // An unrepresentable lifetime yields a grant that is already expired
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| granted_at.checked_add_signed(ttl))
            .unwrap_or(granted_at);

        Self {
            grant_id: TokenId::generate(),
            identity,
            granted_at,
            expires_at,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Identity {
        Identity::new("admin").unwrap()
    }

    #[test]
    fn test_expiry() {
        let grant = PrivilegeGrant::new(admin(), Duration::from_secs(60));

        assert!(!grant.is_expired_at(grant.granted_at));
        assert!(!grant.is_expired_at(grant.granted_at + chrono::Duration::seconds(59)));
        assert!(grant.is_expired_at(grant.granted_at + chrono::Duration::seconds(60)));
    }

    #[test]
    fn test_zero_or_huge_ttl_is_already_expired() {
        let zero = PrivilegeGrant::new(admin(), Duration::ZERO);
        assert!(zero.is_expired_at(Utc::now()));

        let huge = PrivilegeGrant::new(admin(), Duration::MAX);
        assert!(huge.is_expired_at(Utc::now()));
    }
}
