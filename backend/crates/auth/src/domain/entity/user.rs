//! User Entity
//!
//! A user account: identity, hashed secret and role.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    identity::Identity, user_password::UserPassword, user_role::UserRole,
};

/// User entity
///
/// Created at startup (seed admin) or by the admin-only add-user action.
/// Never deleted; only the password hash is ever replaced.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique, case-sensitive key
    pub identity: Identity,
    /// Hashed secret, never the raw password
    pub password_hash: UserPassword,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(identity: Identity, password_hash: UserPassword, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            identity,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Replace the hashed secret
    pub fn replace_password(&mut self, password_hash: UserPassword) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }
}
