//! Auth Session Entity
//!
//! A "remember me" session: a server-side binding from a random token id
//! to one identity. Sessions live until revoked or the process exits.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{identity::Identity, signed_token::TokenId};

/// Auth session entity
#[derive(Debug, Clone)]
pub struct AuthSession {
    /// Random id; the cookie carries its signed form
    pub token_id: TokenId,
    /// The one identity this token is bound to
    pub identity: Identity,
    pub created_at: DateTime<Utc>,
    /// Last time the token was presented
    pub last_seen_at: DateTime<Utc>,
}

impl AuthSession {
    /// Create a session with a freshly generated token id
    pub fn new(identity: Identity) -> Self {
        let now = Utc::now();

        Self {
            token_id: TokenId::generate(),
            identity,
            created_at: now,
            last_seen_at: now,
        }
    }

    /// Update last activity timestamp
    pub fn touch(&mut self) {
        self.last_seen_at = Utc::now();
    }
}
