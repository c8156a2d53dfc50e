//! In-Memory Repository Implementations
//!
//! Process-wide maps for users, remember-me sessions and privilege
//! grants. Each map has its own `parking_lot::RwLock`; no lock is held
//! across an `.await` and callers only ever receive clones.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use crate::domain::entity::{auth_session::AuthSession, privilege_grant::PrivilegeGrant, user::User};
use crate::domain::repository::{CredentialStore, PrivilegeRegistry, SessionRegistry};
use crate::domain::value_object::{
    identity::Identity, signed_token::TokenId, user_password::UserPassword,
};
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct Inner {
    users: RwLock<HashMap<Identity, User>>,
    sessions: RwLock<HashMap<TokenId, AuthSession>>,
    grants: RwLock<HashMap<TokenId, PrivilegeGrant>>,
}

/// In-memory auth store shared by all request handlers
#[derive(Clone, Default)]
pub struct InMemoryAuthStore {
    inner: Arc<Inner>,
}

impl InMemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live remember-me sessions
    pub fn session_count(&self) -> usize {
        self.inner.sessions.read().len()
    }

    /// Number of live privilege grants
    pub fn grant_count(&self) -> usize {
        self.inner.grants.read().len()
    }
}

// ============================================================================
// Credential Store Implementation
// ============================================================================

impl CredentialStore for InMemoryAuthStore {
    async fn put(&self, user: User) -> AuthResult<bool> {
        let replaced = self
            .inner
            .users
            .write()
            .insert(user.identity.clone(), user)
            .is_some();

        Ok(replaced)
    }

    async fn get(&self, identity: &Identity) -> AuthResult<Option<User>> {
        Ok(self.inner.users.read().get(identity).cloned())
    }

    async fn contains(&self, identity: &Identity) -> AuthResult<bool> {
        Ok(self.inner.users.read().contains_key(identity))
    }

    async fn count(&self) -> AuthResult<usize> {
        Ok(self.inner.users.read().len())
    }

    async fn replace_password(
        &self,
        identity: &Identity,
        expected: &UserPassword,
        replacement: UserPassword,
    ) -> AuthResult<bool> {
        let mut users = self.inner.users.write();

        match users.get_mut(identity) {
            Some(user) if &user.password_hash == expected => {
                user.replace_password(replacement);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

// ============================================================================
// Session Registry Implementation
// ============================================================================

impl SessionRegistry for InMemoryAuthStore {
    async fn insert_session(&self, session: AuthSession) -> AuthResult<()> {
        match self.inner.sessions.write().entry(session.token_id.clone()) {
            Entry::Occupied(_) => Err(AuthError::Internal(
                "Session token id collision".to_string(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(session);
                Ok(())
            }
        }
    }

    async fn touch_session(&self, token_id: &TokenId) -> AuthResult<Option<AuthSession>> {
        let mut sessions = self.inner.sessions.write();

        Ok(sessions.get_mut(token_id).map(|session| {
            session.touch();
            session.clone()
        }))
    }

    async fn remove_session(&self, token_id: &TokenId) -> AuthResult<bool> {
        Ok(self.inner.sessions.write().remove(token_id).is_some())
    }

    async fn remove_sessions_for(&self, identity: &Identity) -> AuthResult<usize> {
        let mut sessions = self.inner.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| &session.identity != identity);

        Ok(before - sessions.len())
    }
}

// ============================================================================
// Privilege Registry Implementation
// ============================================================================

impl PrivilegeRegistry for InMemoryAuthStore {
    async fn insert_grant(&self, grant: PrivilegeGrant) -> AuthResult<()> {
        match self.inner.grants.write().entry(grant.grant_id.clone()) {
            Entry::Occupied(_) => Err(AuthError::Internal(
                "Privilege grant id collision".to_string(),
            )),
            Entry::Vacant(slot) => {
                slot.insert(grant);
                Ok(())
            }
        }
    }

    async fn find_grant(&self, grant_id: &TokenId) -> AuthResult<Option<PrivilegeGrant>> {
        Ok(self.inner.grants.read().get(grant_id).cloned())
    }

    async fn remove_grant(&self, grant_id: &TokenId) -> AuthResult<bool> {
        Ok(self.inner.grants.write().remove(grant_id).is_some())
    }

    async fn remove_grants_for(&self, identity: &Identity) -> AuthResult<usize> {
        let mut grants = self.inner.grants.write();
        let before = grants.len();
        grants.retain(|_, grant| &grant.identity != identity);

        Ok(before - grants.len())
    }

    async fn remove_expired_grants(&self, now: DateTime<Utc>) -> AuthResult<usize> {
        let mut grants = self.inner.grants.write();
        let before = grants.len();
        grants.retain(|_, grant| !grant.is_expired_at(now));

        Ok(before - grants.len())
    }
}
