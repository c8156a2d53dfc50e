//! Repository Traits
//!
//! Interfaces for the shared auth state. Implementations live in the
//! infrastructure layer and must be safe to call from concurrent requests.

use chrono::{DateTime, Utc};

use crate::domain::entity::{auth_session::AuthSession, privilege_grant::PrivilegeGrant, user::User};
use crate::domain::value_object::{
    identity::Identity, signed_token::TokenId, user_password::UserPassword,
};
use crate::error::AuthResult;

/// Credential store trait
#[trait_variant::make(CredentialStore: Send)]
pub trait LocalCredentialStore {
    /// Insert or overwrite the record keyed by `user.identity`.
    /// Returns `true` when an existing record was replaced.
    async fn put(&self, user: User) -> AuthResult<bool>;

    /// Exact-match lookup
    async fn get(&self, identity: &Identity) -> AuthResult<Option<User>>;

    /// Check if identity exists
    async fn contains(&self, identity: &Identity) -> AuthResult<bool>;

    /// Number of stored users
    async fn count(&self) -> AuthResult<usize>;

    /// Replace the hash only if it is still `expected`.
    /// Returns `false` when the record is gone or was changed meanwhile.
    async fn replace_password(
        &self,
        identity: &Identity,
        expected: &UserPassword,
        replacement: UserPassword,
    ) -> AuthResult<bool>;
}

/// Remember-me session registry trait
#[trait_variant::make(SessionRegistry: Send)]
pub trait LocalSessionRegistry {
    /// Store a new session; an id that is already bound is an error
    async fn insert_session(&self, session: AuthSession) -> AuthResult<()>;

    /// Find a session and mark it as seen
    async fn touch_session(&self, token_id: &TokenId) -> AuthResult<Option<AuthSession>>;

    /// Delete a session; `false` if it did not exist
    async fn remove_session(&self, token_id: &TokenId) -> AuthResult<bool>;

    /// Delete all sessions bound to `identity`
    async fn remove_sessions_for(&self, identity: &Identity) -> AuthResult<usize>;
}

/// Admin privilege grant registry trait
#[trait_variant::make(PrivilegeRegistry: Send)]
pub trait LocalPrivilegeRegistry {
    /// Store a new grant; an id that is already bound is an error
    async fn insert_grant(&self, grant: PrivilegeGrant) -> AuthResult<()>;

    async fn find_grant(&self, grant_id: &TokenId) -> AuthResult<Option<PrivilegeGrant>>;

    /// Delete a grant; `false` if it did not exist
    async fn remove_grant(&self, grant_id: &TokenId) -> AuthResult<bool>;

    /// Delete all grants held by `identity`
    async fn remove_grants_for(&self, identity: &Identity) -> AuthResult<usize>;

    /// Delete all grants expired at `now`
    async fn remove_expired_grants(&self, now: DateTime<Utc>) -> AuthResult<usize>;
}
