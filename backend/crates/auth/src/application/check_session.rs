//! Check Session Use Case
//!
//! Cookie login: turns a remember-me token back into the account it
//! belongs to. Never elevates privilege; the admin marker is only granted
//! after a password check.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session::SessionManager;
use crate::domain::repository::{CredentialStore, SessionRegistry};
use crate::domain::value_object::identity::Identity;
use crate::error::{AuthError, AuthResult};

/// Session user output
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub identity: Identity,
    pub is_admin: bool,
}

/// Check session use case
pub struct CheckSessionUseCase<S, C>
where
    S: SessionRegistry,
    C: CredentialStore,
{
    sessions: SessionManager<S>,
    credential_store: Arc<C>,
}

impl<S, C> CheckSessionUseCase<S, C>
where
    S: SessionRegistry,
    C: CredentialStore,
{
    pub fn new(session_registry: Arc<S>, credential_store: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            sessions: SessionManager::new(session_registry, config),
            credential_store,
        }
    }

    /// Resolve `session_token` to its user.
    ///
    /// `NotAuthenticated` when the token does not resolve or its account
    /// no longer exists.
    pub async fn execute(&self, session_token: &str) -> AuthResult<SessionUser> {
        let identity = self
            .sessions
            .resolve(session_token)
            .await?
            .ok_or(AuthError::NotAuthenticated)?;

        let user = self
            .credential_store
            .get(&identity)
            .await?
            .ok_or(AuthError::NotAuthenticated)?;

        Ok(SessionUser {
            is_admin: user.is_admin(),
            identity: user.identity,
        })
    }

    /// Just check if session is valid (returns bool)
    pub async fn is_valid(&self, session_token: &str) -> bool {
        self.execute(session_token).await.is_ok()
    }
}
