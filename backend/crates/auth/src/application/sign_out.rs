//! Sign Out Use Case
//!
//! Drops the privilege grant and the remember-me session of a request.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::gate::AuthorizationGate;
use crate::application::session::SessionManager;
use crate::domain::repository::{CredentialStore, PrivilegeRegistry, SessionRegistry};
use crate::error::AuthResult;

/// What was live before sign out
#[derive(Debug, Default, Clone, Copy)]
pub struct SignOutOutput {
    pub privilege_revoked: bool,
    pub session_revoked: bool,
}

/// Sign out use case
pub struct SignOutUseCase<C, S, P>
where
    C: CredentialStore,
    S: SessionRegistry,
    P: PrivilegeRegistry,
{
    sessions: SessionManager<S>,
    gate: AuthorizationGate<P, C>,
}

impl<C, S, P> SignOutUseCase<C, S, P>
where
    C: CredentialStore,
    S: SessionRegistry,
    P: PrivilegeRegistry,
{
    pub fn new(
        credential_store: Arc<C>,
        session_registry: Arc<S>,
        privilege_registry: Arc<P>,
        config: Arc<AuthConfig>,
    ) -> Self {
        Self {
            sessions: SessionManager::new(session_registry, config.clone()),
            gate: AuthorizationGate::new(privilege_registry, credential_store, config),
        }
    }

    /// Safe to call repeatedly and with nothing to revoke
    pub async fn execute(
        &self,
        privilege_marker: Option<&str>,
        session_token: Option<&str>,
    ) -> AuthResult<SignOutOutput> {
        let privilege_revoked = self.gate.revoke(privilege_marker).await;

        let session_revoked = match session_token {
            Some(token) => self.sessions.revoke_session(token).await?,
            None => false,
        };

        tracing::info!(privilege_revoked, session_revoked, "User signed out");

        Ok(SignOutOutput {
            privilege_revoked,
            session_revoked,
        })
    }
}
