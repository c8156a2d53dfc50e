//! Sign In Use Case
//!
//! One password login attempt: lookup, verify, optional remember-me
//! session, then privilege elevation for admins. A failed attempt is
//! final; it never issues a session and never elevates.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::gate::AuthorizationGate;
use crate::application::hashing::{Verification, verify_missing, verify_password};
use crate::application::session::SessionManager;
use crate::domain::repository::{CredentialStore, PrivilegeRegistry, SessionRegistry};
use crate::domain::value_object::{identity::Identity, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub identity: String,
    pub password: String,
    /// Remember me flag
    pub remember_me: bool,
    /// Session token already presented with this request, if any
    pub existing_session: Option<String>,
}

/// Sign in output
#[derive(Debug)]
pub struct SignInOutput {
    pub identity: Identity,
    /// Whether elevation was granted
    pub is_admin: bool,
    /// New remember-me token for the cookie, if one was issued
    pub session_token: Option<String>,
    /// Privilege marker for the cookie, admins only
    pub privilege_token: Option<String>,
}

/// Sign in use case
pub struct SignInUseCase<C, S, P>
where
    C: CredentialStore,
    S: SessionRegistry,
    P: PrivilegeRegistry,
{
    credential_store: Arc<C>,
    sessions: SessionManager<S>,
    gate: AuthorizationGate<P, C>,
    config: Arc<AuthConfig>,
}

impl<C, S, P> SignInUseCase<C, S, P>
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
            gate: AuthorizationGate::new(
                privilege_registry,
                credential_store.clone(),
                config.clone(),
            ),
            credential_store,
            config,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        // Malformed input is indistinguishable from a wrong password
        let identity =
            Identity::new(input.identity).map_err(|_| AuthError::InvalidCredentials)?;
        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        let Some(user) = self.credential_store.get(&identity).await? else {
            // Same hashing cost as a wrong password
            verify_missing(self.config.password_hasher(), raw_password).await?;
            tracing::debug!(identity = %identity, "Unknown identity");
            return Err(AuthError::InvalidCredentials);
        };

        let verification = verify_password(
            self.config.password_hasher(),
            user.password_hash.clone(),
            raw_password,
        )
        .await?;

        match verification {
            Verification::Invalid => {
                tracing::debug!(identity = %identity, "Password mismatch");
                return Err(AuthError::InvalidCredentials);
            }
            Verification::Valid {
                upgraded: Some(fresh),
            } => {
                let swapped = self
                    .credential_store
                    .replace_password(&identity, &user.password_hash, fresh)
                    .await?;
                tracing::info!(identity = %identity, swapped, "Password hash upgraded");
            }
            Verification::Valid { upgraded: None } => {}
        }

        let session_token = if input.remember_me {
            self.issue_unless_bound(&identity, input.existing_session.as_deref())
                .await?
        } else {
            None
        };

        let privilege_token = if user.is_admin() {
            Some(self.gate.grant(&identity).await?)
        } else {
            None
        };

        tracing::info!(
            identity = %identity,
            elevated = privilege_token.is_some(),
            remember_me = input.remember_me,
            "User signed in"
        );

        Ok(SignInOutput {
            identity,
            is_admin: privilege_token.is_some(),
            session_token,
            privilege_token,
        })
    }

    /// Issue a token unless the request already carries one bound to
    /// this identity
    async fn issue_unless_bound(
        &self,
        identity: &Identity,
        existing: Option<&str>,
    ) -> AuthResult<Option<String>> {
        if let Some(token) = existing {
            if self.sessions.resolve(token).await?.as_ref() == Some(identity) {
                return Ok(None);
            }
        }

        Ok(Some(self.sessions.issue(identity).await?))
    }
}
