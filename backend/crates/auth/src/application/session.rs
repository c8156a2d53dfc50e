//! Session Manager
//!
//! Issues, resolves and revokes remember-me tokens. The cookie carries
//! `TokenId::sign(Session)`; the registry maps the bare id to one identity.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::SessionRegistry;
use crate::domain::value_object::{
    identity::Identity,
    signed_token::{TokenId, TokenPurpose},
};
use crate::error::AuthResult;

pub struct SessionManager<S>
where
    S: SessionRegistry,
{
    session_registry: Arc<S>,
    config: Arc<AuthConfig>,
}

impl<S> SessionManager<S>
where
    S: SessionRegistry,
{
    pub fn new(session_registry: Arc<S>, config: Arc<AuthConfig>) -> Self {
        Self {
            session_registry,
            config,
        }
    }

    /// Bind a fresh token to `identity` and return its bearer form
    pub async fn issue(&self, identity: &Identity) -> AuthResult<String> {
        let session = AuthSession::new(identity.clone());
        let token = session
            .token_id
            .sign(TokenPurpose::Session, &self.config.session_secret);

        tracing::debug!(
            identity = %identity,
            session = session.token_id.short(),
            "Session issued"
        );

        self.session_registry.insert_session(session).await?;
        Ok(token)
    }

    /// Identity bound to `token`, or `None` for anything that does not
    /// resolve
    pub async fn resolve(&self, token: &str) -> AuthResult<Option<Identity>> {
        let Some(token_id) = self.parse(token) else {
            return Ok(None);
        };

        let session = self.session_registry.touch_session(&token_id).await?;
        Ok(session.map(|s| s.identity))
    }

    /// Revoke one token; `false` if it was not live. Never an error for
    /// malformed or already revoked tokens.
    pub async fn revoke_session(&self, token: &str) -> AuthResult<bool> {
        let Some(token_id) = self.parse(token) else {
            return Ok(false);
        };

        let removed = self.session_registry.remove_session(&token_id).await?;
        if removed {
            tracing::debug!(session = token_id.short(), "Session revoked");
        }

        Ok(removed)
    }

    /// Revoke every token bound to `identity`
    pub async fn revoke_all_for(&self, identity: &Identity) -> AuthResult<usize> {
        let removed = self.session_registry.remove_sessions_for(identity).await?;
        tracing::info!(identity = %identity, removed, "Sessions revoked");
        Ok(removed)
    }

    fn parse(&self, token: &str) -> Option<TokenId> {
        TokenId::from_signed(token, TokenPurpose::Session, &self.config.session_secret)
    }
}
