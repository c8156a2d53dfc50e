//! Authorization Gate
//!
//! Decides whether a request carries admin privilege. The marker cookie
//! holds a signed grant id; the grant itself lives server-side, is
//! created only by a password login of an admin and expires after
//! `AuthConfig::privilege_ttl`. An admin holds at most one grant.

use chrono::Utc;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::privilege_grant::PrivilegeGrant;
use crate::domain::repository::{CredentialStore, PrivilegeRegistry};
use crate::domain::value_object::{
    identity::Identity,
    signed_token::{TokenId, TokenPurpose},
};
use crate::error::{AuthError, AuthResult};

pub struct AuthorizationGate<P, C>
where
    P: PrivilegeRegistry,
    C: CredentialStore,
{
    privilege_registry: Arc<P>,
    credential_store: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<P, C> AuthorizationGate<P, C>
where
    P: PrivilegeRegistry,
    C: CredentialStore,
{
    pub fn new(privilege_registry: Arc<P>, credential_store: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            privilege_registry,
            credential_store,
            config,
        }
    }

    /// Record a grant for `identity` and return the marker value.
    ///
    /// Replaces any earlier grant of the same admin and sweeps expired
    /// grants. Callers must have verified the password of an admin first.
    pub(crate) async fn grant(&self, identity: &Identity) -> AuthResult<String> {
        let replaced = self.privilege_registry.remove_grants_for(identity).await?;
        let expired = self
            .privilege_registry
            .remove_expired_grants(Utc::now())
            .await?;

        let grant = PrivilegeGrant::new(identity.clone(), self.config.privilege_ttl);
        let marker = grant
            .grant_id
            .sign(TokenPurpose::Privilege, &self.config.session_secret);

        tracing::info!(
            identity = %identity,
            grant = grant.grant_id.short(),
            replaced,
            expired,
            "Privilege granted"
        );

        self.privilege_registry.insert_grant(grant).await?;
        Ok(marker)
    }

    /// True iff `marker` names an unexpired grant whose holder is still an admin.
    /// Fails closed on any error.
    pub async fn is_privileged(&self, marker: Option<&str>) -> bool {
        self.require_privileged(marker).await.is_ok()
    }

    /// The grant behind `marker`, or `NotAuthenticated`
    pub async fn require_privileged(&self, marker: Option<&str>) -> AuthResult<PrivilegeGrant> {
        let grant_id = marker
            .and_then(|m| self.parse(m))
            .ok_or(AuthError::NotAuthenticated)?;

        let grant = self
            .privilege_registry
            .find_grant(&grant_id)
            .await?
            .ok_or(AuthError::NotAuthenticated)?;

        if grant.is_expired_at(Utc::now()) {
            self.privilege_registry.remove_grant(&grant_id).await?;
            tracing::debug!(grant = grant_id.short(), "Privilege grant expired");
            return Err(AuthError::NotAuthenticated);
        }

        // Demoted or overwritten accounts lose their grant
        let still_admin = self
            .credential_store
            .get(&grant.identity)
            .await?
            .is_some_and(|user| user.is_admin());

        if !still_admin {
            self.privilege_registry.remove_grant(&grant_id).await?;
            return Err(AuthError::NotAuthenticated);
        }

        Ok(grant)
    }

    /// Drop the grant behind `marker`, if any.
    ///
    /// Idempotent: a missing, malformed or already revoked marker is fine.
    /// Returns whether a live grant was removed.
    pub async fn revoke(&self, marker: Option<&str>) -> bool {
        let Some(grant_id) = marker.and_then(|m| self.parse(m)) else {
            return false;
        };

        self.remove(&grant_id).await
    }

    /// Use up a grant after a one-shot admin action
    pub async fn consume(&self, grant: &PrivilegeGrant) -> bool {
        self.remove(&grant.grant_id).await
    }

    async fn remove(&self, grant_id: &TokenId) -> bool {
        match self.privilege_registry.remove_grant(grant_id).await {
            Ok(removed) => {
                if removed {
                    tracing::info!(grant = grant_id.short(), "Privilege revoked");
                }
                removed
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to revoke privilege grant");
                false
            }
        }
    }

    fn parse(&self, marker: &str) -> Option<TokenId> {
        TokenId::from_signed(marker, TokenPurpose::Privilege, &self.config.session_secret)
    }
}
