//! Add User Use Case
//!
//! Creates or overwrites an account. Used for bootstrap seeding and by
//! the admin-only add-user action.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::hashing::hash_password;
use crate::domain::entity::user::User;
use crate::domain::repository::CredentialStore;
use crate::domain::value_object::{
    identity::Identity, user_password::RawPassword, user_role::UserRole,
};
use crate::error::AuthResult;

/// Add user input
pub struct AddUserInput {
    pub identity: String,
    pub password: String,
    pub role: UserRole,
}

/// Add user output
#[derive(Debug)]
pub struct AddUserOutput {
    pub identity: Identity,
    /// An existing account with the same identity was overwritten
    pub replaced: bool,
}

/// Add user use case
pub struct AddUserUseCase<C>
where
    C: CredentialStore,
{
    credential_store: Arc<C>,
    config: Arc<AuthConfig>,
}

impl<C> AddUserUseCase<C>
where
    C: CredentialStore,
{
    pub fn new(credential_store: Arc<C>, config: Arc<AuthConfig>) -> Self {
        Self {
            credential_store,
            config,
        }
    }

    pub async fn execute(&self, input: AddUserInput) -> AuthResult<AddUserOutput> {
        let identity = Identity::new(input.identity)?;
        let raw_password = RawPassword::new(input.password)?;

        // Hash before touching the store; a failing primitive stores nothing
        let password_hash = hash_password(self.config.password_hasher(), raw_password).await?;

        let user = User::new(identity.clone(), password_hash, input.role);
        let replaced = self.credential_store.put(user).await?;

        tracing::info!(
            identity = %identity,
            role = %input.role,
            replaced,
            "User stored"
        );

        Ok(AddUserOutput { identity, replaced })
    }
}
