//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::{CredentialStore, PrivilegeRegistry, SessionRegistry};
use crate::infra::memory::InMemoryAuthStore;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_privilege;

/// Create the Auth router with the in-memory store
pub fn auth_router(store: InMemoryAuthStore, config: AuthConfig) -> Router {
    auth_router_generic(store, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: CredentialStore + SessionRegistry + PrivilegeRegistry + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(handlers::index::<R>))
        .route(
            "/panel",
            get(handlers::cookie_login::<R>).post(handlers::sign_in::<R>),
        )
        .route(
            "/addUser",
            post(handlers::add_user::<R>).route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_privilege::<R>,
            )),
        )
        .route("/logout", post(handlers::sign_out::<R>))
        .with_state(state)
}
