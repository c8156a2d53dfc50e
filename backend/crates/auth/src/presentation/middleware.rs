//! Auth Middleware
//!
//! Gate for admin-only routes.

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::cookie::extract_cookie;

use crate::application::AuthorizationGate;
use crate::domain::repository::{CredentialStore, PrivilegeRegistry, SessionRegistry};
use crate::presentation::handlers::AuthAppState;

/// Middleware that requires a live admin privilege grant.
///
/// On success the `PrivilegeGrant` is placed in the request extensions;
/// otherwise the browser is redirected to `/`.
pub async fn require_privilege<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: CredentialStore + SessionRegistry + PrivilegeRegistry + Clone + Send + Sync + 'static,
{
    let marker = extract_cookie(req.headers(), &state.config.privilege_cookie_name);

    let gate = AuthorizationGate::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    let grant = gate
        .require_privileged(marker.as_deref())
        .await
        .map_err(IntoResponse::into_response)?;

    req.extensions_mut().insert(grant);

    Ok(next.run(req).await)
}
