//! HTTP Handlers

use axum::extract::rejection::FormRejection;
use axum::extract::{Extension, Form, State};
use axum::http::{HeaderMap, header};
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use chrono::Local;
use std::sync::Arc;

use kernel::error::app_error::AppError;
use platform::cookie::{delete_cookie_header, extract_cookie, set_cookie_header};

use crate::application::config::AuthConfig;
use crate::application::{
    AddUserInput, AddUserUseCase, AuthorizationGate, CheckSessionUseCase, SignInInput,
    SignInUseCase, SignOutUseCase,
};
use crate::domain::entity::privilege_grant::PrivilegeGrant;
use crate::domain::repository::{CredentialStore, PrivilegeRegistry, SessionRegistry};
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{AddUserForm, LoginForm, PanelResponse, SessionStatusResponse};

/// Format of the `last-seen` cookie
const LAST_SEEN_FORMAT: &str = "%H:%M:%S";

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: CredentialStore + SessionRegistry + PrivilegeRegistry + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Index
// ============================================================================

/// GET /
///
/// A valid remember-me cookie goes straight to the panel.
pub async fn index<R>(State(state): State<AuthAppState<R>>, headers: HeaderMap) -> Response
where
    R: CredentialStore + SessionRegistry + PrivilegeRegistry + Clone + Send + Sync + 'static,
{
    if let Some(token) = extract_cookie(&headers, &state.config.session_cookie_name) {
        let use_case =
            CheckSessionUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

        if use_case.is_valid(&token).await {
            return Redirect::to("/panel").into_response();
        }
    }

    Json(SessionStatusResponse {
        authenticated: false,
    })
    .into_response()
}

// ============================================================================
// Sign In
// ============================================================================

/// POST /panel
///
/// A body that is not a urlencoded login form (multipart included) fails
/// like a wrong password: back to `/`.
pub async fn sign_in<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
    form: Result<Form<LoginForm>, FormRejection>,
) -> AuthResult<impl IntoResponse>
where
    R: CredentialStore + SessionRegistry + PrivilegeRegistry + Clone + Send + Sync + 'static,
{
    let Form(form) = form.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Unreadable login form");
        AuthError::InvalidCredentials
    })?;

    let use_case = SignInUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    let remember_me = form.remember_me();

    let input = SignInInput {
        identity: form.user,
        password: form.pass,
        remember_me,
        existing_session: extract_cookie(&headers, &state.config.session_cookie_name),
    };

    let output = use_case.execute(input).await?;

    let mut response_headers = HeaderMap::new();

    if let Some(token) = &output.session_token {
        response_headers.append(
            header::SET_COOKIE,
            set_cookie_header(&state.config.session_cookie(), token),
        );
    }

    let last_seen = match &output.privilege_token {
        Some(marker) => {
            let now = Local::now().format(LAST_SEEN_FORMAT).to_string();
            response_headers.append(
                header::SET_COOKIE,
                set_cookie_header(&state.config.last_seen_cookie(), &now),
            );
            response_headers.append(
                header::SET_COOKIE,
                set_cookie_header(&state.config.privilege_cookie(), marker),
            );
            Some(now)
        }
        None => None,
    };

    Ok((
        response_headers,
        Json(PanelResponse {
            user: output.identity.to_string(),
            elevated: output.is_admin,
            remembered: remember_me,
            last_seen,
        }),
    ))
}

// ============================================================================
// Cookie Login
// ============================================================================

/// GET /panel
///
/// Never elevates; an admin must post the password again for privilege.
pub async fn cookie_login<R>(State(state): State<AuthAppState<R>>, headers: HeaderMap) -> Response
where
    R: CredentialStore + SessionRegistry + PrivilegeRegistry + Clone + Send + Sync + 'static,
{
    let Some(token) = extract_cookie(&headers, &state.config.session_cookie_name) else {
        return invalid_cookie(&state.config);
    };

    let use_case =
        CheckSessionUseCase::new(state.repo.clone(), state.repo.clone(), state.config.clone());

    match use_case.execute(&token).await {
        Ok(user) => Json(PanelResponse {
            user: user.identity.to_string(),
            elevated: false,
            remembered: true,
            last_seen: None,
        })
        .into_response(),
        Err(AuthError::NotAuthenticated) => invalid_cookie(&state.config),
        Err(e) => e.into_response(),
    }
}

// ============================================================================
// Add User (requires privilege)
// ============================================================================

/// POST /addUser
///
/// One-shot: the grant is consumed and the marker cookie cleared.
pub async fn add_user<R>(
    State(state): State<AuthAppState<R>>,
    Extension(grant): Extension<PrivilegeGrant>,
    Form(form): Form<AddUserForm>,
) -> AuthResult<impl IntoResponse>
where
    R: CredentialStore + SessionRegistry + PrivilegeRegistry + Clone + Send + Sync + 'static,
{
    let use_case = AddUserUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(AddUserInput {
            identity: form.id,
            password: form.pass,
            role: UserRole::User,
        })
        .await?;

    let gate = AuthorizationGate::new(state.repo.clone(), state.repo.clone(), state.config.clone());
    gate.consume(&grant).await;

    tracing::info!(
        admin = %grant.identity,
        added = %output.identity,
        "User added by admin"
    );

    Ok((
        [(
            header::SET_COOKIE,
            delete_cookie_header(&state.config.privilege_cookie()),
        )],
        Redirect::to("/"),
    ))
}

// ============================================================================
// Sign Out
// ============================================================================

/// POST /logout
pub async fn sign_out<R>(State(state): State<AuthAppState<R>>, headers: HeaderMap) -> impl IntoResponse
where
    R: CredentialStore + SessionRegistry + PrivilegeRegistry + Clone + Send + Sync + 'static,
{
    let marker = extract_cookie(&headers, &state.config.privilege_cookie_name);
    let session = extract_cookie(&headers, &state.config.session_cookie_name);

    let use_case = SignOutUseCase::new(
        state.repo.clone(),
        state.repo.clone(),
        state.repo.clone(),
        state.config.clone(),
    );

    // Cookies are cleared regardless
    if let Err(e) = use_case.execute(marker.as_deref(), session.as_deref()).await {
        tracing::warn!(error = %e, "Sign out could not revoke server-side state");
    }

    let mut response_headers = HeaderMap::new();
    response_headers.append(
        header::SET_COOKIE,
        delete_cookie_header(&state.config.privilege_cookie()),
    );
    response_headers.append(
        header::SET_COOKIE,
        delete_cookie_header(&state.config.session_cookie()),
    );

    (response_headers, Redirect::to("/"))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn invalid_cookie(config: &AuthConfig) -> Response {
    (
        [(
            header::SET_COOKIE,
            delete_cookie_header(&config.session_cookie()),
        )],
        AppError::bad_request("invalid cookie").with_action("Sign in with your password"),
    )
        .into_response()
}
