//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Where form-driven flows send the browser after a denial
pub const DENIAL_REDIRECT: &str = "/";

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// Unknown identity or wrong password; the two are never distinguished
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No valid session or privilege marker on the request
    #[error("Not authenticated")]
    NotAuthenticated,

    /// The hashing primitive refused to produce a hash
    #[error("Password hashing failed: {0}")]
    HashingFailure(String),

    /// Identity rejected before reaching the store
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// Password rejected before hashing
    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::InvalidCredentials | AuthError::NotAuthenticated => ErrorKind::Unauthorized,
            AuthError::InvalidIdentity(_) | AuthError::InvalidPassword(_) => ErrorKind::BadRequest,
            AuthError::HashingFailure(_) | AuthError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    /// Convert to AppError
    ///
    /// Authentication failures become redirects; the browser is sent back
    /// to the login page without learning why.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::InvalidCredentials | AuthError::NotAuthenticated => {
                AppError::new(self.kind(), self.to_string()).with_redirect(DENIAL_REDIRECT)
            }
            AuthError::HashingFailure(_) | AuthError::Internal(_) => {
                // Details stay in the source, never in the body
                AppError::internal("Internal server error").with_source(self.clone())
            }
            AuthError::InvalidIdentity(_) | AuthError::InvalidPassword(_) => {
                AppError::new(self.kind(), self.to_string())
                    .with_action("Check the user name and password fields")
            }
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::HashingFailure(msg) => {
                tracing::error!(message = %msg, "Password hashing failure");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::NotAuthenticated => {
                tracing::debug!("Request is not authenticated");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<tokio::task::JoinError> for AuthError {
    fn from(err: tokio::task::JoinError) -> Self {
        AuthError::Internal(format!("Hashing task failed: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{StatusCode, header};

    #[test]
    fn test_kinds() {
        assert_eq!(AuthError::InvalidCredentials.kind(), ErrorKind::Unauthorized);
        assert_eq!(
            AuthError::InvalidIdentity("empty".into()).kind(),
            ErrorKind::BadRequest
        );
        assert_eq!(
            AuthError::HashingFailure("cost".into()).kind(),
            ErrorKind::InternalServerError
        );
    }

    #[test]
    fn test_invalid_credentials_redirects() {
        let response = AuthError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[test]
    fn test_not_authenticated_redirects() {
        let response = AuthError::NotAuthenticated.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[test]
    fn test_bad_input_is_a_problem_document() {
        let app = AuthError::InvalidPassword("password cannot be empty".into()).to_app_error();
        assert_eq!(app.kind(), ErrorKind::BadRequest);
        assert!(app.redirect().is_none());
        assert!(app.action().is_some());
    }

    #[test]
    fn test_hashing_failure_is_opaque() {
        let app = AuthError::HashingFailure("cost 3 out of range".into()).to_app_error();
        assert_eq!(app.kind(), ErrorKind::InternalServerError);
        assert!(!app.message().contains("cost"));

        let source = std::error::Error::source(&app).map(|e| e.to_string());
        assert!(source.unwrap().contains("cost 3"));
    }
}
