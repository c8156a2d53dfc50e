//! Error conversions - axum response rendering of [`AppError`]

#[cfg(feature = "axum")]
use super::app_error::AppError;

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::{HeaderValue, StatusCode, header};

        if let Some(location) = self.redirect() {
            if let Ok(location) = HeaderValue::from_str(location) {
                return (StatusCode::SEE_OTHER, [(header::LOCATION, location)]).into_response();
            }
        }

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details for HTTP APIs
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(all(test, feature = "axum"))]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;

    #[test]
    fn test_redirect_response() {
        use axum::http::{StatusCode, header};
        use axum::response::IntoResponse;

        let response = AppError::new(ErrorKind::Unauthorized, "Invalid credentials")
            .with_redirect("/")
            .into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    }

    #[test]
    fn test_problem_response() {
        use axum::http::StatusCode;
        use axum::response::IntoResponse;

        let response = AppError::bad_request("invalid cookie").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
