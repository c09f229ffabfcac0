use actix_web::{cookie::Cookie, http::StatusCode, HttpResponse};
use serde::Serialize;

use crate::models::LoginError;

/// JSON error body returned by the login endpoints
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    pub message: String,
}

pub struct ResponseBuilder;

impl ResponseBuilder {
    /// HTTP status a login failure maps to
    #[must_use]
    pub const fn login_error_status(error: &LoginError) -> StatusCode {
        match error {
            LoginError::MissingEmail => StatusCode::UNAUTHORIZED,
            LoginError::Exchange(_) => StatusCode::BAD_GATEWAY,
            LoginError::UnknownStrategy(_) => StatusCode::NOT_FOUND,
            LoginError::Resolution(_) | LoginError::Hook(_) | LoginError::Configuration(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// JSON error response with an optional cookie (usually the cleared state cookie)
    #[must_use]
    pub fn json_error(
        status: StatusCode,
        error: &str,
        message: &str,
        cookie: Option<Cookie<'static>>,
    ) -> HttpResponse {
        let mut builder = HttpResponse::build(status);
        if let Some(cookie) = cookie {
            builder.cookie(cookie);
        }
        builder.json(ErrorBody {
            error,
            message: message.to_string(),
        })
    }

    /// Translate a login failure into an HTTP response
    #[must_use]
    pub fn login_error(error: &LoginError, cookie: Option<Cookie<'static>>) -> HttpResponse {
        let status = Self::login_error_status(error);
        // collaborator failures stay in the log, not in the response body
        let message = if status.is_server_error() && !matches!(error, LoginError::Exchange(_)) {
            "Login could not be completed".to_string()
        } else {
            error.to_string()
        };
        Self::json_error(status, error.error_code(), &message, cookie)
    }

    /// Create a redirect response (302 Found) with a cookie
    #[must_use]
    pub fn redirect_with_cookie(location: &str, cookie: Cookie<'static>) -> HttpResponse {
        HttpResponse::Found()
            .cookie(cookie)
            .append_header(("Location", location.to_string()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ServiceError;

    #[test]
    fn test_login_error_status_mapping() {
        assert_eq!(
            ResponseBuilder::login_error_status(&LoginError::MissingEmail),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ResponseBuilder::login_error_status(&LoginError::Exchange("x".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ResponseBuilder::login_error_status(&LoginError::Resolution(ServiceError::Backend(
                "x".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_redirect_sets_location() {
        let response = ResponseBuilder::redirect_with_cookie(
            "https://github.com/login/oauth/authorize",
            Cookie::new("c", "v"),
        );
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get("Location").unwrap(),
            "https://github.com/login/oauth/authorize"
        );
    }
}
