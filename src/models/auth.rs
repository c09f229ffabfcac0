//! Login error types
//!
//! `LoginError` is what the verify callback and the authenticator return.
//! `ServiceError` is what the collaborator services (user store, post-login
//! hook) return; it is carried through `LoginError` unchanged.

use thiserror::Error;

/// Errors raised by the user-resolution service or the post-authentication hook
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The backing store rejected the request
    #[error("{0}")]
    Backend(String),
    /// Any other collaborator failure
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Common error type for GitHub login operations
#[derive(Debug, Error)]
pub enum LoginError {
    /// The provider profile carried no email address
    #[error("GitHub login requires an email address")]
    MissingEmail,
    /// User resolution failed; the collaborator's error is kept as-is
    #[error(transparent)]
    Resolution(ServiceError),
    /// The post-authentication hook failed; the collaborator's error is kept as-is
    #[error(transparent)]
    Hook(ServiceError),
    /// Code exchange or profile fetch with GitHub failed
    #[error("GitHub code exchange failed: {0}")]
    Exchange(String),
    /// No strategy registered under the requested name
    #[error("No authentication strategy registered for '{0}'")]
    UnknownStrategy(String),
    /// Startup configuration is invalid
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LoginError {
    /// Stable machine-readable code for HTTP error bodies
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            LoginError::MissingEmail => "missing_email",
            LoginError::Resolution(_) => "user_resolution_failed",
            LoginError::Hook(_) => "post_authentication_failed",
            LoginError::Exchange(_) => "exchange_failed",
            LoginError::UnknownStrategy(_) => "unknown_strategy",
            LoginError::Configuration(_) => "configuration_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_email_message() {
        assert_eq!(
            LoginError::MissingEmail.to_string(),
            "GitHub login requires an email address"
        );
    }

    #[test]
    fn test_collaborator_errors_display_unchanged() {
        let resolution = LoginError::Resolution(ServiceError::Backend("db down".to_string()));
        assert_eq!(resolution.to_string(), "db down");

        let hook = LoginError::Hook(ServiceError::Other(anyhow::anyhow!("mailer offline")));
        assert_eq!(hook.to_string(), "mailer offline");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(LoginError::MissingEmail.error_code(), "missing_email");
        assert_eq!(
            LoginError::Exchange("boom".to_string()).error_code(),
            "exchange_failed"
        );
        assert_eq!(
            LoginError::UnknownStrategy("gitlab".to_string()).error_code(),
            "unknown_strategy"
        );
    }
}
