//! Login data model
//!
//! Provider profiles, exchange results and the user/session values passed
//! between the strategy, the collaborator services and the HTTP layer.

pub mod auth;

pub use auth::{LoginError, ServiceError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// OAuth client credentials for a provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ProviderCredentials {
    /// Create credentials, rejecting empty values
    ///
    /// # Errors
    ///
    /// Returns `LoginError::Configuration` if either value is empty
    pub fn new(client_id: &str, client_secret: &str) -> Result<Self, LoginError> {
        if client_id.trim().is_empty() {
            return Err(LoginError::Configuration(
                "GitHub client id must not be empty".to_string(),
            ));
        }
        if client_secret.trim().is_empty() {
            return Err(LoginError::Configuration(
                "GitHub client secret must not be empty".to_string(),
            ));
        }
        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
        })
    }
}

/// A single email record from the provider profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEmail {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

impl ProfileEmail {
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
            primary: None,
            verified: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePhoto {
    pub value: String,
}

/// Normalized profile returned by the provider.
///
/// `raw` keeps the provider's own JSON untouched so collaborators can read
/// fields this crate does not model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProfile {
    pub provider: String,
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub emails: Option<Vec<ProfileEmail>>,
    #[serde(default)]
    pub photos: Option<Vec<ProfilePhoto>>,
    #[serde(rename = "_json", default)]
    pub raw: Value,
}

impl ProviderProfile {
    /// The first email in provider order, if the list is present and non-empty
    #[must_use]
    pub fn first_email(&self) -> Option<&str> {
        self.emails
            .as_deref()
            .and_then(<[ProfileEmail]>::first)
            .map(|email| email.value.as_str())
    }
}

/// Everything the provider handed back after a successful code exchange
#[derive(Debug, Clone, PartialEq)]
pub struct AuthExchangeResult {
    pub access_token: String,
    pub extra_params: Map<String, Value>,
    pub profile: ProviderProfile,
}

/// Identifies which login method produced a user record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthenticationMethod {
    Github,
}

impl AuthenticationMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AuthenticationMethod::Github => "GITHUB",
        }
    }
}

impl fmt::Display for AuthenticationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal user record owned by the user store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Result of user resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUser {
    pub user: User,
    pub is_new_user: bool,
}

/// The only value handed back to the authenticator to establish a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionIdentity {
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
