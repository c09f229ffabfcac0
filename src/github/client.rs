//! GitHub OAuth plumbing
//!
//! Authorization URL, code-for-token exchange and profile fetching against
//! the GitHub REST API. Kept behind `ProfileExchange` so the strategy can be
//! driven by a fake in tests.

use super::strategy::GitHubStrategyConfig;
use crate::models::{AuthExchangeResult, LoginError, ProfileEmail, ProfilePhoto, ProviderProfile};
use crate::utils::logging::LoggingHelper;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use serde_json::{Map, Value};

const CLIENT_USER_AGENT: &str = concat!("ghlogin/", env!("CARGO_PKG_VERSION"));

/// The strategy-side half of the OAuth round-trip
#[async_trait]
pub trait ProfileExchange: Send + Sync {
    /// # Errors
    ///
    /// Returns `LoginError::Configuration` if the authorize endpoint is not a valid URL
    fn authorization_url(&self, state: &str) -> Result<String, LoginError>;

    /// # Errors
    ///
    /// Returns `LoginError::Exchange` if GitHub rejects the code or the
    /// profile cannot be fetched
    async fn exchange_code(&self, code: &str) -> Result<AuthExchangeResult, LoginError>;
}

#[async_trait]
impl<T: ProfileExchange + ?Sized> ProfileExchange for std::sync::Arc<T> {
    fn authorization_url(&self, state: &str) -> Result<String, LoginError> {
        self.as_ref().authorization_url(state)
    }

    async fn exchange_code(&self, code: &str) -> Result<AuthExchangeResult, LoginError> {
        self.as_ref().exchange_code(code).await
    }
}

/// GitHub endpoints; overridable for GitHub Enterprise and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub api_base_url: String,
}

impl Default for GitHubEndpoints {
    fn default() -> Self {
        Self {
            authorize_url: "https://github.com/login/oauth/authorize".to_string(),
            token_url: "https://github.com/login/oauth/access_token".to_string(),
            api_base_url: "https://api.github.com".to_string(),
        }
    }
}

/// `/user` response; only the fields the normalized profile needs
#[derive(Debug, Deserialize)]
struct GitHubUser {
    id: u64,
    login: String,
    name: Option<String>,
    email: Option<String>,
    avatar_url: Option<String>,
}

/// `/user/emails` entry
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubEmail {
    pub email: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub verified: bool,
}

/// reqwest-backed `ProfileExchange` for github.com
pub struct GitHubApiClient {
    config: GitHubStrategyConfig,
    endpoints: GitHubEndpoints,
    http_client: reqwest::Client,
}

impl GitHubApiClient {
    #[must_use]
    pub fn new(config: GitHubStrategyConfig) -> Self {
        Self::with_endpoints(config, GitHubEndpoints::default())
    }

    #[must_use]
    pub fn with_endpoints(config: GitHubStrategyConfig, endpoints: GitHubEndpoints) -> Self {
        Self {
            config,
            endpoints,
            http_client: reqwest::Client::new(),
        }
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<ProviderProfile, LoginError> {
        let user_url = format!("{}/user", self.endpoints.api_base_url.trim_end_matches('/'));
        let response = self
            .http_client
            .get(&user_url)
            .header(AUTHORIZATION, format!("Bearer {access_token}"))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await
            .map_err(|e| LoginError::Exchange(format!("Failed to fetch GitHub profile: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoginError::Exchange(format!(
                "GitHub profile request failed with status: {status}"
            )));
        }

        let raw: Value = response
            .json()
            .await
            .map_err(|e| LoginError::Exchange(format!("Failed to parse GitHub profile: {e}")))?;

        let emails = self.fetch_emails(access_token).await;
        build_profile(raw, emails)
    }

    /// `None` when the emails endpoint is unavailable (e.g. scope not granted)
    async fn fetch_emails(&self, access_token: &str) -> Option<Vec<GitHubEmail>> {
        let emails_url = format!(
            "{}/user/emails",
            self.endpoints.api_base_url.trim_end_matches('/')
        );
        let response = match self
            .http_client
            .get(&emails_url)
            .header(AUTHORIZATION, format!("Bearer {access_token}"))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                log::debug!("GitHub email request returned status: {}", response.status());
                return None;
            }
            Err(e) => {
                log::debug!("GitHub email request failed: {e}");
                return None;
            }
        };

        match response.json::<Vec<GitHubEmail>>().await {
            Ok(emails) => Some(emails),
            Err(e) => {
                log::debug!("Failed to parse GitHub emails: {e}");
                None
            }
        }
    }
}

#[async_trait]
impl ProfileExchange for GitHubApiClient {
    fn authorization_url(&self, state: &str) -> Result<String, LoginError> {
        let url = url::Url::parse_with_params(
            &self.endpoints.authorize_url,
            &[
                ("client_id", self.config.credentials.client_id.as_str()),
                ("redirect_uri", self.config.callback_url.as_str()),
                ("scope", self.config.scope.as_str()),
                ("state", state),
            ],
        )
        .map_err(|e| {
            LoginError::Configuration(format!(
                "Invalid GitHub authorize endpoint {}: {e}",
                self.endpoints.authorize_url
            ))
        })?;
        Ok(url.to_string())
    }

    async fn exchange_code(&self, code: &str) -> Result<AuthExchangeResult, LoginError> {
        let params = [
            ("client_id", self.config.credentials.client_id.as_str()),
            ("client_secret", self.config.credentials.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.callback_url.as_str()),
        ];

        LoggingHelper::log_token_exchange_start(super::PROVIDER_NAME);
        let response = self
            .http_client
            .post(&self.endpoints.token_url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .form(&params)
            .send()
            .await
            .map_err(|e| LoginError::Exchange(format!("Failed to exchange code for token: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LoginError::Exchange(format!(
                "Token exchange failed with status {status}: {error_text}"
            )));
        }

        let body: Map<String, Value> = response
            .json()
            .await
            .map_err(|e| LoginError::Exchange(format!("Failed to parse token response: {e}")))?;

        let (access_token, extra_params) = parse_token_response(body)?;
        let profile = self.fetch_profile(&access_token).await?;

        LoggingHelper::log_token_exchange_summary(
            super::PROVIDER_NAME,
            extra_params.get("token_type").and_then(Value::as_str),
            extra_params.get("scope").and_then(Value::as_str),
            profile.emails.as_ref().map_or(0, Vec::len),
        );

        Ok(AuthExchangeResult {
            access_token,
            extra_params,
            profile,
        })
    }
}

/// Split a token response into the access token and the remaining parameters.
///
/// GitHub reports a bad code with HTTP 200 and an `error` field.
///
/// # Errors
///
/// Returns `LoginError::Exchange` if the body carries an `error` field or no
/// access token
pub fn parse_token_response(
    mut body: Map<String, Value>,
) -> Result<(String, Map<String, Value>), LoginError> {
    if let Some(error) = body.get("error").and_then(Value::as_str) {
        let description = body
            .get("error_description")
            .and_then(Value::as_str)
            .unwrap_or("no description");
        return Err(LoginError::Exchange(format!("{error}: {description}")));
    }

    match body.remove("access_token") {
        Some(Value::String(token)) if !token.is_empty() => Ok((token, body)),
        _ => Err(LoginError::Exchange(
            "Token response did not contain an access token".to_string(),
        )),
    }
}

/// Normalize the `/user` JSON and the optional `/user/emails` list into a profile.
///
/// Emails are ordered primary first. Without an emails list the public
/// profile email is used; with neither, `emails` stays `None`.
///
/// # Errors
///
/// Returns `LoginError::Exchange` if `/user` lacks the `id` or `login` fields
pub fn build_profile(
    raw: Value,
    emails: Option<Vec<GitHubEmail>>,
) -> Result<ProviderProfile, LoginError> {
    let user: GitHubUser = serde_json::from_value(raw.clone())
        .map_err(|e| LoginError::Exchange(format!("Unexpected GitHub profile shape: {e}")))?;

    let emails = match emails {
        Some(mut list) if !list.is_empty() => {
            // stable: GitHub's own order is kept within each group
            list.sort_by_key(|email| !email.primary);
            Some(
                list.into_iter()
                    .map(|email| ProfileEmail {
                        value: email.email,
                        primary: Some(email.primary),
                        verified: Some(email.verified),
                    })
                    .collect(),
            )
        }
        _ => user
            .email
            .filter(|email| !email.is_empty())
            .map(|email| vec![ProfileEmail::new(&email)]),
    };

    Ok(ProviderProfile {
        provider: super::PROVIDER_NAME.to_string(),
        id: user.id.to_string(),
        display_name: user.name,
        username: Some(user.login),
        emails,
        photos: user
            .avatar_url
            .map(|value| vec![ProfilePhoto { value }]),
        raw,
    })
}
