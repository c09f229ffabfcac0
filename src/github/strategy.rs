//! GitHub strategy and its verify callback

use super::client::ProfileExchange;
use super::{CALLBACK_PATH, PROVIDER_NAME};
use crate::authentication::Strategy;
use crate::models::{
    AuthExchangeResult, AuthenticationMethod, LoginError, ProviderCredentials, SessionIdentity,
};
use crate::services::{FindOrCreateUser, PostAuthentication, PostAuthenticationHook, UserResolver};
use crate::utils::logging::{DiagnosticSink, LogSink, LoggingHelper};
use async_trait::async_trait;
use std::sync::Arc;

/// Default OAuth scope: enough to read the account's email addresses
pub const DEFAULT_SCOPE: &str = "user:email";

/// Configuration the GitHub strategy is constructed with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubStrategyConfig {
    pub credentials: ProviderCredentials,
    pub callback_url: String,
    pub scope: String,
}

impl GitHubStrategyConfig {
    /// Build the config, deriving the callback URL from the login origin
    ///
    /// # Errors
    ///
    /// Returns `LoginError::Configuration` if the origin is not an absolute URL
    pub fn new(credentials: ProviderCredentials, login_origin: &str) -> Result<Self, LoginError> {
        Ok(Self {
            credentials,
            callback_url: callback_url(login_origin)?,
            scope: DEFAULT_SCOPE.to_string(),
        })
    }

    #[must_use]
    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scope = scope.to_string();
        self
    }
}

/// `{login_origin}/auth/github/callback`
///
/// # Errors
///
/// Returns `LoginError::Configuration` if the origin is not an absolute http(s) URL
pub fn callback_url(login_origin: &str) -> Result<String, LoginError> {
    let origin = login_origin.trim().trim_end_matches('/');
    let parsed = url::Url::parse(origin).map_err(|e| {
        LoginError::Configuration(format!("Invalid login origin '{login_origin}': {e}"))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(LoginError::Configuration(format!(
            "Login origin must use http or https: {login_origin}"
        )));
    }
    if parsed.query().is_some() || parsed.fragment().is_some() {
        return Err(LoginError::Configuration(format!(
            "Login origin must not carry a query or fragment: {login_origin}"
        )));
    }
    Ok(format!("{origin}{CALLBACK_PATH}"))
}

/// Collaborators the verify callback hands control to
#[derive(Clone)]
pub struct LoginServices {
    pub resolver: Arc<dyn UserResolver>,
    pub hook: Arc<dyn PostAuthenticationHook>,
    pub sink: Arc<dyn DiagnosticSink>,
}

impl LoginServices {
    /// Services with the default `log`-backed diagnostic sink
    #[must_use]
    pub fn new(resolver: Arc<dyn UserResolver>, hook: Arc<dyn PostAuthenticationHook>) -> Self {
        Self {
            resolver,
            hook,
            sink: Arc::new(LogSink),
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }
}

/// Maps a GitHub exchange result to an internal user and a session identity
#[derive(Clone)]
pub struct GitHubLoginBinding {
    services: LoginServices,
}

impl GitHubLoginBinding {
    #[must_use]
    pub const fn new(services: LoginServices) -> Self {
        Self { services }
    }

    /// Verify callback.
    ///
    /// A profile without emails is rejected before any collaborator is called.
    /// Collaborator failures are written to the diagnostic sink once and
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// - `LoginError::MissingEmail` if the profile has no email
    /// - `LoginError::Resolution` if the user resolver fails
    /// - `LoginError::Hook` if the post-authentication hook fails
    pub async fn on_exchange_complete(
        &self,
        exchange: AuthExchangeResult,
    ) -> Result<SessionIdentity, LoginError> {
        let Some(email) = exchange.profile.first_email().map(ToString::to_string) else {
            return Err(LoginError::MissingEmail);
        };

        match self.resolve_and_notify(email, exchange).await {
            Ok(identity) => {
                LoggingHelper::log_login_completed(PROVIDER_NAME, &identity.user_id);
                Ok(identity)
            }
            Err(error) => {
                self.services.sink.error("GitHub login failed", &error);
                Err(error)
            }
        }
    }

    async fn resolve_and_notify(
        &self,
        email: String,
        exchange: AuthExchangeResult,
    ) -> Result<SessionIdentity, LoginError> {
        let resolved = self
            .services
            .resolver
            .find_or_create_user(FindOrCreateUser {
                email,
                authentication_method: AuthenticationMethod::Github,
                access_token: exchange.access_token,
                authentication_profile: exchange.profile,
                authentication_extra_params: exchange.extra_params,
            })
            .await
            .map_err(LoginError::Resolution)?;

        let user_id = resolved.user.id.clone();

        // awaited for its failure only; the success value carries nothing
        self.services
            .hook
            .post_authentication(PostAuthentication {
                user: resolved.user,
                is_new_user: resolved.is_new_user,
                login_method: AuthenticationMethod::Github,
            })
            .await
            .map_err(LoginError::Hook)?;

        Ok(SessionIdentity { user_id })
    }
}

/// The `github` strategy: GitHub plumbing plus the login binding
pub struct GitHubStrategy {
    exchange: Arc<dyn ProfileExchange>,
    binding: GitHubLoginBinding,
}

impl GitHubStrategy {
    pub fn new<E>(exchange: E, binding: GitHubLoginBinding) -> Self
    where
        E: ProfileExchange + 'static,
    {
        Self {
            exchange: Arc::new(exchange),
            binding,
        }
    }
}

#[async_trait]
impl Strategy for GitHubStrategy {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn authorization_url(&self, state: &str) -> Result<String, LoginError> {
        self.exchange.authorization_url(state)
    }

    async fn exchange_code(&self, code: &str) -> Result<AuthExchangeResult, LoginError> {
        self.exchange.exchange_code(code).await
    }

    async fn verify(&self, exchange: AuthExchangeResult) -> Result<SessionIdentity, LoginError> {
        self.binding.on_exchange_complete(exchange).await
    }
}
