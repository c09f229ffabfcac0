//! GitHub login provider
//!
//! Registers the `github` strategy with an [`Authenticator`] and defines the
//! verify callback that maps a GitHub profile to an internal user.

pub mod client;
pub mod strategy;

pub use client::{GitHubApiClient, GitHubEndpoints, ProfileExchange};
pub use strategy::{
    callback_url, GitHubLoginBinding, GitHubStrategy, GitHubStrategyConfig, LoginServices,
};

use crate::authentication::Authenticator;
use crate::models::{LoginError, ProviderCredentials};
use crate::settings::LoginSettings;
use crate::utils::logging::LoggingHelper;

/// Registry key of the GitHub strategy
pub const PROVIDER_NAME: &str = "github";

/// Path GitHub redirects back to, appended to the login origin
pub const CALLBACK_PATH: &str = "/auth/github/callback";

/// Register the GitHub strategy with the authenticator
///
/// # Errors
///
/// Returns `LoginError::Configuration` if the credentials are empty or the
/// login origin is not a valid URL
pub fn add_github_strategy(
    authenticator: &mut Authenticator,
    client_id: &str,
    client_secret: &str,
    login_origin: &str,
    services: LoginServices,
) -> Result<(), LoginError> {
    let credentials = ProviderCredentials::new(client_id, client_secret)?;
    let config = GitHubStrategyConfig::new(credentials, login_origin)?;
    register(authenticator, config, GitHubEndpoints::default(), services);
    Ok(())
}

/// Register the GitHub strategy using credentials, scope and endpoints from settings
///
/// # Errors
///
/// Returns `LoginError::Configuration` if the client id or secret is not
/// configured, or the login origin is invalid
pub fn add_github_strategy_from_settings(
    authenticator: &mut Authenticator,
    settings: &LoginSettings,
    services: LoginServices,
) -> Result<(), LoginError> {
    let github = &settings.github;
    let client_id = github.get_client_id().ok_or_else(|| {
        LoginError::Configuration("Missing client_id for provider github".to_string())
    })?;
    let client_secret = github.get_client_secret().ok_or_else(|| {
        LoginError::Configuration("Missing client_secret for provider github".to_string())
    })?;

    let credentials = ProviderCredentials::new(&client_id, &client_secret)?;
    let config = GitHubStrategyConfig::new(credentials, &settings.application.login_origin)?
        .with_scope(&github.scope);
    register(authenticator, config, github.endpoints(), services);
    Ok(())
}

fn register(
    authenticator: &mut Authenticator,
    config: GitHubStrategyConfig,
    endpoints: GitHubEndpoints,
    services: LoginServices,
) {
    LoggingHelper::log_strategy_configured(PROVIDER_NAME, &config.callback_url);
    let client = GitHubApiClient::with_endpoints(config, endpoints);
    authenticator.use_strategy(GitHubStrategy::new(client, GitHubLoginBinding::new(services)));
}
