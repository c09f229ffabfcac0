//! Strategy trait
//!
//! A strategy owns one provider's side of the OAuth round-trip and the verify
//! callback that turns the round-trip result into a session identity.

use crate::models::{AuthExchangeResult, LoginError, SessionIdentity};
use async_trait::async_trait;

/// Pluggable provider-specific login strategy
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Registry key for this strategy (e.g. "github")
    fn name(&self) -> &'static str;

    /// Build the provider authorization URL the browser is redirected to
    ///
    /// # Errors
    ///
    /// Returns an error if the configured endpoints cannot form a valid URL
    fn authorization_url(&self, state: &str) -> Result<String, LoginError>;

    /// Exchange an authorization code for an access token and profile
    ///
    /// # Errors
    ///
    /// Returns `LoginError::Exchange` if the provider rejects the code or
    /// the profile cannot be fetched
    async fn exchange_code(&self, code: &str) -> Result<AuthExchangeResult, LoginError>;

    /// Verify callback: map an exchange result to a session identity
    ///
    /// # Errors
    ///
    /// Returns an error if the profile is unusable or a collaborator fails
    async fn verify(&self, exchange: AuthExchangeResult) -> Result<SessionIdentity, LoginError>;
}
