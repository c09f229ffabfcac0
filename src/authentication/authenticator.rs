//! Strategy registry
//!
//! The authenticator is built once at startup, then shared read-only across
//! workers. Registration is a plain insertion keyed by strategy name.

use super::traits::Strategy;
use crate::models::{AuthExchangeResult, LoginError, SessionIdentity};
use std::collections::HashMap;
use std::sync::Arc;

/// Holds the registered strategies and runs logins against them
#[derive(Clone, Default)]
pub struct Authenticator {
    strategies: HashMap<&'static str, Arc<dyn Strategy>>,
}

impl Authenticator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a strategy under its own name. Last registration wins.
    pub fn use_strategy<S>(&mut self, strategy: S)
    where
        S: Strategy + 'static,
    {
        let name = strategy.name();
        if self.strategies.insert(name, Arc::new(strategy)).is_some() {
            log::warn!("⚠️  Strategy {name} was already registered, replacing it");
        } else {
            log::info!("✅ Registered {name} authentication strategy");
        }
    }

    /// Look up a strategy by name
    #[must_use]
    pub fn strategy(&self, name: &str) -> Option<Arc<dyn Strategy>> {
        self.strategies.get(name).cloned()
    }

    #[must_use]
    pub fn has_strategy(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Registered strategy names, sorted
    #[must_use]
    pub fn strategy_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.strategies.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Run the named strategy's verify callback on an exchange result
    ///
    /// # Errors
    ///
    /// Returns `LoginError::UnknownStrategy` if nothing is registered under
    /// `name`, otherwise whatever the strategy's verify callback returns
    pub async fn authenticate(
        &self,
        name: &str,
        exchange: AuthExchangeResult,
    ) -> Result<SessionIdentity, LoginError> {
        let strategy = self.require(name)?;
        strategy.verify(exchange).await
    }

    /// Exchange an authorization code with the named strategy, then verify it
    ///
    /// # Errors
    ///
    /// Returns the exchange error if the provider round-trip fails, otherwise
    /// the verify callback's result
    pub async fn exchange_and_authenticate(
        &self,
        name: &str,
        code: &str,
    ) -> Result<SessionIdentity, LoginError> {
        let strategy = self.require(name)?;
        let exchange = strategy.exchange_code(code).await?;
        log::debug!("Code exchange with {name} completed, running verify callback");
        strategy.verify(exchange).await
    }

    fn require(&self, name: &str) -> Result<Arc<dyn Strategy>, LoginError> {
        self.strategy(name)
            .ok_or_else(|| LoginError::UnknownStrategy(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::TestFixtures;
    use async_trait::async_trait;

    struct FixedStrategy {
        name: &'static str,
        user_id: &'static str,
    }

    #[async_trait]
    impl Strategy for FixedStrategy {
        fn name(&self) -> &'static str {
            self.name
        }

        fn authorization_url(&self, state: &str) -> Result<String, LoginError> {
            Ok(format!("https://provider.test/authorize?state={state}"))
        }

        async fn exchange_code(&self, code: &str) -> Result<AuthExchangeResult, LoginError> {
            if code == "bad" {
                return Err(LoginError::Exchange("bad_verification_code".to_string()));
            }
            Ok(TestFixtures::exchange("tok", TestFixtures::profile_with_emails(&["a@x.com"])))
        }

        async fn verify(
            &self,
            _exchange: AuthExchangeResult,
        ) -> Result<SessionIdentity, LoginError> {
            Ok(SessionIdentity {
                user_id: self.user_id.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_authenticate_dispatches_by_name() {
        let mut authenticator = Authenticator::new();
        authenticator.use_strategy(FixedStrategy {
            name: "github",
            user_id: "u1",
        });

        let exchange = TestFixtures::exchange("tok", TestFixtures::profile_without_emails());
        let identity = authenticator.authenticate("github", exchange).await.unwrap();
        assert_eq!(identity.user_id, "u1");
        assert!(authenticator.has_strategy("github"));
        assert_eq!(authenticator.strategy_names(), vec!["github"]);
    }

    #[tokio::test]
    async fn test_unknown_strategy() {
        let authenticator = Authenticator::new();
        let exchange = TestFixtures::exchange("tok", TestFixtures::profile_without_emails());
        let result = authenticator.authenticate("gitlab", exchange).await;
        assert!(matches!(result, Err(LoginError::UnknownStrategy(name)) if name == "gitlab"));
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let mut authenticator = Authenticator::new();
        authenticator.use_strategy(FixedStrategy {
            name: "github",
            user_id: "first",
        });
        authenticator.use_strategy(FixedStrategy {
            name: "github",
            user_id: "second",
        });

        let identity = authenticator
            .exchange_and_authenticate("github", "code")
            .await
            .unwrap();
        assert_eq!(identity.user_id, "second");
        assert_eq!(authenticator.strategy_names().len(), 1);
    }

    #[tokio::test]
    async fn test_exchange_failure_stops_before_verify() {
        let mut authenticator = Authenticator::new();
        authenticator.use_strategy(FixedStrategy {
            name: "github",
            user_id: "u1",
        });

        let result = authenticator.exchange_and_authenticate("github", "bad").await;
        assert!(matches!(result, Err(LoginError::Exchange(_))));
    }
}
