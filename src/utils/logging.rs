// Centralized logging utilities and the diagnostic sink used by the verify callback
use log::{error, info};
use std::error::Error;

/// Destination for login failures raised by collaborator services
pub trait DiagnosticSink: Send + Sync {
    fn error(&self, context: &str, error: &dyn Error);
}

/// Production sink: writes through the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn error(&self, context: &str, err: &dyn Error) {
        error!("{context}: {err}");
    }
}

pub struct LoggingHelper;

impl LoggingHelper {
    /// Log strategy registration with its callback URL
    pub fn log_strategy_configured(provider: &str, callback_url: &str) {
        info!("✅ {provider} OAuth2 configured (callback: {callback_url})");
    }

    /// Log that the provider is not configured
    pub fn log_strategy_not_configured(provider: &str, reason: &str) {
        info!("❌ {provider} OAuth2 not configured - {reason}");
    }

    /// Log login start
    pub fn log_sign_in_redirect(provider: &str) {
        info!("🔄 Redirecting browser to {provider} for authorization");
    }

    /// Log token exchange start
    pub fn log_token_exchange_start(provider: &str) {
        info!("🔄 Exchanging authorization code for tokens with {provider}");
    }

    /// Log token exchange summary
    pub fn log_token_exchange_summary(
        provider: &str,
        token_type: Option<&str>,
        scope: Option<&str>,
        email_count: usize,
    ) {
        info!(
            "🔍 Token exchange summary for {provider}: \
             token_type={}, scope={}, emails={email_count}",
            token_type.unwrap_or("missing"),
            scope.unwrap_or("missing"),
        );
    }

    /// Log session identity handed back to the authenticator
    pub fn log_login_completed(provider: &str, user_id: &str) {
        info!("Successfully completed {provider} login for user: {user_id}");
    }
}
