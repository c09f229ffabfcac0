//! Recording fakes for the collaborator seams
//!
//! Each fake stores what it was called with so tests can assert on call
//! counts and arguments without touching the network or a real store.

use crate::github::ProfileExchange;
use crate::models::{AuthExchangeResult, LoginError, ResolvedUser, ServiceError, User};
use crate::services::{FindOrCreateUser, PostAuthentication, PostAuthenticationHook, UserResolver};
use crate::utils::logging::DiagnosticSink;
use async_trait::async_trait;
use chrono::Utc;
use std::error::Error;
use std::sync::Mutex;

/// User resolver that returns a fixed outcome and records its inputs
pub struct RecordingResolver {
    outcome: Result<(String, bool), String>,
    calls: Mutex<Vec<FindOrCreateUser>>,
}

impl RecordingResolver {
    /// Resolve every request to the user `user_id`
    #[must_use]
    pub fn resolving(user_id: &str, is_new_user: bool) -> Self {
        Self {
            outcome: Ok((user_id.to_string(), is_new_user)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Fail every request with `ServiceError::Backend(message)`
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            outcome: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// # Panics
    ///
    /// Panics if the call log mutex is poisoned
    #[must_use]
    pub fn calls(&self) -> Vec<FindOrCreateUser> {
        self.calls.lock().expect("resolver call log poisoned").clone()
    }
}

#[async_trait]
impl UserResolver for RecordingResolver {
    async fn find_or_create_user(
        &self,
        input: FindOrCreateUser,
    ) -> Result<ResolvedUser, ServiceError> {
        let email = input.email.clone();
        self.calls
            .lock()
            .map_err(|_| ServiceError::Backend("resolver call log poisoned".to_string()))?
            .push(input);

        match &self.outcome {
            Ok((user_id, is_new_user)) => Ok(ResolvedUser {
                user: User {
                    id: user_id.clone(),
                    email,
                    created_at: Utc::now(),
                },
                is_new_user: *is_new_user,
            }),
            Err(message) => Err(ServiceError::Backend(message.clone())),
        }
    }
}

/// Post-authentication hook that records its inputs and optionally fails
#[derive(Default)]
pub struct RecordingHook {
    failure: Option<String>,
    calls: Mutex<Vec<PostAuthentication>>,
}

impl RecordingHook {
    #[must_use]
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// # Panics
    ///
    /// Panics if the call log mutex is poisoned
    #[must_use]
    pub fn calls(&self) -> Vec<PostAuthentication> {
        self.calls.lock().expect("hook call log poisoned").clone()
    }
}

#[async_trait]
impl PostAuthenticationHook for RecordingHook {
    async fn post_authentication(&self, input: PostAuthentication) -> Result<(), ServiceError> {
        self.calls
            .lock()
            .map_err(|_| ServiceError::Backend("hook call log poisoned".to_string()))?
            .push(input);

        match &self.failure {
            Some(message) => Err(ServiceError::Other(anyhow::anyhow!(message.clone()))),
            None => Ok(()),
        }
    }
}

/// Diagnostic sink that keeps every message in memory
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    /// # Panics
    ///
    /// Panics if the message mutex is poisoned
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("sink poisoned").clone()
    }
}

impl DiagnosticSink for RecordingSink {
    fn error(&self, context: &str, error: &dyn Error) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(format!("{context}: {error}"));
        }
    }
}

/// `ProfileExchange` that returns a canned exchange result for one code
pub struct StaticExchange {
    expected_code: String,
    result: AuthExchangeResult,
    codes: Mutex<Vec<String>>,
}

impl StaticExchange {
    #[must_use]
    pub fn new(expected_code: &str, result: AuthExchangeResult) -> Self {
        Self {
            expected_code: expected_code.to_string(),
            result,
            codes: Mutex::new(Vec::new()),
        }
    }

    /// Codes this exchange was asked to redeem
    ///
    /// # Panics
    ///
    /// Panics if the code log mutex is poisoned
    #[must_use]
    pub fn codes(&self) -> Vec<String> {
        self.codes.lock().expect("exchange code log poisoned").clone()
    }
}

#[async_trait]
impl ProfileExchange for StaticExchange {
    fn authorization_url(&self, state: &str) -> Result<String, LoginError> {
        Ok(format!(
            "https://github.test/login/oauth/authorize?client_id=test-client&state={state}"
        ))
    }

    async fn exchange_code(&self, code: &str) -> Result<AuthExchangeResult, LoginError> {
        if let Ok(mut codes) = self.codes.lock() {
            codes.push(code.to_string());
        }
        if code == self.expected_code {
            Ok(self.result.clone())
        } else {
            Err(LoginError::Exchange(
                "bad_verification_code: The code passed is incorrect or expired.".to_string(),
            ))
        }
    }
}
