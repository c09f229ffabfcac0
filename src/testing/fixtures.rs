//! Pre-built test data

use crate::models::{AuthExchangeResult, ProfileEmail, ProviderProfile};
use serde_json::{json, Map, Value};

pub struct TestFixtures;

impl TestFixtures {
    /// GitHub-shaped profile with the given emails, in order
    #[must_use]
    pub fn profile_with_emails(emails: &[&str]) -> ProviderProfile {
        ProviderProfile {
            emails: Some(emails.iter().map(|email| ProfileEmail::new(email)).collect()),
            ..Self::profile_without_emails()
        }
    }

    /// GitHub-shaped profile whose `emails` field is absent
    #[must_use]
    pub fn profile_without_emails() -> ProviderProfile {
        ProviderProfile {
            provider: "github".to_string(),
            id: super::constants::TEST_GITHUB_ID.to_string(),
            display_name: Some("The Octocat".to_string()),
            username: Some(super::constants::TEST_GITHUB_LOGIN.to_string()),
            emails: None,
            photos: None,
            raw: json!({
                "id": 583_231,
                "login": super::constants::TEST_GITHUB_LOGIN,
                "name": "The Octocat",
            }),
        }
    }

    /// Exchange result carrying `access_token` and typical GitHub extra params
    #[must_use]
    pub fn exchange(access_token: &str, profile: ProviderProfile) -> AuthExchangeResult {
        AuthExchangeResult {
            access_token: access_token.to_string(),
            extra_params: Self::extra_params(),
            profile,
        }
    }

    #[must_use]
    pub fn extra_params() -> Map<String, Value> {
        let mut params = Map::new();
        params.insert("token_type".to_string(), json!("bearer"));
        params.insert("scope".to_string(), json!("user:email"));
        params
    }
}
