use super::{FindOrCreateUser, UserResolver};
use crate::models::{AuthenticationMethod, ProviderProfile, ResolvedUser, ServiceError, User};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    authentication_method: AuthenticationMethod,
    access_token: String,
    profile: ProviderProfile,
    extra_params: Map<String, Value>,
}

impl StoredUser {
    fn refresh(&mut self, input: FindOrCreateUser) {
        self.authentication_method = input.authentication_method;
        self.access_token = input.access_token;
        self.profile = input.authentication_profile;
        self.extra_params = input.authentication_extra_params;
    }
}

/// Process-local user store keyed by lower-cased email
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, StoredUser>>,
}

impl InMemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    pub async fn get_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .await
            .get(&normalize_email(email))
            .map(|stored| stored.user.clone())
    }

    /// Profile and access token recorded on the user's most recent login
    pub async fn last_login(&self, email: &str) -> Option<(ProviderProfile, String)> {
        self.users
            .read()
            .await
            .get(&normalize_email(email))
            .map(|stored| (stored.profile.clone(), stored.access_token.clone()))
    }

    /// Extra token parameters recorded on the user's most recent login
    pub async fn last_extra_params(&self, email: &str) -> Option<Map<String, Value>> {
        self.users
            .read()
            .await
            .get(&normalize_email(email))
            .map(|stored| stored.extra_params.clone())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl UserResolver for InMemoryUserStore {
    async fn find_or_create_user(
        &self,
        input: FindOrCreateUser,
    ) -> Result<ResolvedUser, ServiceError> {
        let key = normalize_email(&input.email);
        if key.is_empty() {
            return Err(ServiceError::Backend(
                "Cannot resolve a user without an email address".to_string(),
            ));
        }

        let mut users = self.users.write().await;
        match users.entry(key) {
            Entry::Occupied(mut entry) => {
                let stored = entry.get_mut();
                stored.refresh(input);
                log::debug!(
                    "Found existing user {} via {}",
                    stored.user.id,
                    stored.authentication_method
                );
                Ok(ResolvedUser {
                    user: stored.user.clone(),
                    is_new_user: false,
                })
            }
            Entry::Vacant(entry) => {
                let user = User {
                    id: uuid::Uuid::new_v4().to_string(),
                    email: entry.key().clone(),
                    created_at: Utc::now(),
                };
                log::debug!("Created user {} via {}", user.id, input.authentication_method);
                entry.insert(StoredUser {
                    user: user.clone(),
                    authentication_method: input.authentication_method,
                    access_token: input.access_token,
                    profile: input.authentication_profile,
                    extra_params: input.authentication_extra_params,
                });
                Ok(ResolvedUser {
                    user,
                    is_new_user: true,
                })
            }
        }
    }
}
