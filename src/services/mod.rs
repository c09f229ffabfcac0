//! Collaborator services called by the verify callback
//!
//! User resolution and post-login bookkeeping live outside the login binding.
//! The traits here are the contract; `InMemoryUserStore` and
//! `LoggingPostAuthentication` are the defaults the bundled server uses.

pub mod post_auth;
pub mod user_store;

pub use post_auth::LoggingPostAuthentication;
pub use user_store::InMemoryUserStore;

use crate::models::{AuthenticationMethod, ProviderProfile, ResolvedUser, ServiceError, User};
use async_trait::async_trait;
use serde_json::{Map, Value};

/// Input to user resolution
#[derive(Debug, Clone, PartialEq)]
pub struct FindOrCreateUser {
    pub email: String,
    pub authentication_method: AuthenticationMethod,
    pub access_token: String,
    pub authentication_profile: ProviderProfile,
    pub authentication_extra_params: Map<String, Value>,
}

/// Input to the post-authentication hook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostAuthentication {
    pub user: User,
    pub is_new_user: bool,
    pub login_method: AuthenticationMethod,
}

/// Looks up the user for a login, creating it on first sight
#[async_trait]
pub trait UserResolver: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the backing store cannot resolve the user
    async fn find_or_create_user(&self, input: FindOrCreateUser)
        -> Result<ResolvedUser, ServiceError>;
}

/// Runs after a user has been resolved, before the session is handed out
#[async_trait]
pub trait PostAuthenticationHook: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the bookkeeping fails; the login is then aborted
    async fn post_authentication(&self, input: PostAuthentication) -> Result<(), ServiceError>;
}
