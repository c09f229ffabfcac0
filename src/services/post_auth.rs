use super::{PostAuthentication, PostAuthenticationHook};
use crate::models::ServiceError;
use async_trait::async_trait;

/// Post-login hook that only records the login in the application log
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingPostAuthentication;

#[async_trait]
impl PostAuthenticationHook for LoggingPostAuthentication {
    async fn post_authentication(&self, input: PostAuthentication) -> Result<(), ServiceError> {
        if input.is_new_user {
            log::info!(
                "🆕 New user {} signed up via {}",
                input.user.id,
                input.login_method
            );
        } else {
            log::info!("🔑 User {} logged in via {}", input.user.id, input.login_method);
        }
        Ok(())
    }
}
