// GitHub sign-in and callback handlers
use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use log::{debug, error, warn};
use serde::Deserialize;

use crate::authentication::Authenticator;
use crate::github::PROVIDER_NAME;
use crate::models::LoginError;
use crate::settings::LoginSettings;
use crate::utils::cookie_utils::{create_state_cookie, expired_state_cookie, stored_state};
use crate::utils::crypto::{constant_time_eq, generate_oauth_state};
use crate::utils::logging::LoggingHelper;
use crate::utils::response_builder::ResponseBuilder;

/// Query parameters GitHub appends to the callback URL
#[derive(Deserialize, Debug)]
pub struct GitHubCallback {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

/// Start the login: store a fresh state and redirect to GitHub
pub async fn github_sign_in(
    authenticator: web::Data<Authenticator>,
    settings: web::Data<LoginSettings>,
) -> HttpResponse {
    let Some(strategy) = authenticator.strategy(PROVIDER_NAME) else {
        warn!("GitHub sign-in requested but no github strategy is registered");
        return ResponseBuilder::login_error(
            &LoginError::UnknownStrategy(PROVIDER_NAME.to_string()),
            None,
        );
    };

    let state = generate_oauth_state();
    match strategy.authorization_url(&state) {
        Ok(location) => {
            LoggingHelper::log_sign_in_redirect(PROVIDER_NAME);
            ResponseBuilder::redirect_with_cookie(
                &location,
                create_state_cookie(&state, settings.cookies.secure),
            )
        }
        Err(e) => {
            error!("Failed to build GitHub authorization URL: {e}");
            ResponseBuilder::login_error(&e, None)
        }
    }
}

/// Finish the login: check state, exchange the code and run the verify callback
pub async fn github_callback(
    query: web::Query<GitHubCallback>,
    req: HttpRequest,
    authenticator: web::Data<Authenticator>,
    settings: web::Data<LoginSettings>,
) -> HttpResponse {
    let callback = query.into_inner();
    debug!(
        "GitHub callback received: code={}, state={}, error={:?}",
        callback.code.is_some(),
        callback.state.is_some(),
        callback.error
    );

    let secure = settings.cookies.secure;
    let code = match validate_callback(&callback, &req, secure) {
        Ok(code) => code,
        Err(response) => return response,
    };

    match authenticator
        .exchange_and_authenticate(PROVIDER_NAME, &code)
        .await
    {
        Ok(identity) => HttpResponse::Ok()
            .cookie(expired_state_cookie(secure))
            .json(identity),
        Err(e) => {
            // collaborator failures were already reported by the verify callback
            if !matches!(e, LoginError::Resolution(_) | LoginError::Hook(_)) {
                warn!("GitHub login rejected: {e}");
            }
            ResponseBuilder::login_error(&e, Some(expired_state_cookie(secure)))
        }
    }
}

/// Validate the callback and extract the authorization code
fn validate_callback(
    callback: &GitHubCallback,
    req: &HttpRequest,
    secure: bool,
) -> Result<String, HttpResponse> {
    if let Some(provider_error) = &callback.error {
        warn!("GitHub returned an OAuth error: {provider_error}");
        let message = callback
            .error_description
            .as_deref()
            .unwrap_or(provider_error.as_str());
        return Err(ResponseBuilder::json_error(
            StatusCode::UNAUTHORIZED,
            "access_denied",
            message,
            Some(expired_state_cookie(secure)),
        ));
    }

    let Some(code) = callback.code.as_deref().filter(|code| !code.is_empty()) else {
        error!("No authorization code received");
        return Err(ResponseBuilder::json_error(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "Missing authorization code",
            Some(expired_state_cookie(secure)),
        ));
    };

    let received = callback.state.as_deref().unwrap_or_default();
    let state_ok = stored_state(req).is_some_and(|stored| constant_time_eq(&stored, received));
    if !state_ok {
        error!("OAuth state mismatch: received state does not match stored state");
        return Err(ResponseBuilder::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_state",
            "OAuth state is missing or does not match",
            Some(expired_state_cookie(secure)),
        ));
    }

    Ok(code.to_string())
}
