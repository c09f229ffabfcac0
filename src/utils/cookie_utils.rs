use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::HttpRequest;

/// Cookie carrying the OAuth state between sign-in and callback
pub const OAUTH_STATE_COOKIE: &str = "ghlogin_oauth_state";

/// Short-lived state cookie, scoped to the GitHub auth routes
#[must_use]
pub fn create_state_cookie(state: &str, secure: bool) -> Cookie<'static> {
    Cookie::build(OAUTH_STATE_COOKIE, state.to_string())
        .path("/auth/github")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(10))
        .finish()
}

/// Expired state cookie that clears it in the browser
#[must_use]
pub fn expired_state_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build(OAUTH_STATE_COOKIE, "")
        .path("/auth/github")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(0))
        .finish()
}

/// Read the stored OAuth state from the request, if any
#[must_use]
pub fn stored_state(req: &HttpRequest) -> Option<String> {
    req.cookie(OAUTH_STATE_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}
