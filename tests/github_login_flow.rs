// Integration tests for the GitHub sign-in and callback routes
use actix_web::cookie::Cookie;
use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use ghlogin::github::{GitHubLoginBinding, GitHubStrategy};
use ghlogin::handlers::configure_services;
use ghlogin::services::{InMemoryUserStore, PostAuthenticationHook, UserResolver};
use ghlogin::settings::LoginSettings;
use ghlogin::testing::constants::{TEST_CODE, TEST_EMAIL};
use ghlogin::testing::mock::{RecordingHook, RecordingSink, StaticExchange};
use ghlogin::testing::TestFixtures;
use ghlogin::utils::cookie_utils::OAUTH_STATE_COOKIE;
use ghlogin::{Authenticator, ProviderProfile};
use serde_json::Value;
use std::sync::Arc;

struct Harness {
    authenticator: Authenticator,
    store: Arc<InMemoryUserStore>,
    hook: Arc<RecordingHook>,
    exchange: Arc<StaticExchange>,
}

fn harness(profile: ProviderProfile) -> Harness {
    let store = Arc::new(InMemoryUserStore::new());
    let hook = Arc::new(RecordingHook::default());
    let exchange = Arc::new(StaticExchange::new(
        TEST_CODE,
        TestFixtures::exchange("gho_test_token", profile),
    ));

    let resolver: Arc<dyn UserResolver> = store.clone();
    let post_auth: Arc<dyn PostAuthenticationHook> = hook.clone();
    let services = ghlogin::LoginServices::new(resolver, post_auth)
        .with_sink(Arc::new(RecordingSink::default()));

    let mut authenticator = Authenticator::new();
    authenticator.use_strategy(GitHubStrategy::new(
        exchange.clone(),
        GitHubLoginBinding::new(services),
    ));

    Harness {
        authenticator,
        store,
        hook,
        exchange,
    }
}

fn insecure_settings() -> LoginSettings {
    let mut settings = LoginSettings::default();
    settings.cookies.secure = false;
    settings
}

macro_rules! login_app {
    ($authenticator:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($authenticator))
                .app_data(web::Data::new(insecure_settings()))
                .configure(configure_services),
        )
        .await
    };
}

#[actix_web::test]
async fn test_sign_in_redirects_with_state_cookie() {
    let h = harness(TestFixtures::profile_with_emails(&[TEST_EMAIL]));
    let app = login_app!(h.authenticator);

    let req = test::TestRequest::get().uri("/auth/github").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    let location = resp
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .unwrap()
        .to_string();
    let state_cookie = resp
        .response()
        .cookies()
        .find(|cookie| cookie.name() == OAUTH_STATE_COOKIE)
        .expect("state cookie should be set");

    assert!(location.starts_with("https://github.test/login/oauth/authorize"));
    assert!(location.ends_with(&format!("state={}", state_cookie.value())));
    assert_eq!(state_cookie.value().len(), 43);
    assert_eq!(state_cookie.http_only(), Some(true));
}

#[actix_web::test]
async fn test_callback_with_matching_state_returns_identity() {
    let h = harness(TestFixtures::profile_with_emails(&[TEST_EMAIL, "other@example.com"]));
    let store = h.store.clone();
    let hook = h.hook.clone();
    let app = login_app!(h.authenticator);

    let req = test::TestRequest::get()
        .uri(&format!("/auth/github/callback?code={TEST_CODE}&state=abc123"))
        .cookie(Cookie::new(OAUTH_STATE_COOKIE, "abc123"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let cleared = resp
        .response()
        .cookies()
        .find(|cookie| cookie.name() == OAUTH_STATE_COOKIE)
        .expect("state cookie should be cleared");
    assert_eq!(cleared.value(), "");

    let body: Value = test::read_body_json(resp).await;
    let stored = store.get_by_email(TEST_EMAIL).await.unwrap();
    assert_eq!(body["userId"], Value::String(stored.id.clone()));
    assert_eq!(store.len().await, 1);

    let extra_params = store.last_extra_params(TEST_EMAIL).await.unwrap();
    assert_eq!(extra_params["token_type"], "bearer");
    assert_eq!(extra_params["scope"], "user:email");
    assert!(!extra_params.contains_key("access_token"));

    let calls = hook.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].is_new_user);
    assert_eq!(calls[0].user.id, stored.id);
}

#[actix_web::test]
async fn test_second_login_is_not_a_new_user() {
    let h = harness(TestFixtures::profile_with_emails(&[TEST_EMAIL]));
    let hook = h.hook.clone();
    let app = login_app!(h.authenticator);

    let mut user_ids = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::get()
            .uri(&format!("/auth/github/callback?code={TEST_CODE}&state=s1"))
            .cookie(Cookie::new(OAUTH_STATE_COOKIE, "s1"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        user_ids.push(body["userId"].clone());
    }

    assert_eq!(user_ids[0], user_ids[1]);
    let calls = hook.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].is_new_user);
    assert!(!calls[1].is_new_user);
}

#[actix_web::test]
async fn test_callback_state_mismatch_skips_exchange() {
    let h = harness(TestFixtures::profile_with_emails(&[TEST_EMAIL]));
    let exchange = h.exchange.clone();
    let store = h.store.clone();
    let app = login_app!(h.authenticator);

    let req = test::TestRequest::get()
        .uri(&format!("/auth/github/callback?code={TEST_CODE}&state=forged"))
        .cookie(Cookie::new(OAUTH_STATE_COOKIE, "expected"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "invalid_state");
    assert!(exchange.codes().is_empty());
    assert!(store.is_empty().await);
}

#[actix_web::test]
async fn test_callback_without_state_cookie_is_rejected() {
    let h = harness(TestFixtures::profile_with_emails(&[TEST_EMAIL]));
    let exchange = h.exchange.clone();
    let app = login_app!(h.authenticator);

    let req = test::TestRequest::get()
        .uri(&format!("/auth/github/callback?code={TEST_CODE}&state=abc"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(exchange.codes().is_empty());
}

#[actix_web::test]
async fn test_callback_without_emails_is_missing_email() {
    let h = harness(TestFixtures::profile_without_emails());
    let store = h.store.clone();
    let hook = h.hook.clone();
    let app = login_app!(h.authenticator);

    let req = test::TestRequest::get()
        .uri(&format!("/auth/github/callback?code={TEST_CODE}&state=s1"))
        .cookie(Cookie::new(OAUTH_STATE_COOKIE, "s1"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "missing_email");
    assert_eq!(body["message"], "GitHub login requires an email address");
    assert!(store.is_empty().await);
    assert!(hook.calls().is_empty());
}

#[actix_web::test]
async fn test_callback_with_provider_error_is_access_denied() {
    let h = harness(TestFixtures::profile_with_emails(&[TEST_EMAIL]));
    let exchange = h.exchange.clone();
    let app = login_app!(h.authenticator);

    let req = test::TestRequest::get()
        .uri(concat!(
            "/auth/github/callback?error=access_denied",
            "&error_description=The+user+has+denied+your+application+access.&state=s1"
        ))
        .cookie(Cookie::new(OAUTH_STATE_COOKIE, "s1"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "access_denied");
    assert_eq!(body["message"], "The user has denied your application access.");
    assert!(exchange.codes().is_empty());
}

#[actix_web::test]
async fn test_callback_without_code_is_bad_request() {
    let h = harness(TestFixtures::profile_with_emails(&[TEST_EMAIL]));
    let app = login_app!(h.authenticator);

    let req = test::TestRequest::get()
        .uri("/auth/github/callback?state=s1")
        .cookie(Cookie::new(OAUTH_STATE_COOKIE, "s1"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_callback_with_rejected_code_is_bad_gateway() {
    let h = harness(TestFixtures::profile_with_emails(&[TEST_EMAIL]));
    let exchange = h.exchange.clone();
    let store = h.store.clone();
    let app = login_app!(h.authenticator);

    let req = test::TestRequest::get()
        .uri("/auth/github/callback?code=expired-code&state=s1")
        .cookie(Cookie::new(OAUTH_STATE_COOKIE, "s1"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "exchange_failed");
    assert_eq!(exchange.codes(), vec!["expired-code".to_string()]);
    assert!(store.is_empty().await);
}

#[actix_web::test]
async fn test_sign_in_without_strategy_is_not_found() {
    let app = login_app!(Authenticator::new());

    let req = test::TestRequest::get().uri("/auth/github").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_ping() {
    let app = login_app!(Authenticator::new());

    let req = test::TestRequest::get().uri("/ping").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], ghlogin::VERSION);
}
