#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use actix_web::{middleware::Logger, web, App, HttpServer};
use ghlogin::{
    add_github_strategy_from_settings,
    github::{self, PROVIDER_NAME},
    handlers::configure_services,
    services::{InMemoryUserStore, LoggingPostAuthentication},
    utils::logging::LoggingHelper,
    Authenticator, LoginServices, LoginSettings,
};
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = LoginSettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e}")))?;

    let services = LoginServices::new(
        Arc::new(InMemoryUserStore::new()),
        Arc::new(LoggingPostAuthentication),
    );

    let mut authenticator = Authenticator::new();
    add_github_strategy_from_settings(&mut authenticator, &settings, services).map_err(|e| {
        LoggingHelper::log_strategy_not_configured(PROVIDER_NAME, &e.to_string());
        std::io::Error::other(format!("Failed to register GitHub strategy: {e}"))
    })?;

    start_server(authenticator, settings).await
}

/// Start the login server
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(
    authenticator: Authenticator,
    settings: LoginSettings,
) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, &settings);

    let authenticator = web::Data::new(authenticator);
    let settings = web::Data::new(settings);

    HttpServer::new(move || {
        App::new()
            .app_data(authenticator.clone())
            .app_data(settings.clone())
            .wrap(Logger::default())
            .configure(configure_services)
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn print_startup_info(bind_address: &str, settings: &LoginSettings) {
    println!("Starting ghlogin on http://{bind_address}");
    println!();
    println!("GitHub login endpoints:");
    println!("  GET  /auth/github          - Redirect to GitHub authorization");
    println!("  GET  /auth/github/callback - OAuth callback");
    println!();
    println!("OAuth callback URL to register with GitHub:");
    println!(
        "  {}{}",
        settings.application.login_origin.trim_end_matches('/'),
        github::CALLBACK_PATH
    );
    println!();
    println!("System endpoints:");
    println!("  GET  /ping                 - Health check");
}
