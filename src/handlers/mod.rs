// HTTP request handlers for the GitHub login service
pub mod github;

use actix_web::{web, HttpResponse};

use crate::models::HealthResponse;

pub use github::{github_callback, github_sign_in};

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

/// Route table shared by the server binary and the integration tests
pub fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/github", web::get().to(github_sign_in))
        .route(crate::github::CALLBACK_PATH, web::get().to(github_callback))
        .route("/ping", web::get().to(health));
}
