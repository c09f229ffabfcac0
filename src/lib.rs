#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the ghlogin application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod authentication;
pub mod github;
pub mod handlers;
pub mod models;
pub mod services;
pub mod settings;
pub mod testing;
pub mod utils;

/// Re-export commonly used items
pub use authentication::{Authenticator, Strategy};
pub use github::{add_github_strategy, add_github_strategy_from_settings, LoginServices};
pub use models::{AuthExchangeResult, LoginError, ProviderProfile, SessionIdentity};
pub use settings::LoginSettings;
