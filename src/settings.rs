use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::github::GitHubEndpoints;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoginSettings {
    pub application: ApplicationSettings,
    pub github: GitHubSettings,
    pub cookies: CookieSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    /// Public origin the login routes are served from; the GitHub callback
    /// URL is derived from it
    pub login_origin: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitHubSettings {
    // Direct values (can be overridden by environment variables)
    pub client_id: Option<String>,
    pub client_secret: Option<String>,

    // Environment variable names for overrides
    pub client_id_env: Option<String>,
    pub client_secret_env: Option<String>,

    pub scope: String,
    pub authorize_url: String,
    pub token_url: String,
    pub api_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CookieSettings {
    pub secure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3030,
            login_origin: "http://localhost:3030".to_string(),
        }
    }
}

impl Default for GitHubSettings {
    fn default() -> Self {
        let endpoints = GitHubEndpoints::default();
        Self {
            client_id: None,
            client_secret: None,
            client_id_env: Some("GITHUB_CLIENT_ID".to_string()),
            client_secret_env: Some("GITHUB_CLIENT_SECRET".to_string()),
            scope: crate::github::strategy::DEFAULT_SCOPE.to_string(),
            authorize_url: endpoints.authorize_url,
            token_url: endpoints.token_url,
            api_base_url: endpoints.api_base_url,
        }
    }
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            secure: true, // Default to secure cookies
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoginSettings {
    /// Load settings from configuration files and environment variables,
    /// then initialise the logger at the configured level
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_env_file();

        let mut settings = Self::load_base_settings()?;
        Self::apply_env_overrides(&mut settings);

        settings.initialize_logging();
        Ok(settings)
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `GHLOGIN_SECRETS_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read
    /// - TOML parsing fails
    pub fn load_base_settings() -> Result<Self, Box<dyn std::error::Error>> {
        let mut settings = Self::default();

        let default_config_path = Path::new("Settings.toml");
        if default_config_path.exists() {
            settings = Self::from_toml_file(default_config_path)?;
            println!(
                "✓ Loaded base settings from {}",
                default_config_path.display()
            );
        }

        if let Ok(secrets_dir) = std::env::var("GHLOGIN_SECRETS_DIR") {
            let secrets_path = Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                settings = Self::from_toml_file(&secrets_path)?;
                println!("✓ Overriding settings from {}", secrets_path.display());
            } else {
                println!(
                    "ℹ GHLOGIN_SECRETS_DIR set but no Settings.toml found at: {}",
                    secrets_path.display()
                );
            }
        }

        Ok(settings)
    }

    /// Parse a settings file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    pub fn from_toml_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let toml_content = fs::read_to_string(path)?;
        Ok(basic_toml::from_str(&toml_content)?)
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_application_env_overrides(&mut settings.application);
        Self::apply_cookie_env_overrides(&mut settings.cookies);
        Self::apply_logging_env_overrides(&mut settings.logging);
    }

    fn apply_application_env_overrides(app_settings: &mut ApplicationSettings) {
        if let Ok(host) = std::env::var("HOST") {
            app_settings.host = host;
        }
        if let Ok(port_str) = std::env::var("PORT") {
            if let Ok(port) = port_str.parse::<u16>() {
                app_settings.port = port;
            }
        }
        if let Ok(login_origin) = std::env::var("LOGIN_ORIGIN") {
            app_settings.login_origin = login_origin;
        }
    }

    fn apply_cookie_env_overrides(cookie_settings: &mut CookieSettings) {
        if let Ok(cookie_secure_str) = std::env::var("COOKIE_SECURE") {
            if let Ok(cookie_secure) = cookie_secure_str.parse::<bool>() {
                cookie_settings.secure = cookie_secure;
            }
        }
    }

    fn apply_logging_env_overrides(logging_settings: &mut LoggingSettings) {
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            logging_settings.level = log_level;
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = fs::read_to_string(".env") {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    fn initialize_logging(&self) {
        if let Err(e) = env_logger::Builder::new()
            .parse_filters(&self.logging.level)
            .try_init()
        {
            // already installed, e.g. a second load in the same process
            log::debug!("Logger not initialised: {e}");
        }
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }
}

impl GitHubSettings {
    /// Get the client ID, checking environment variable first, then falling back to direct value
    #[must_use]
    pub fn get_client_id(&self) -> Option<String> {
        Self::env_or_value(self.client_id_env.as_deref(), self.client_id.as_deref())
    }

    /// Get the client secret, checking environment variable first, then the direct value
    #[must_use]
    pub fn get_client_secret(&self) -> Option<String> {
        Self::env_or_value(
            self.client_secret_env.as_deref(),
            self.client_secret.as_deref(),
        )
    }

    #[must_use]
    pub fn endpoints(&self) -> GitHubEndpoints {
        GitHubEndpoints {
            authorize_url: self.authorize_url.clone(),
            token_url: self.token_url.clone(),
            api_base_url: self.api_base_url.clone(),
        }
    }

    fn env_or_value(env_var: Option<&str>, value: Option<&str>) -> Option<String> {
        if let Some(env_var) = env_var {
            if let Ok(value) = std::env::var(env_var) {
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }
        value.map(ToString::to_string)
    }
}
