//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `FARMSTALL_API_URL` - Base URL of the Remote Store API
//!
//! ## Optional
//! - `FARMSTALL_TOKEN_PATH` - Token slot location
//!   (default: `$HOME/.farmstall/token`, falling back to `./.farmstall/token`)
//! - `FARMSTALL_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Remote Store API.
    pub api_base_url: Url,
    /// Path of the single-slot token file.
    pub token_path: PathBuf,
    /// Timeout applied to every HTTP request.
    pub http_timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("FARMSTALL_API_URL")?
            .parse::<Url>()
            .map_err(|e| ConfigError::InvalidEnvVar("FARMSTALL_API_URL".to_owned(), e.to_string()))?;

        let token_path = get_optional_env("FARMSTALL_TOKEN_PATH")
            .map_or_else(default_token_path, PathBuf::from);

        let http_timeout = match get_optional_env("FARMSTALL_HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("FARMSTALL_HTTP_TIMEOUT_SECS".to_owned(), e.to_string())
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            api_base_url,
            token_path,
            http_timeout,
        })
    }
}

/// Default token slot under the user's home directory.
fn default_token_path() -> PathBuf {
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from(".farmstall").join("token"),
        |home| PathBuf::from(home).join(".farmstall").join("token"),
    )
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}
