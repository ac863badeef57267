//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional; defaults target a local development fleet:
//!
//! - `MERIDIAN_USER_SERVICE_URL` - user/auth service (default: <http://localhost:8085>)
//! - `MERIDIAN_CATALOG_SERVICE_URL` - product catalog (default: <http://localhost:8084>)
//! - `MERIDIAN_CART_SERVICE_URL` - cart + order service (default: <http://localhost:8087>)
//! - `MERIDIAN_WISHLIST_SERVICE_URL` - wishlist service (default: <http://localhost:8089>)
//! - `MERIDIAN_SESSION_FILE` - durable auth session path
//!   (default: `$HOME/.meridian/session.json`)
//! - `MERIDIAN_REQUEST_TIMEOUT_SECS` - per-request timeout (default: 10)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the user/auth service.
    pub user_service_url: Url,
    /// Base URL of the product catalog service.
    pub catalog_service_url: Url,
    /// Base URL of the cart + order service.
    pub cart_service_url: Url,
    /// Base URL of the wishlist service.
    pub wishlist_service_url: Url,
    /// Path of the persisted auth session file.
    pub session_file: PathBuf,
    /// Per-request timeout applied to every service call.
    pub request_timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from a `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a service URL or the timeout fails to
    /// parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            user_service_url: get_url("MERIDIAN_USER_SERVICE_URL", "http://localhost:8085")?,
            catalog_service_url: get_url("MERIDIAN_CATALOG_SERVICE_URL", "http://localhost:8084")?,
            cart_service_url: get_url("MERIDIAN_CART_SERVICE_URL", "http://localhost:8087")?,
            wishlist_service_url: get_url("MERIDIAN_WISHLIST_SERVICE_URL", "http://localhost:8089")?,
            session_file: session_file_path(),
            request_timeout: get_timeout("MERIDIAN_REQUEST_TIMEOUT_SECS", 10)?,
        })
    }
}

fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn get_url(key: &str, default: &str) -> Result<Url, ConfigError> {
    Url::parse(&get_env_or_default(key, default))
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn get_timeout(key: &str, default_secs: u64) -> Result<Duration, ConfigError> {
    let secs = get_env_or_default(key, &default_secs.to_string())
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    Ok(Duration::from_secs(secs))
}

fn session_file_path() -> PathBuf {
    if let Some(path) = std::env::var_os("MERIDIAN_SESSION_FILE") {
        return PathBuf::from(path);
    }
    std::env::var_os("HOME").map_or_else(
        || PathBuf::from(".meridian-session.json"),
        |home| PathBuf::from(home).join(".meridian").join("session.json"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_fleet() {
        let config = StorefrontConfig::from_env().unwrap();
        assert_eq!(config.user_service_url.port(), Some(8085));
        assert_eq!(config.catalog_service_url.port(), Some(8084));
        assert_eq!(config.cart_service_url.port(), Some(8087));
        assert_eq!(config.wishlist_service_url.port(), Some(8089));
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }
}
