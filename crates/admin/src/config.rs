//! Admin configuration loaded from environment variables.
//!
//! Shares the service fleet variables with the storefront and adds the
//! analytics service:
//!
//! - `MERIDIAN_USER_SERVICE_URL` (default: <http://localhost:8085>)
//! - `MERIDIAN_CATALOG_SERVICE_URL` (default: <http://localhost:8084>)
//! - `MERIDIAN_CART_SERVICE_URL` - also hosts orders (default: <http://localhost:8087>)
//! - `MERIDIAN_ANALYTICS_SERVICE_URL` (default: <http://localhost:8088>)
//! - `MERIDIAN_REQUEST_TIMEOUT_SECS` (default: 10)

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Admin client configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Base URL of the user/auth service.
    pub user_service_url: Url,
    /// Base URL of the product catalog service.
    pub catalog_service_url: Url,
    /// Base URL of the cart + order service.
    pub order_service_url: Url,
    /// Base URL of the analytics service.
    pub analytics_service_url: Url,
    /// Per-request timeout applied to every service call.
    pub request_timeout: Duration,
}

impl AdminConfig {
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
            order_service_url: get_url("MERIDIAN_CART_SERVICE_URL", "http://localhost:8087")?,
            analytics_service_url: get_url(
                "MERIDIAN_ANALYTICS_SERVICE_URL",
                "http://localhost:8088",
            )?,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_include_analytics() {
        let config = AdminConfig::from_env().unwrap();
        assert_eq!(config.analytics_service_url.port(), Some(8088));
        assert_eq!(config.order_service_url.port(), Some(8087));
    }
}
