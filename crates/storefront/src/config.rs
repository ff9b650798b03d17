//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `TIENDA_HOST` - Bind address (default: 127.0.0.1)
//! - `TIENDA_PORT` - Listen port (default: 3000)
//! - `TIENDA_CATALOG_URL` - Product catalog endpoint (default: <https://fakestoreapi.com/products>)
//! - `TIENDA_CATALOG_TIMEOUT_SECS` - Catalog request timeout in seconds (default: 10)
//! - `TIENDA_DATA_DIR` - Directory holding the cart snapshot (default: data)
//! - `TIENDA_CATEGORY_SEED` - Seed for category assignment; random per load when unset
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default product catalog endpoint.
pub const DEFAULT_CATALOG_URL: &str = "https://fakestoreapi.com/products";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Catalog API configuration
    pub catalog: CatalogConfig,
    /// Directory for the file-backed cart storage
    pub data_dir: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Endpoint returning the product list
    pub url: Url,
    /// Request timeout
    pub timeout: Duration,
    /// Seed for category assignment (random per process when `None`)
    pub category_seed: Option<u64>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = parse_env("TIENDA_HOST", "127.0.0.1")?;
        let port = parse_env("TIENDA_PORT", "3000")?;
        let catalog = CatalogConfig::from_env()?;
        let data_dir = PathBuf::from(get_env_or_default("TIENDA_DATA_DIR", "data"));

        Ok(Self {
            host,
            port,
            catalog,
            data_dir,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = parse_env("TIENDA_CATALOG_URL", DEFAULT_CATALOG_URL)?;
        let timeout_secs: u64 = parse_env("TIENDA_CATALOG_TIMEOUT_SECS", "10")?;
        let category_seed = get_optional_env("TIENDA_CATEGORY_SEED")
            .map(|seed| parse_value("TIENDA_CATEGORY_SEED", &seed))
            .transpose()?;

        Ok(Self {
            url,
            timeout: Duration::from_secs(timeout_secs),
            category_seed,
        })
    }

    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Configuration for `url` with the default timeout and random categories.
    #[must_use]
    pub const fn new(url: Url) -> Self {
        Self {
            url,
            timeout: Self::DEFAULT_TIMEOUT,
            category_seed: None,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, falling back to `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    parse_value(key, &get_env_or_default(key, default))
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_port() {
        let port: u16 = parse_value("TIENDA_PORT", " 8080 ").unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_value_invalid_port() {
        let result = parse_value::<u16>("TIENDA_PORT", "eighty");
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "TIENDA_PORT"));
    }

    #[test]
    fn test_parse_value_url() {
        let url: Url = parse_value("TIENDA_CATALOG_URL", DEFAULT_CATALOG_URL).unwrap();
        assert_eq!(url.host_str(), Some("fakestoreapi.com"));
        assert!(parse_value::<Url>("TIENDA_CATALOG_URL", "not a url").is_err());
    }

    #[test]
    fn test_catalog_config_new() {
        let config = CatalogConfig::new(Url::parse(DEFAULT_CATALOG_URL).unwrap());
        assert_eq!(config.url.as_str(), DEFAULT_CATALOG_URL);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert!(config.category_seed.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            catalog: CatalogConfig::new(Url::parse(DEFAULT_CATALOG_URL).unwrap()),
            data_dir: PathBuf::from("data"),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }
}
