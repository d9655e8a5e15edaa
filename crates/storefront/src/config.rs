//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_STATIC_DIR` - Static asset directory (default: crates/storefront/static)
//! - `CATALOG_PRODUCTS_URL` - Remote product feed (default: DummyJSON)
//! - `CATALOG_REMOTE_ENABLED` - Fetch the remote feed at all (default: true)
//! - `CATALOG_PAGE_SIZE` - Products per page (default: 12)
//! - `CATALOG_INPUT_DEBOUNCE_MS` - Quiet period for numeric inputs (default: 400)
//! - `CATALOG_CACHE_TTL_SECS` - Remote response cache lifetime (default: 300)
//! - `CATALOG_REQUEST_TIMEOUT_SECS` - Remote request timeout (default: 10)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use catalog_core::{DEFAULT_INPUT_DEBOUNCE, DEFAULT_PAGE_SIZE, SessionOptions};
use thiserror::Error;
use url::Url;

/// Public product feed used when `CATALOG_PRODUCTS_URL` is unset.
pub const DEFAULT_PRODUCTS_URL: &str = "https://dummyjson.com/products?limit=100";

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATIC_DIR: &str = "crates/storefront/static";
const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

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
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Product catalog settings
    pub catalog: CatalogConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    pub sentry_environment: Option<String>,
    pub sentry_sample_rate: f32,
    pub sentry_traces_sample_rate: f32,
}

/// Product catalog settings.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub products_url: Url,
    /// When false, only the local dataset is used.
    pub remote_enabled: bool,
    pub page_size: usize,
    pub input_debounce: Duration,
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
            catalog: CatalogConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl Default for CatalogConfig {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self {
            products_url: Url::parse(DEFAULT_PRODUCTS_URL).expect("default products URL is valid"),
            remote_enabled: true,
            page_size: DEFAULT_PAGE_SIZE,
            input_debounce: DEFAULT_INPUT_DEBOUNCE,
            cache_ttl: DEFAULT_CACHE_TTL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
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

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            host: parse_or(&lookup, "STOREFRONT_HOST", defaults.host)?,
            port: parse_or(&lookup, "STOREFRONT_PORT", defaults.port)?,
            static_dir: lookup("STOREFRONT_STATIC_DIR")
                .map_or(defaults.static_dir, PathBuf::from),
            catalog: CatalogConfig::from_vars(&lookup)?,
            sentry_dsn: non_empty(&lookup, "SENTRY_DSN"),
            sentry_environment: non_empty(&lookup, "SENTRY_ENVIRONMENT"),
            sentry_sample_rate: parse_or(
                &lookup,
                "SENTRY_SAMPLE_RATE",
                defaults.sentry_sample_rate,
            )?,
            sentry_traces_sample_rate: parse_or(
                &lookup,
                "SENTRY_TRACES_SAMPLE_RATE",
                defaults.sentry_traces_sample_rate,
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl CatalogConfig {
    fn from_vars(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let page_size: usize = parse_or(lookup, "CATALOG_PAGE_SIZE", defaults.page_size)?;
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "CATALOG_PAGE_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            products_url: parse_or(lookup, "CATALOG_PRODUCTS_URL", defaults.products_url)?,
            remote_enabled: parse_bool(lookup, "CATALOG_REMOTE_ENABLED", defaults.remote_enabled)?,
            page_size,
            input_debounce: parse_millis(
                lookup,
                "CATALOG_INPUT_DEBOUNCE_MS",
                defaults.input_debounce,
            )?,
            cache_ttl: parse_secs(lookup, "CATALOG_CACHE_TTL_SECS", defaults.cache_ttl)?,
            request_timeout: parse_secs(
                lookup,
                "CATALOG_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout,
            )?,
        })
    }

    /// Options for a catalog session.
    #[must_use]
    pub const fn session_options(&self) -> SessionOptions {
        SessionOptions {
            page_size: self.page_size,
            input_debounce: self.input_debounce,
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable, treating an empty value as unset.
fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Parse a variable, falling back to `default` when unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    non_empty(lookup, key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

fn parse_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(raw) = non_empty(lookup, key) else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got '{other}'"),
        )),
    }
}

fn parse_millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    non_empty(lookup, key).map_or(Ok(default), |_| {
        parse_or(lookup, key, 0u64).map(Duration::from_millis)
    })
}

fn parse_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: Duration,
) -> Result<Duration, ConfigError> {
    non_empty(lookup, key).map_or(Ok(default), |_| {
        parse_or(lookup, key, 0u64).map(Duration::from_secs)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.catalog.page_size, 12);
        assert_eq!(config.catalog.input_debounce, Duration::from_millis(400));
        assert_eq!(config.catalog.cache_ttl, Duration::from_secs(300));
        assert_eq!(config.catalog.products_url.as_str(), DEFAULT_PRODUCTS_URL);
        assert!(config.catalog.remote_enabled);
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("CATALOG_PAGE_SIZE", "24"),
            ("CATALOG_INPUT_DEBOUNCE_MS", "250"),
            ("CATALOG_REMOTE_ENABLED", "false"),
            ("CATALOG_PRODUCTS_URL", "http://localhost:9000/products"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.catalog.page_size, 24);
        assert_eq!(config.catalog.input_debounce, Duration::from_millis(250));
        assert!(!config.catalog.remote_enabled);
        assert_eq!(config.catalog.products_url.host_str(), Some("localhost"));
    }

    #[test]
    fn test_invalid_port() {
        let err = config(&[("STOREFRONT_PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("STOREFRONT_PORT"));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(config(&[("CATALOG_PAGE_SIZE", "0")]).is_err());
    }

    #[test]
    fn test_invalid_bool() {
        assert!(config(&[("CATALOG_REMOTE_ENABLED", "maybe")]).is_err());
    }

    #[test]
    fn test_empty_dsn_is_unset() {
        let config = config(&[("SENTRY_DSN", "  ")]).unwrap();
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_session_options() {
        let config = config(&[("CATALOG_PAGE_SIZE", "6")]).unwrap();
        let options = config.catalog.session_options();
        assert_eq!(options.page_size, 6);
    }
}
