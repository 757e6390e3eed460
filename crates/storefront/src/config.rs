//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ROCKETSHOES_API_URL` - Base URL of the catalog/stock API (default: <http://localhost:3333>)
//! - `ROCKETSHOES_API_TOKEN` - Bearer token sent with every API request
//! - `ROCKETSHOES_STORAGE_PATH` - File backing the persisted cart (default: .rocketshoes/storage.json)
//! - `ROCKETSHOES_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 10)
//! - `ROCKETSHOES_CATALOG_CACHE_TTL_SECS` - Product metadata cache TTL, 0 disables (default: 300)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_STORAGE_PATH: &str = ".rocketshoes/storage.json";
const DEFAULT_REQUEST_TIMEOUT_SECS: &str = "10";
const DEFAULT_CATALOG_CACHE_TTL_SECS: &str = "300";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Catalog/stock API configuration
    pub api: ApiConfig,
    /// File backing the persisted cart
    pub storage_path: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., production, staging)
    pub sentry_environment: Option<String>,
}

/// Catalog/stock API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL; `/products/{id}` and `/stock/{id}` are resolved against it
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Per-request timeout
    pub request_timeout: Duration,
    /// Product metadata cache TTL (`None` disables caching)
    pub catalog_cache_ttl: Option<Duration>,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout", &self.request_timeout)
            .field("catalog_cache_ttl", &self.catalog_cache_ttl)
            .finish()
    }
}

impl ApiConfig {
    /// API configuration for `base_url` with default timeout and cache TTL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            request_timeout: Duration::from_secs(10),
            catalog_cache_ttl: Some(Duration::from_secs(300)),
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

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let api = ApiConfig::from_vars(&vars)?;
        let storage_path =
            PathBuf::from(vars.or_default("ROCKETSHOES_STORAGE_PATH", DEFAULT_STORAGE_PATH));

        Ok(Self {
            api,
            storage_path,
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
        })
    }
}

impl ApiConfig {
    fn from_vars<F>(vars: &Vars<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = parse_base_url(&vars.or_default("ROCKETSHOES_API_URL", DEFAULT_API_URL))
            .map_err(|e| ConfigError::InvalidEnvVar("ROCKETSHOES_API_URL".to_string(), e))?;

        let timeout_secs = parse_secs(
            "ROCKETSHOES_REQUEST_TIMEOUT_SECS",
            &vars.or_default("ROCKETSHOES_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "ROCKETSHOES_REQUEST_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let ttl_secs = parse_secs(
            "ROCKETSHOES_CATALOG_CACHE_TTL_SECS",
            &vars.or_default("ROCKETSHOES_CATALOG_CACHE_TTL_SECS", DEFAULT_CATALOG_CACHE_TTL_SECS),
        )?;

        Ok(Self {
            base_url,
            token: vars.optional("ROCKETSHOES_API_TOKEN").map(SecretString::from),
            request_timeout: Duration::from_secs(timeout_secs),
            catalog_cache_ttl: (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs)),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable source wrapper (the process environment in production).
struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable, treating empty values as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

/// Parse an API base URL, requiring http(s) and a trailing slash on the path.
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err("URL must have a host".to_string());
    }
    // Without a trailing slash, Url::join would replace the last path segment
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_secs(key: &str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
