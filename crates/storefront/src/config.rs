//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `LUV2SHOP_API_URL` - Base URL of the luv2shop REST API (e.g., <http://localhost:8080/api>)
//! - `OIDC_CLIENT_ID` - OIDC client ID used by the browser sign-in flow
//! - `OIDC_ISSUER` - OIDC issuer URL
//! - `OIDC_REDIRECT_URI` - OIDC redirect (callback) URI
//!
//! ## Optional
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 4200)
//! - `CART_STORE_PATH` - File backing the persisted cart (default: data/cart.json)
//! - `OIDC_SCOPES` - Space-separated scopes (default: "openid profile email")
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use url::Url;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the luv2shop REST API
    pub api_url: Url,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// File backing the persisted cart snapshot
    pub cart_store_path: PathBuf,
    /// OIDC client configuration handed to the browser
    pub oidc: OidcConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

/// OIDC client configuration.
///
/// Sign-in itself happens in the browser against the identity provider;
/// the storefront only serves these values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OidcConfig {
    pub client_id: String,
    pub issuer: Url,
    pub redirect_uri: Url,
    pub scopes: Vec<String>,
}

impl StorefrontConfig {
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

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let api_url = env.url("LUV2SHOP_API_URL")?;
        let host = env
            .or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = env
            .or_default("STOREFRONT_PORT", "4200")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let cart_store_path = PathBuf::from(env.or_default("CART_STORE_PATH", "data/cart.json"));

        let oidc = OidcConfig {
            client_id: env.required("OIDC_CLIENT_ID")?,
            issuer: env.url("OIDC_ISSUER")?,
            redirect_uri: env.url("OIDC_REDIRECT_URI")?,
            scopes: env
                .or_default("OIDC_SCOPES", "openid profile email")
                .split_whitespace()
                .map(str::to_owned)
                .collect(),
        };

        Ok(Self {
            api_url,
            host,
            port,
            cart_store_path,
            oidc,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.rate("SENTRY_SAMPLE_RATE", 1.0)?,
            sentry_traces_sample_rate: env.rate("SENTRY_TRACES_SAMPLE_RATE", 0.0)?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        (self.0)(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable. Empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Get a required absolute http(s) URL.
    fn url(&self, key: &str) -> Result<Url, ConfigError> {
        let raw = self.required(key)?;
        let url = Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(url)
    }

    /// Get a sample rate in `0.0..=1.0`.
    fn rate(&self, key: &str, default: f32) -> Result<f32, ConfigError> {
        let Some(raw) = self.optional(key) else {
            return Ok(default);
        };
        let rate = raw
            .parse::<f32>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("must be between 0.0 and 1.0 (got {rate})"),
            ));
        }
        Ok(rate)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn base_vars() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("LUV2SHOP_API_URL", "http://localhost:8080/api"),
            ("OIDC_CLIENT_ID", "0oa-storefront"),
            ("OIDC_ISSUER", "https://id.example.com/oauth2/default"),
            ("OIDC_REDIRECT_URI", "http://localhost:4200/callback"),
        ])
    }

    fn load(vars: &HashMap<&'static str, &'static str>) -> Result<StorefrontConfig, ConfigError> {
        StorefrontConfig::from_lookup(|key| vars.get(key).map(|v| (*v).to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = load(&base_vars()).unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:8080/api");
        assert_eq!(config.port, 4200);
        assert_eq!(config.cart_store_path, PathBuf::from("data/cart.json"));
        assert_eq!(config.oidc.scopes, vec!["openid", "profile", "email"]);
        assert!(config.sentry_dsn.is_none());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_missing_required() {
        let mut vars = base_vars();
        vars.remove("OIDC_CLIENT_ID");
        let err = load(&vars).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "OIDC_CLIENT_ID"));
    }

    #[test]
    fn test_invalid_api_url() {
        let mut vars = base_vars();
        vars.insert("LUV2SHOP_API_URL", "not a url");
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::InvalidEnvVar(_, _)
        ));

        vars.insert("LUV2SHOP_API_URL", "ftp://example.com/api");
        assert!(matches!(
            load(&vars).unwrap_err(),
            ConfigError::InvalidEnvVar(_, _)
        ));
    }

    #[test]
    fn test_invalid_port() {
        let mut vars = base_vars();
        vars.insert("STOREFRONT_PORT", "99999");
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_sample_rate_out_of_range() {
        let mut vars = base_vars();
        vars.insert("SENTRY_TRACES_SAMPLE_RATE", "1.5");
        assert!(load(&vars).is_err());
    }

    #[test]
    fn test_custom_scopes() {
        let mut vars = base_vars();
        vars.insert("OIDC_SCOPES", "openid  email");
        let config = load(&vars).unwrap();
        assert_eq!(config.oidc.scopes, vec!["openid", "email"]);
    }

    #[test]
    fn test_socket_addr() {
        let mut vars = base_vars();
        vars.insert("STOREFRONT_HOST", "0.0.0.0");
        vars.insert("STOREFRONT_PORT", "8081");
        let addr = load(&vars).unwrap().socket_addr();
        assert_eq!(addr.ip().to_string(), "0.0.0.0");
        assert_eq!(addr.port(), 8081);
    }
}
