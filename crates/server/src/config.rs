//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOCKVISION_HOST` - Bind address (default: 127.0.0.1)
//! - `STOCKVISION_PORT` - Listen port (default: 3000)
//! - `STOCKVISION_SEED_DEMO_DATA` - Load the demo catalog on startup
//!   (default: false)
//! - `SUGGESTION_API_URL` - Reorder-suggestion service endpoint; the
//!   suggestion route is disabled when unset
//! - `SUGGESTION_API_KEY` - Bearer token for the suggestion service
//!   (required when the URL is set)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment label

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use secrecy::SecretString;
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

/// Server application configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Load the demo catalog and profiles at startup
    pub seed_demo_data: bool,
    /// Reorder-suggestion service configuration, when enabled
    pub reorder: Option<ReorderConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment label
    pub sentry_environment: Option<String>,
}

/// Reorder-suggestion service configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ReorderConfig {
    /// Suggestion service endpoint
    pub endpoint: Url,
    /// Bearer token for the suggestion service
    pub api_key: SecretString,
}

impl std::fmt::Debug for ReorderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReorderConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            seed_demo_data: false,
            reorder: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a variable is present but malformed, or
    /// when `SUGGESTION_API_URL` is set without `SUGGESTION_API_KEY`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let host = match std::env::var("STOCKVISION_HOST") {
            Ok(raw) => parse_env("STOCKVISION_HOST", &raw)?,
            Err(_) => defaults.host,
        };
        let port = match std::env::var("STOCKVISION_PORT") {
            Ok(raw) => parse_env("STOCKVISION_PORT", &raw)?,
            Err(_) => defaults.port,
        };
        let seed_demo_data = std::env::var("STOCKVISION_SEED_DEMO_DATA")
            .map(|raw| parse_flag(&raw))
            .unwrap_or(false);

        let reorder = match std::env::var("SUGGESTION_API_URL") {
            Ok(raw) => {
                let endpoint = Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("SUGGESTION_API_URL".to_owned(), e.to_string())
                })?;
                let api_key = std::env::var("SUGGESTION_API_KEY")
                    .map(SecretString::from)
                    .map_err(|_| ConfigError::MissingEnvVar("SUGGESTION_API_KEY".to_owned()))?;
                Some(ReorderConfig { endpoint, api_key })
            }
            Err(_) => None,
        };

        Ok(Self {
            host,
            port,
            seed_demo_data,
            reorder,
            sentry_dsn: std::env::var("SENTRY_DSN").ok(),
            sentry_environment: std::env::var("SENTRY_ENVIRONMENT").ok(),
        })
    }

    /// The socket address to bind.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Parse a typed value out of an environment variable.
fn parse_env<T: std::str::FromStr>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string()))
}

/// Boolean flags accept "1", "true", and "yes" (case-insensitive).
fn parse_flag(raw: &str) -> bool {
    matches!(raw.to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_accept_common_spellings() {
        for raw in ["1", "true", "TRUE", "yes"] {
            assert!(parse_flag(raw), "{raw} should enable");
        }
        for raw in ["0", "false", "no", ""] {
            assert!(!parse_flag(raw), "{raw} should disable");
        }
    }

    #[test]
    fn typed_parse_reports_the_variable_name() {
        let err = parse_env::<u16>("STOCKVISION_PORT", "not-a-port").expect_err("invalid");
        assert!(err.to_string().contains("STOCKVISION_PORT"));
    }

    #[test]
    fn default_binds_localhost_3000() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
    }
}
