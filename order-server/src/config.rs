//! Order server configuration

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in {1} environment")]
    MissingSecret(String, String),

    #[error("{0} must not be empty in {1} environment")]
    EmptySecret(String, String),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Order server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port
    pub http_port: u16,
    /// PostgreSQL connection URL (unset: in-memory store)
    pub database_url: Option<String>,
    /// JSON seed file for the in-memory store
    pub seed_file: Option<PathBuf>,
    /// HS256 secret for bearer tokens
    pub jwt_secret: String,
    /// Token lifetime
    pub jwt_expiry_hours: i64,
    /// Webhook that delivers one-time codes (unset: codes are logged)
    pub notify_webhook_url: Option<String>,
    /// Bearer key sent to the notification webhook
    pub notify_api_key: Option<String>,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, ConfigError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(ConfigError::MissingSecret(name.into(), environment.into()));
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(ConfigError::EmptySecret(name.into(), environment.into()));
        }
        Ok(val)
    }

    fn parsed<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
        match std::env::var(name) {
            Ok(raw) if !raw.is_empty() => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: name.into(),
                value: raw,
            }),
            _ => Ok(default),
        }
    }

    fn optional(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|s| !s.is_empty())
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        Ok(Self {
            http_port: Self::parsed("HTTP_PORT", 8000)?,
            database_url: Self::optional("DATABASE_URL"),
            seed_file: Self::optional("SEED_FILE").map(PathBuf::from),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiry_hours: Self::parsed("JWT_EXPIRY_HOURS", 24)?,
            notify_webhook_url: Self::optional("NOTIFY_WEBHOOK_URL"),
            notify_api_key: Self::optional("NOTIFY_API_KEY"),
            environment,
        })
    }
}
