//! Application configuration.
//!
//! [`AppConfig`] is read from JSON text or from `TASKGUARD_`-prefixed
//! environment variables. Every field has a default, so an empty source
//! yields a usable in-memory configuration.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Prefix shared by every environment variable the service reads.
pub const ENV_PREFIX: &str = "TASKGUARD_";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Json(#[from] serde_json::Error),

    /// An environment variable held a value of the wrong shape.
    #[error("{key} must be an unsigned integer, got '{value}'")]
    NotANumber {
        /// Variable name.
        key: String,
        /// Raw value.
        value: String,
    },

    /// A value parsed but violates a constraint.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Offending field.
        field: &'static str,
        /// Constraint that failed.
        reason: &'static str,
    },
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, such as `info` or
    /// `taskguard=debug`.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_owned(),
        }
    }
}

/// Top-level service configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `PostgreSQL` connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Access token lifetime in minutes.
    pub token_ttl_minutes: u32,
    /// Page size used when a listing request does not name one.
    pub default_page_size: u32,
    /// Upper bound applied to requested page sizes.
    pub max_page_size: u32,
    /// Maximum number of pooled database connections.
    pub db_pool_size: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            logging: LoggingConfig::default(),
            token_ttl_minutes: 30,
            default_page_size: 10,
            max_page_size: 100,
            db_pool_size: 8,
        }
    }
}

impl AppConfig {
    /// Parses and validates a JSON document. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for malformed JSON or invalid values.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unparseable or invalid values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    ///
    /// `lookup` receives full variable names, prefix included.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unparseable or invalid values.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));
        let number = |name: &str, fallback: u32| -> Result<u32, ConfigError> {
            read(name).map_or(Ok(fallback), |value| {
                value.trim().parse().map_err(|_| ConfigError::NotANumber {
                    key: format!("{ENV_PREFIX}{name}"),
                    value,
                })
            })
        };

        let defaults = Self::default();
        let config = Self {
            database_url: read("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            logging: LoggingConfig {
                filter: read("LOG").unwrap_or(defaults.logging.filter),
            },
            token_ttl_minutes: number("TOKEN_TTL_MINUTES", defaults.token_ttl_minutes)?,
            default_page_size: number("DEFAULT_PAGE_SIZE", defaults.default_page_size)?,
            max_page_size: number("MAX_PAGE_SIZE", defaults.max_page_size)?,
            db_pool_size: number("DB_POOL_SIZE", defaults.db_pool_size)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first violated constraint.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.token_ttl_minutes == 0 {
            return Err(ConfigError::Invalid {
                field: "token_ttl_minutes",
                reason: "must be greater than zero",
            });
        }
        if self.default_page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "default_page_size",
                reason: "must be greater than zero",
            });
        }
        if self.max_page_size < self.default_page_size {
            return Err(ConfigError::Invalid {
                field: "max_page_size",
                reason: "must not be smaller than default_page_size",
            });
        }
        if self.db_pool_size == 0 {
            return Err(ConfigError::Invalid {
                field: "db_pool_size",
                reason: "must be greater than zero",
            });
        }
        Ok(())
    }

    /// Token lifetime as a duration.
    #[must_use]
    pub fn token_ttl(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.token_ttl_minutes))
    }

    /// Resolves a requested page size: the default when absent, clamped to
    /// `1..=max_page_size`.
    #[must_use]
    pub fn page_limit(&self, requested: Option<u32>) -> u32 {
        let ceiling = self.max_page_size.max(1);
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, ceiling)
    }
}
