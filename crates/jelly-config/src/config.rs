//! Main configuration type.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ExceptionsConfig, LogConfig, SecurityHeadersConfig, ServerCloakConfig};

/// Complete Jelly configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use jelly_config::JellyConfig;
///
/// let config = JellyConfig::default();
/// assert_eq!(config.logging.level, "info");
/// assert_eq!(config.security_headers.max_age, 30);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct JellyConfig {
    /// Log subscriber settings.
    #[serde(default)]
    pub logging: LogConfig,

    /// Hardening headers settings.
    #[serde(default)]
    pub security_headers: SecurityHeadersConfig,

    /// `Server` header masking.
    #[serde(default)]
    pub server_cloak: ServerCloakConfig,

    /// Fault rendering settings.
    #[serde(default)]
    pub exceptions: ExceptionsConfig,
}

impl JellyConfig {
    /// Debug logging, pretty output and visible fault details.
    #[must_use]
    pub fn development() -> Self {
        Self {
            logging: LogConfig::development(),
            exceptions: ExceptionsConfig {
                expose_details: true,
            },
            ..Self::default()
        }
    }

    /// JSON logging and hidden fault details.
    #[must_use]
    pub fn production() -> Self {
        Self {
            logging: LogConfig::production(),
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The log level directive does not parse
    /// - `security_headers.max_age` is zero while the headers are enabled
    /// - `server_cloak.server_name` is empty or not a valid header value
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging
            .validate()
            .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;

        if self.security_headers.enabled && self.security_headers.max_age == 0 {
            return Err(ConfigError::invalid_value(
                "security_headers.max_age",
                "must be positive when security headers are enabled",
            ));
        }

        if let Some(name) = &self.server_cloak.server_name {
            if name.is_empty() {
                return Err(ConfigError::invalid_value(
                    "server_cloak.server_name",
                    "must not be empty",
                ));
            }
            if !name.bytes().all(|b| b == b'\t' || (0x20..0x7f).contains(&b)) {
                return Err(ConfigError::invalid_value(
                    "server_cloak.server_name",
                    "must be printable ASCII",
                ));
            }
        }

        Ok(())
    }
}
