//! Configuration schema types.
//!
//! One struct per section. Every field has a default, so any section, or
//! any key within one, may be left out of a file.

use serde::{Deserialize, Serialize};

pub use jelly_telemetry::{LogConfig, LogFormat};

/// `[security_headers]` section.
///
/// # Example
///
/// ```
/// use jelly_config::SecurityHeadersConfig;
///
/// let config = SecurityHeadersConfig::default();
/// assert!(config.enabled);
/// assert_eq!(config.max_age, 30);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SecurityHeadersConfig {
    /// Whether the hardening headers middleware is registered.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// `max-age` for `Strict-Transport-Security` and `Expect-CT`, in seconds.
    #[serde(default = "default_max_age")]
    pub max_age: u64,
}

impl Default for SecurityHeadersConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            max_age: default_max_age(),
        }
    }
}

/// `[server_cloak]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ServerCloakConfig {
    /// Value for the `Server` header. `None` disables the cloak.
    #[serde(default)]
    pub server_name: Option<String>,
}

/// `[exceptions]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExceptionsConfig {
    /// Whether fault details are rendered into responses.
    ///
    /// **Warning**: only enable this in development.
    #[serde(default)]
    pub expose_details: bool,
}

fn default_true() -> bool {
    true
}

fn default_max_age() -> u64 {
    30
}
