//! Typed configuration for Jelly.
//!
//! - TOML and JSON configuration files
//! - Environment variable overrides
//! - Strict parsing (unknown fields are errors)
//! - Layered loading (defaults → `.env` → file → env)
//!
//! # Configuration File Format
//!
//! ```toml
//! [logging]
//! enabled = true
//! level = "info"
//! format = "json"
//!
//! [security_headers]
//! enabled = true
//! max_age = 30
//!
//! [server_cloak]
//! server_name = "jelly"
//!
//! [exceptions]
//! expose_details = false
//! ```
//!
//! # Environment Variable Overrides
//!
//! Keys use the format `PREFIX__SECTION__KEY`, for example:
//!
//! - `JELLY__LOGGING__LEVEL=debug`
//! - `JELLY__SECURITY_HEADERS__MAX_AGE=31536000`
//! - `JELLY__EXCEPTIONS__EXPOSE_DETAILS=true`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::JellyConfig;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
