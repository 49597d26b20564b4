//! Configuration faults.
//!
//! A [`SetupError`] means the application is wired wrong: a service id is
//! missing, a service has the wrong capability, or a route is malformed.
//! Faults raised by user code at request time are carried as
//! [`anyhow::Error`] instead.

use jelly_router::RouteError;
use thiserror::Error;

/// Result type alias using [`SetupError`].
pub type SetupResult<T> = Result<T, SetupError>;

/// Application wiring errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SetupError {
    /// No service is registered under the id.
    #[error("service '{id}' is not registered")]
    MissingService {
        /// Requested service id.
        id: String,
    },

    /// The service exists but cannot handle requests.
    #[error("service '{id}' is a {found}, not a handler")]
    NotAHandler {
        /// Requested service id.
        id: String,
        /// Capability the service actually has.
        found: &'static str,
    },

    /// The service exists but cannot wrap a handler.
    #[error("service '{id}' is a {found}, not a middleware")]
    NotAMiddleware {
        /// Requested service id.
        id: String,
        /// Capability the service actually has.
        found: &'static str,
    },

    /// A route was mapped to an id the kernel owns.
    #[error("service id '{id}' is reserved and cannot be mapped to a route")]
    ReservedServiceId {
        /// Offending id.
        id: String,
    },

    /// The method name is not a valid HTTP token.
    #[error("invalid HTTP method '{method}'")]
    InvalidMethod {
        /// Offending method name.
        method: String,
    },

    /// The route table rejected the pattern.
    #[error(transparent)]
    InvalidPattern(#[from] RouteError),
}

impl SetupError {
    /// Creates a [`SetupError::MissingService`].
    #[must_use]
    pub fn missing(id: impl Into<String>) -> Self {
        Self::MissingService { id: id.into() }
    }
}
