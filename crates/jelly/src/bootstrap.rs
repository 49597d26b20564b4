//! Default services built from configuration.
//!
//! [`default_container`] registers the reserved handlers and the built-in
//! middleware under the ids in [`ids`]. Applications add their own handlers
//! to the returned container, then call [`wrap_defaults`] on the builder.

use jelly_config::{ConfigError, JellyConfig};
use jelly_core::handlers::{DebugException, MethodNotAllowed, StaticResponse};
use jelly_core::{services, Container, ServiceLocator, SetupError};
use jelly_middleware::{ExceptionTrapper, SecurityHeaders, ServerCloak, UncaughtExceptionSafeguard};
use http::StatusCode;
use std::sync::Arc;

use crate::kernel::JellyBuilder;

/// Service ids of the built-in middleware.
pub mod ids {
    /// [`ExceptionTrapper`](jelly_middleware::ExceptionTrapper) bound to the exception handler.
    pub const EXCEPTION_TRAPPER: &str = "jelly.middleware.exception_trapper";

    /// [`SecurityHeaders`](jelly_middleware::SecurityHeaders).
    pub const SECURITY_HEADERS: &str = "jelly.middleware.security_headers";

    /// [`ServerCloak`](jelly_middleware::ServerCloak).
    pub const SERVER_CLOAK: &str = "jelly.middleware.server_cloak";

    /// [`UncaughtExceptionSafeguard`](jelly_middleware::UncaughtExceptionSafeguard).
    pub const SAFEGUARD: &str = "jelly.middleware.uncaught_exception_safeguard";
}

/// Builds a container holding the reserved handlers and built-in middleware.
///
/// | Id | Service |
/// |----|---------|
/// | not-found handler | `404 Not Found` text |
/// | bad-method handler | `405` with `Allow` |
/// | exception handler | `500`, with the fault chain when `exceptions.expose_details` |
/// | [`ids::EXCEPTION_TRAPPER`] | trapper bound to the exception handler |
/// | [`ids::SAFEGUARD`] | last-resort `500` |
/// | [`ids::SECURITY_HEADERS`] | only when `security_headers.enabled` |
/// | [`ids::SERVER_CLOAK`] | only when `server_cloak.server_name` is set |
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` when `config` does not validate.
pub fn default_container(config: &JellyConfig) -> Result<Container, ConfigError> {
    config.validate()?;

    let mut container = Container::new();
    container
        .register_handler(
            services::NOT_FOUND_HANDLER,
            StaticResponse::text(StatusCode::NOT_FOUND, "Not Found"),
        )
        .register_handler(services::BAD_METHOD_HANDLER, MethodNotAllowed);

    if config.exceptions.expose_details {
        container.register_handler(services::EXCEPTION_HANDLER, DebugException);
    } else {
        container.register_handler(
            services::EXCEPTION_HANDLER,
            StaticResponse::text(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        );
    }

    let trapper = ExceptionTrapper::from_locator(&container)
        .map_err(|e| ConfigError::invalid_value("exceptions", e.to_string()))?;
    container
        .register_middleware(ids::EXCEPTION_TRAPPER, trapper)
        .register_middleware(
            ids::SAFEGUARD,
            UncaughtExceptionSafeguard::new().expose_details(config.exceptions.expose_details),
        );

    if config.security_headers.enabled {
        container.register_middleware(
            ids::SECURITY_HEADERS,
            SecurityHeaders::new(config.security_headers.max_age),
        );
    }

    if let Some(name) = &config.server_cloak.server_name {
        let cloak = ServerCloak::new(name)
            .map_err(|e| ConfigError::invalid_value("server_cloak.server_name", e.to_string()))?;
        container.register_middleware(ids::SERVER_CLOAK, cloak);
    }

    Ok(container)
}

/// Wraps every handler in the built-in middleware registered by
/// [`default_container`].
///
/// From the inside out: the exception trapper, security headers, server
/// cloak, then the safeguard. Error pages therefore carry the hardening
/// headers, and a failing exception handler still yields a `500`. Stages
/// missing from the builder's locator are skipped, except the trapper and
/// the safeguard.
///
/// # Errors
///
/// Fails when the trapper or safeguard is not registered as middleware.
pub fn wrap_defaults(builder: JellyBuilder) -> Result<JellyBuilder, SetupError> {
    let locator = Arc::clone(builder.locator());
    let mut builder = builder.wrap(ids::EXCEPTION_TRAPPER)?;
    for optional in [ids::SECURITY_HEADERS, ids::SERVER_CLOAK] {
        if locator.has(optional) {
            builder = builder.wrap(optional)?;
        }
    }
    builder.wrap(ids::SAFEGUARD)
}
