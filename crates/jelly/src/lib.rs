//! # Jelly
//!
//! **A middleware-chain HTTP micro-framework**
//!
//! Jelly routes a request to a handler *service id*, wraps that handler in
//! the middleware bound to it and runs the resulting onion. Handlers and
//! middleware live in a service locator and are referred to by id
//! everywhere else.
//!
//! - **Routing** – radix tree with `{name}` and `*name` placeholders
//! - **Groups** – tag middleware onto groups of handlers, or onto one handler
//! - **Onion Composition** – the first middleware wrapped sees the request last
//! - **Fail Fast** – every id is checked against the locator at setup
//!
//! ## Quick Start
//!
//! ```rust
//! use jelly::prelude::*;
//! use jelly::bootstrap::{default_container, wrap_defaults};
//! use http::StatusCode;
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = JellyConfig::default();
//! let mut container = default_container(&config)?;
//! container.register_handler("hello_handler", handler_fn(|request: Request| async move {
//!     let attributes = request.attributes();
//!     let name = attributes
//!         .params(keys::ARGS)
//!         .and_then(|args| args.get("name"))
//!         .unwrap_or("stranger");
//!     Ok(Response::text(StatusCode::OK, format!("Hello, {name}!")))
//! }));
//!
//! let locator = Arc::new(container);
//! let builder = JellyBuilder::new(locator)?;
//! let jelly = wrap_defaults(builder)?
//!     .get("/hello/{name}", "hello_handler", &[])?
//!     .build();
//!
//! let request = http::Request::get("/hello/tron").body(Default::default())?;
//! let response = jelly.dispatch(request).await?;
//! assert_eq!(response.status(), StatusCode::OK);
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! | Crate | Contents |
//! |-------|----------|
//! | [`router`] | Route table |
//! | [`core`] | Handler and middleware traits, attributes, service locator |
//! | [`middleware`] | Chain resolver, execution stack, built-in middleware |
//! | [`telemetry`] | Logging setup and dispatch metrics |
//! | [`config`] | Typed configuration |

#![doc(html_root_url = "https://docs.rs/jelly/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod bootstrap;
mod error;
mod kernel;

pub use error::DispatchError;
pub use kernel::{Jelly, JellyBuilder};

pub use jelly_config as config;
pub use jelly_core as core;
pub use jelly_middleware as middleware;
pub use jelly_router as router;
pub use jelly_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use jelly::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{DispatchError, Jelly, JellyBuilder};

    pub use jelly_config::{ConfigLoader, JellyConfig};
    pub use jelly_core::{
        handler_fn, keys, services, Container, FnMiddleware, Handler, Middleware, Next, Request,
        RequestExt, Response, ResponseExt, ServiceLocator, SetupError,
    };
    pub use jelly_middleware::ExceptionTrapper;
}
