//! # Jelly Core
//!
//! Core types and traits for the Jelly middleware framework.
//!
//! - [`Handler`] and [`Middleware`] - the two capabilities a service can have
//! - [`Next`] - the continuation a middleware delegates to
//! - [`Attributes`] and [`RequestExt`] - per-request values set by the kernel
//! - [`ServiceLocator`] and [`Container`] - service lookup by string id
//! - [`SetupError`] - application wiring faults
//! - [`keys`] and [`services`] - reserved attribute keys and service ids

#![doc(html_root_url = "https://docs.rs/jelly-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod attributes;
mod container;
mod error;
mod handler;
pub mod handlers;
mod middleware;
mod reserved;
mod types;

pub use attributes::{AttributeValue, Attributes, RequestExt, RoutingError};
pub use container::{Container, Service, ServiceLocator};
pub use error::{SetupError, SetupResult};
pub use handler::{handler_fn, FnHandler, Handler};
pub use middleware::{FnMiddleware, Middleware, Next};
pub use reserved::{keys, services};
pub use types::{BoxFuture, HandlerResult, Request, Response, ResponseExt};

pub use jelly_router::PathArgs;
