//! Service lookup by string id.
//!
//! Routes and middleware bindings name their services by id. The kernel
//! resolves those ids through a [`ServiceLocator`] and checks the service has
//! the capability it needs. [`Container`] is the bundled implementation; any
//! other registry can be plugged in by implementing the trait.
//!
//! # Example
//!
//! ```rust
//! use jelly_core::{handler_fn, Container, Response, ResponseExt, ServiceLocator};
//! use http::StatusCode;
//!
//! let mut container = Container::new();
//! container.register_handler("hello_handler", handler_fn(|_| async {
//!     Ok(Response::text(StatusCode::OK, "hello"))
//! }));
//!
//! assert!(container.has("hello_handler"));
//! assert!(container.handler("hello_handler").is_ok());
//! assert!(container.middleware("hello_handler").is_err());
//! ```

use crate::error::SetupError;
use crate::handler::Handler;
use crate::middleware::Middleware;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// An opaque service handle.
#[derive(Clone)]
pub enum Service {
    /// Something that answers requests.
    Handler(Arc<dyn Handler>),
    /// Something that wraps a handler.
    Middleware(Arc<dyn Middleware>),
    /// Any other shared value.
    Value(Arc<dyn Any + Send + Sync>),
}

impl Service {
    /// Capability name used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Handler(_) => "handler",
            Self::Middleware(_) => "middleware",
            Self::Value(_) => "value",
        }
    }

    /// Returns the handler capability, if present.
    #[must_use]
    pub fn as_handler(&self) -> Option<Arc<dyn Handler>> {
        match self {
            Self::Handler(handler) => Some(Arc::clone(handler)),
            _ => None,
        }
    }

    /// Returns the middleware capability, if present.
    #[must_use]
    pub fn as_middleware(&self) -> Option<Arc<dyn Middleware>> {
        match self {
            Self::Middleware(middleware) => Some(Arc::clone(middleware)),
            _ => None,
        }
    }

    /// Returns the value as `T`, if it is one.
    #[must_use]
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Self::Value(value) => Arc::clone(value).downcast::<T>().ok(),
            _ => None,
        }
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Middleware(middleware) => write!(f, "Service::Middleware({})", middleware.name()),
            other => write!(f, "Service::{}", other.kind()),
        }
    }
}

/// Resolves service ids.
pub trait ServiceLocator: Send + Sync {
    /// Returns true if a service is registered under `id`.
    fn has(&self, id: &str) -> bool;

    /// Returns the service registered under `id`.
    fn get(&self, id: &str) -> Result<Service, SetupError>;

    /// Returns the service under `id` as a handler.
    fn handler(&self, id: &str) -> Result<Arc<dyn Handler>, SetupError> {
        let service = self.get(id)?;
        service.as_handler().ok_or_else(|| {
            debug!(id, found = service.kind(), "service is not a handler");
            SetupError::NotAHandler {
                id: id.to_string(),
                found: service.kind(),
            }
        })
    }

    /// Returns the service under `id` as a middleware.
    fn middleware(&self, id: &str) -> Result<Arc<dyn Middleware>, SetupError> {
        let service = self.get(id)?;
        service.as_middleware().ok_or_else(|| {
            debug!(id, found = service.kind(), "service is not a middleware");
            SetupError::NotAMiddleware {
                id: id.to_string(),
                found: service.kind(),
            }
        })
    }
}

impl<L: ServiceLocator + ?Sized> ServiceLocator for Arc<L> {
    fn has(&self, id: &str) -> bool {
        (**self).has(id)
    }

    fn get(&self, id: &str) -> Result<Service, SetupError> {
        (**self).get(id)
    }
}

/// A string-keyed service registry.
///
/// Services are registered once at startup; registering an id again
/// replaces the previous service.
#[derive(Default, Clone)]
pub struct Container {
    services: HashMap<String, Service>,
}

impl Container {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a service handle under `id`.
    pub fn register(&mut self, id: impl Into<String>, service: Service) -> &mut Self {
        self.services.insert(id.into(), service);
        self
    }

    /// Registers a handler under `id`.
    pub fn register_handler(&mut self, id: impl Into<String>, handler: impl Handler) -> &mut Self {
        self.register(id, Service::Handler(Arc::new(handler)))
    }

    /// Registers a middleware under `id`.
    pub fn register_middleware(
        &mut self,
        id: impl Into<String>,
        middleware: impl Middleware,
    ) -> &mut Self {
        self.register(id, Service::Middleware(Arc::new(middleware)))
    }

    /// Registers an arbitrary shared value under `id`.
    pub fn register_value<T: Any + Send + Sync>(
        &mut self,
        id: impl Into<String>,
        value: Arc<T>,
    ) -> &mut Self {
        self.register(id, Service::Value(value))
    }

    /// Returns the number of registered services.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl ServiceLocator for Container {
    fn has(&self, id: &str) -> bool {
        self.services.contains_key(id)
    }

    fn get(&self, id: &str) -> Result<Service, SetupError> {
        self.services
            .get(id)
            .cloned()
            .ok_or_else(|| SetupError::missing(id))
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.services.keys().collect();
        ids.sort();
        f.debug_struct("Container").field("services", &ids).finish()
    }
}
