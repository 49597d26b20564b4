//! The kernel: route registration and request dispatch.
//!
//! Setup happens on a [`JellyBuilder`]. Every id it is handed is checked
//! against the service locator straight away, so wiring mistakes surface
//! before the first request. [`JellyBuilder::build`] freezes the route table
//! and chain resolver into a [`Jelly`], which is cheap to clone and safe to
//! share across tasks.
//!
//! # Dispatch
//!
//! ```text
//! request ─► RouteTable::match_route
//!              │ Found             → handler id, args
//!              │ NotFound          → not-found handler, error type
//!              │ MethodNotAllowed  → bad-method handler, error type, allowed methods
//!              ▼
//!            MiddlewareChainResolver::resolve(handler id)
//!              ▼ look up services, outermost first
//!            ExecutionStack::compose(handler, middleware).handle(request)
//! ```
//!
//! Faults are not caught here. Wrap an
//! [`ExceptionTrapper`](jelly_middleware::ExceptionTrapper) to turn them
//! into responses; otherwise they come back as
//! [`DispatchError::Unhandled`].

use crate::error::DispatchError;
use http::Method;
use jelly_core::{
    keys, services, BoxFuture, Handler, HandlerResult, Request, RequestExt, Response,
    RoutingError, ServiceLocator, SetupError,
};
use jelly_middleware::{ExecutionStack, MiddlewareChainResolver};
use jelly_router::{MatchResult, Route, RouteTable};
use jelly_telemetry::metrics::{self, DispatchOutcome};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Non-standard verb accepted by [`JellyBuilder::update`].
const UPDATE: &str = "UPDATE";

/// Builder for a [`Jelly`] kernel.
///
/// # Example
///
/// ```rust
/// use jelly::prelude::*;
/// use jelly_core::handlers::{MethodNotAllowed, StaticResponse};
/// use http::StatusCode;
/// use std::sync::Arc;
///
/// # fn main() -> Result<(), SetupError> {
/// let mut container = Container::new();
/// container
///     .register_handler(services::NOT_FOUND_HANDLER, StaticResponse::text(StatusCode::NOT_FOUND, "Not Found"))
///     .register_handler(services::BAD_METHOD_HANDLER, MethodNotAllowed)
///     .register_handler("hello_handler", StaticResponse::text(StatusCode::OK, "hello"));
///
/// let jelly = JellyBuilder::new(Arc::new(container))?
///     .get("/hello/{name}", "hello_handler", &[])?
///     .build();
///
/// assert_eq!(jelly.routes().len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct JellyBuilder {
    locator: Arc<dyn ServiceLocator>,
    routes: RouteTable,
    resolver: MiddlewareChainResolver,
}

impl JellyBuilder {
    /// Creates a builder over `locator`.
    ///
    /// # Errors
    ///
    /// Fails when the not-found or bad-method handler is missing from the
    /// locator or is not a handler.
    pub fn new(locator: Arc<dyn ServiceLocator>) -> Result<Self, SetupError> {
        for id in [services::NOT_FOUND_HANDLER, services::BAD_METHOD_HANDLER] {
            locator.handler(id)?;
        }

        // Reserved handlers join their own group so they can be tagged.
        let mut resolver = MiddlewareChainResolver::new();
        for id in services::RESERVED {
            resolver.push_handler(id, std::iter::empty::<String>());
        }

        Ok(Self {
            locator,
            routes: RouteTable::new(),
            resolver,
        })
    }

    /// Returns the service locator every id is checked against.
    #[must_use]
    pub fn locator(&self) -> &Arc<dyn ServiceLocator> {
        &self.locator
    }

    /// Routes `method` requests matching `pattern` to `handler_id`, adding
    /// the handler to `groups`.
    ///
    /// `method` is upper-cased before use, so `"get"` and `"GET"` are the
    /// same verb. Any valid HTTP token is accepted.
    ///
    /// # Errors
    ///
    /// Fails when the method is not a valid token, when `handler_id` is a
    /// reserved id or does not name a handler, or when the route table
    /// rejects the pattern.
    pub fn map(
        mut self,
        method: &str,
        pattern: &str,
        handler_id: &str,
        groups: &[&str],
    ) -> Result<Self, SetupError> {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes()).map_err(|_| {
            SetupError::InvalidMethod {
                method: method.to_string(),
            }
        })?;

        if services::is_reserved(handler_id) {
            return Err(SetupError::ReservedServiceId {
                id: handler_id.to_string(),
            });
        }
        self.locator.handler(handler_id)?;

        self.routes.add_route(method.clone(), pattern, handler_id)?;
        self.resolver
            .push_handler(handler_id, groups.iter().copied());

        debug!(%method, pattern, handler_id, ?groups, "route mapped");
        Ok(self)
    }

    /// Maps a `GET` route.
    pub fn get(self, pattern: &str, handler_id: &str, groups: &[&str]) -> Result<Self, SetupError> {
        self.map(Method::GET.as_str(), pattern, handler_id, groups)
    }

    /// Maps a `POST` route.
    pub fn post(self, pattern: &str, handler_id: &str, groups: &[&str]) -> Result<Self, SetupError> {
        self.map(Method::POST.as_str(), pattern, handler_id, groups)
    }

    /// Maps a `PUT` route.
    pub fn put(self, pattern: &str, handler_id: &str, groups: &[&str]) -> Result<Self, SetupError> {
        self.map(Method::PUT.as_str(), pattern, handler_id, groups)
    }

    /// Maps an `UPDATE` route.
    pub fn update(self, pattern: &str, handler_id: &str, groups: &[&str]) -> Result<Self, SetupError> {
        self.map(UPDATE, pattern, handler_id, groups)
    }

    /// Maps a `DELETE` route.
    pub fn delete(self, pattern: &str, handler_id: &str, groups: &[&str]) -> Result<Self, SetupError> {
        self.map(Method::DELETE.as_str(), pattern, handler_id, groups)
    }

    /// Maps a `PATCH` route.
    pub fn patch(self, pattern: &str, handler_id: &str, groups: &[&str]) -> Result<Self, SetupError> {
        self.map(Method::PATCH.as_str(), pattern, handler_id, groups)
    }

    /// Wraps every handler, reserved ones included, in `middleware_id`.
    ///
    /// Middleware wrapped later sits further out.
    ///
    /// # Errors
    ///
    /// Fails when `middleware_id` does not name a middleware.
    pub fn wrap(mut self, middleware_id: &str) -> Result<Self, SetupError> {
        self.locator.middleware(middleware_id)?;
        self.resolver.push_global_middleware(middleware_id);
        debug!(middleware_id, "global middleware added");
        Ok(self)
    }

    /// Wraps the handlers of each group in `groups` in `middleware_id`.
    ///
    /// A handler id is also a group, so tagging with a handler id targets
    /// that handler alone.
    ///
    /// # Errors
    ///
    /// Fails when `middleware_id` does not name a middleware.
    pub fn tag(mut self, middleware_id: &str, groups: &[&str]) -> Result<Self, SetupError> {
        self.locator.middleware(middleware_id)?;
        for group in groups {
            self.resolver.push_local_middleware(middleware_id, *group);
        }
        debug!(middleware_id, ?groups, "group middleware added");
        Ok(self)
    }

    /// Freezes the registrations.
    #[must_use]
    pub fn build(self) -> Jelly {
        metrics::describe_metrics();
        debug!(routes = self.routes.len(), "kernel built");
        Jelly {
            shared: Arc::new(Shared {
                locator: self.locator,
                routes: self.routes,
                resolver: self.resolver,
            }),
        }
    }
}

impl std::fmt::Debug for JellyBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JellyBuilder")
            .field("routes", &self.routes.len())
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

struct Shared {
    locator: Arc<dyn ServiceLocator>,
    routes: RouteTable,
    resolver: MiddlewareChainResolver,
}

/// A frozen kernel.
///
/// Clones share the same route table, resolver and locator.
#[derive(Clone)]
pub struct Jelly {
    shared: Arc<Shared>,
}

impl Jelly {
    /// Routes `request`, wraps the selected handler in its middleware and
    /// runs it.
    ///
    /// Before the chain runs the request carries [`keys::HANDLER`] and
    /// [`keys::MIDDLEWARE_CHAIN`], plus [`keys::ARGS`] on a match or
    /// [`keys::ERROR_TYPE`] on a miss. A method mismatch also sets
    /// [`keys::ALLOWED_METHODS`].
    ///
    /// # Errors
    ///
    /// [`DispatchError::Setup`] when a service disappeared from the locator
    /// or lost its capability after setup, and
    /// [`DispatchError::Unhandled`] when a fault escapes the chain.
    pub async fn dispatch(&self, request: Request) -> Result<Response, DispatchError> {
        let start = Instant::now();
        let (request, handler_id, outcome) = self.route(request);

        let result = self.execute(request, &handler_id).await;
        match &result {
            Ok(_) => metrics::record_dispatch(outcome, start.elapsed()),
            Err(DispatchError::Setup(err)) => {
                warn!(handler_id = %handler_id, error = %err, "service lookup failed during dispatch");
                metrics::record_setup_error();
            }
            Err(DispatchError::Unhandled(err)) => {
                warn!(handler_id = %handler_id, error = %err, "fault escaped the middleware chain");
                metrics::record_dispatch(DispatchOutcome::Unhandled, start.elapsed());
            }
        }
        result
    }

    fn route(&self, mut request: Request) -> (Request, String, DispatchOutcome) {
        let matched = self
            .shared
            .routes
            .match_route(request.method(), request.uri().path());

        let (handler_id, outcome) = match matched {
            MatchResult::Found { handler_id, args } => {
                request.set_attribute(keys::ARGS, args);
                (handler_id.to_string(), DispatchOutcome::Found)
            }
            MatchResult::NotFound => {
                request.set_attribute(keys::ERROR_TYPE, RoutingError::NotFound);
                (services::NOT_FOUND_HANDLER.to_string(), DispatchOutcome::NotFound)
            }
            MatchResult::MethodNotAllowed { allowed } => {
                let allowed: Vec<String> = allowed.iter().map(|m| m.as_str().to_string()).collect();
                request.set_attribute(keys::ERROR_TYPE, RoutingError::MethodNotAllowed);
                request.set_attribute(keys::ALLOWED_METHODS, allowed);
                (
                    services::BAD_METHOD_HANDLER.to_string(),
                    DispatchOutcome::MethodNotAllowed,
                )
            }
        };
        request.set_attribute(keys::HANDLER, handler_id.as_str());

        debug!(
            method = %request.method(),
            path = request.uri().path(),
            handler_id = %handler_id,
            outcome = outcome.as_str(),
            "request routed"
        );
        (request, handler_id, outcome)
    }

    async fn execute(&self, mut request: Request, handler_id: &str) -> Result<Response, DispatchError> {
        let locator = &self.shared.locator;
        let handler = locator.handler(handler_id)?;

        // The resolver lists innermost first; the stack wants outermost first.
        let mut chain = self.shared.resolver.resolve(handler_id);
        chain.reverse();
        let layers = chain
            .iter()
            .map(|id| locator.middleware(id))
            .collect::<Result<Vec<_>, _>>()?;

        request.set_attribute(keys::MIDDLEWARE_CHAIN, chain);

        ExecutionStack::compose(handler, layers)
            .handle(request)
            .await
            .map_err(DispatchError::Unhandled)
    }

    /// Returns the registered routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        self.shared.routes.routes()
    }

    /// Returns the middleware ids that wrap `handler_id`, outermost first.
    #[must_use]
    pub fn middleware_chain(&self, handler_id: &str) -> Vec<String> {
        let mut chain = self.shared.resolver.resolve(handler_id);
        chain.reverse();
        chain
    }
}

impl std::fmt::Debug for Jelly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Jelly")
            .field("routes", &self.shared.routes.len())
            .finish_non_exhaustive()
    }
}

/// A kernel can be mounted wherever a handler is expected.
impl Handler for Jelly {
    fn handle<'a>(&'a self, request: Request) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move { self.dispatch(request).await.map_err(anyhow::Error::from) })
    }
}
