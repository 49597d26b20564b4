//! Exception trapping.
//!
//! Catches a fault raised anywhere inward of this middleware and hands the
//! request to the exception handler, with the fault stored under
//! [`keys::EXCEPTION`]. The handler sees the request as it entered the
//! trapper, not as inner middleware rewrote it.
//!
//! A fault raised by the exception handler itself is not caught again.

use jelly_core::{
    keys, services, BoxFuture, Handler, HandlerResult, Middleware, Next, Request, RequestExt,
    ServiceLocator, SetupError,
};
use std::sync::Arc;

/// Middleware that routes faults to the exception handler.
#[derive(Clone)]
pub struct ExceptionTrapper {
    exception_handler: Arc<dyn Handler>,
}

impl ExceptionTrapper {
    /// Creates a trapper that renders faults with `exception_handler`.
    #[must_use]
    pub fn new(exception_handler: Arc<dyn Handler>) -> Self {
        Self { exception_handler }
    }

    /// Creates a trapper around the service registered under
    /// [`services::EXCEPTION_HANDLER`].
    ///
    /// # Errors
    ///
    /// Fails when that service is missing or is not a handler.
    pub fn from_locator(locator: &dyn ServiceLocator) -> Result<Self, SetupError> {
        locator.handler(services::EXCEPTION_HANDLER).map(Self::new)
    }
}

impl std::fmt::Debug for ExceptionTrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExceptionTrapper").finish_non_exhaustive()
    }
}

impl Middleware for ExceptionTrapper {
    fn name(&self) -> &str {
        "exception_trapper"
    }

    fn process<'a>(&'a self, request: Request, next: &'a Next) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            let retained = request.duplicate();
            match next.handle(request).await {
                Ok(response) => Ok(response),
                Err(err) => {
                    tracing::debug!(error = %err, "trapped fault, re-dispatching to exception handler");
                    let request = retained.with_attribute(keys::EXCEPTION, err);
                    self.exception_handler.handle(request).await
                }
            }
        })
    }
}
