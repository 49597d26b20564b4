//! Last-resort fault handling.

use bytes::Bytes;
use http::StatusCode;
use jelly_core::{BoxFuture, Handler, HandlerResult, Middleware, Next, Request, Response, ResponseExt};

/// Logs any fault raised inward of it and answers `500`.
///
/// Unlike [`ExceptionTrapper`](super::ExceptionTrapper) it needs no
/// exception handler, so it can sit outermost and catch faults from the
/// exception handler too. By default the response body is empty; with
/// [`expose_details`](Self::expose_details) it carries the fault and its
/// causes as plain text.
#[derive(Debug, Clone, Copy, Default)]
pub struct UncaughtExceptionSafeguard {
    expose_details: bool,
}

impl UncaughtExceptionSafeguard {
    /// Creates a safeguard that hides fault details.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            expose_details: false,
        }
    }

    /// Sets whether the fault text is sent to the client.
    ///
    /// **Warning**: only enable this in development.
    #[must_use]
    pub const fn expose_details(mut self, expose: bool) -> Self {
        self.expose_details = expose;
        self
    }
}

impl Middleware for UncaughtExceptionSafeguard {
    fn name(&self) -> &str {
        "uncaught_exception_safeguard"
    }

    fn process<'a>(&'a self, request: Request, next: &'a Next) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            let method = request.method().clone();
            let path = request.uri().path().to_string();
            match next.handle(request).await {
                Ok(response) => Ok(response),
                Err(err) => {
                    tracing::error!(%method, %path, error = ?err, "uncaught fault");
                    if self.expose_details {
                        Ok(Response::text(
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Bytes::from(format!("{err:?}")),
                        ))
                    } else {
                        Ok(Response::empty(StatusCode::INTERNAL_SERVER_ERROR))
                    }
                }
            }
        })
    }
}
