//! The [`Handler`] capability.

use crate::types::{BoxFuture, HandlerResult, Request};
use std::future::Future;
use std::sync::Arc;

/// Request-to-response logic bound to a route or a reserved error case.
///
/// Handlers are stored behind `Arc<dyn Handler>` in a service locator and
/// shared across concurrent requests, so `handle` takes `&self`.
///
/// # Example
///
/// ```rust
/// use jelly_core::{BoxFuture, Handler, HandlerResult, Request, Response, ResponseExt};
/// use http::StatusCode;
///
/// struct Hello;
///
/// impl Handler for Hello {
///     fn handle<'a>(&'a self, _request: Request) -> BoxFuture<'a, HandlerResult> {
///         Box::pin(async { Ok(Response::text(StatusCode::OK, "hello")) })
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Produces a response, or a fault for an exception trapper to catch.
    fn handle<'a>(&'a self, request: Request) -> BoxFuture<'a, HandlerResult>;
}

impl<H: Handler + ?Sized> Handler for Arc<H> {
    fn handle<'a>(&'a self, request: Request) -> BoxFuture<'a, HandlerResult> {
        (**self).handle(request)
    }
}

/// A handler built from an async function.
///
/// ```rust
/// use jelly_core::{handler_fn, Response, ResponseExt};
/// use http::StatusCode;
///
/// let hello = handler_fn(|_request| async { Ok(Response::text(StatusCode::OK, "hi")) });
/// ```
pub struct FnHandler<F> {
    func: F,
}

impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn handle<'a>(&'a self, request: Request) -> BoxFuture<'a, HandlerResult> {
        Box::pin((self.func)(request))
    }
}

/// Wraps an async function as a [`Handler`].
pub fn handler_fn<F, Fut>(func: F) -> FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    FnHandler { func }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Response, ResponseExt};
    use bytes::Bytes;
    use http::StatusCode;
    use http_body_util::Full;

    #[tokio::test]
    async fn test_fn_handler() {
        let handler = handler_fn(|request: Request| async move {
            Ok(Response::text(StatusCode::OK, request.uri().path().to_string()))
        });
        let request = http::Request::new(Full::new(Bytes::new()));

        let response = handler.handle(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_shared_handler() {
        let handler: Arc<dyn Handler> =
            Arc::new(handler_fn(|_| async { Err(anyhow::anyhow!("nope")) }));
        let err = handler
            .handle(http::Request::new(Full::new(Bytes::new())))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "nope");
    }
}
