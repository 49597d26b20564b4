//! Onion composition of middleware around a terminal handler.

use jelly_core::{BoxFuture, Handler, HandlerResult, Middleware, Next, Request};
use std::sync::Arc;

/// A terminal handler wrapped by an ordered list of middleware.
///
/// `layers[0]` is the outermost wrapper: it sees the request first and the
/// response last. Errors are not caught here; trapping is a middleware
/// like any other.
///
/// # Example
///
/// ```rust
/// use jelly_core::{handler_fn, FnMiddleware, Handler, Middleware, Response, ResponseExt};
/// use jelly_middleware::ExecutionStack;
/// use http::StatusCode;
/// use std::sync::Arc;
///
/// let terminal = Arc::new(handler_fn(|_| async { Ok(Response::empty(StatusCode::OK)) }));
/// let outer: Arc<dyn Middleware> = Arc::new(FnMiddleware::new("outer", |request, next| async move {
///     next.handle(request).await
/// }));
///
/// let stack = ExecutionStack::compose(terminal, vec![outer]);
/// assert_eq!(stack.layer_names(), vec!["outer".to_string()]);
/// ```
#[derive(Clone, Debug)]
pub struct ExecutionStack {
    entry: Next,
}

impl ExecutionStack {
    /// Wraps `terminal` in `layers`, outermost first.
    #[must_use]
    pub fn compose(terminal: Arc<dyn Handler>, layers: Vec<Arc<dyn Middleware>>) -> Self {
        // Innermost layer wraps the terminal first.
        let entry = layers
            .into_iter()
            .rev()
            .fold(Next::terminal(terminal), |next, middleware| {
                Next::layer(middleware, next)
            });
        Self { entry }
    }

    /// Number of middleware layers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.entry.depth()
    }

    /// Middleware names, outermost first.
    #[must_use]
    pub fn layer_names(&self) -> Vec<String> {
        self.entry.names()
    }
}

impl Handler for ExecutionStack {
    fn handle<'a>(&'a self, request: Request) -> BoxFuture<'a, HandlerResult> {
        self.entry.handle(request)
    }
}
