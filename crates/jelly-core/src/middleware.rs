//! The [`Middleware`] capability and the [`Next`] continuation.
//!
//! A middleware receives the request together with the rest of the chain.
//! It may rewrite the request, answer on its own without calling
//! [`Next`], or delegate and post-process the response on the way out.

use crate::handler::Handler;
use crate::types::{BoxFuture, HandlerResult, Request};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// A request interceptor.
///
/// # Example
///
/// ```rust
/// use jelly_core::{BoxFuture, Handler, HandlerResult, Middleware, Next, Request};
///
/// struct Tag;
///
/// impl Middleware for Tag {
///     fn name(&self) -> &str {
///         "tag"
///     }
///
///     fn process<'a>(&'a self, request: Request, next: &'a Next) -> BoxFuture<'a, HandlerResult> {
///         Box::pin(async move {
///             let mut response = next.handle(request).await?;
///             response.headers_mut().insert("x-tag", "1".parse()?);
///             Ok(response)
///         })
///     }
/// }
/// ```
pub trait Middleware: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Processes the request, usually by awaiting `next.handle(request)`.
    ///
    /// Calling `next` once is the expected contract. Skipping it
    /// short-circuits the chain; calling it again re-runs everything inward
    /// of this middleware, so the request must be duplicated first.
    fn process<'a>(&'a self, request: Request, next: &'a Next) -> BoxFuture<'a, HandlerResult>;
}

impl<M: Middleware + ?Sized> Middleware for Arc<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn process<'a>(&'a self, request: Request, next: &'a Next) -> BoxFuture<'a, HandlerResult> {
        (**self).process(request, next)
    }
}

/// The remainder of a middleware chain.
///
/// Each link is reference counted, so cloning a `Next` is cheap and a chain
/// can be composed once and then handle any number of requests.
#[derive(Clone)]
pub struct Next {
    link: Arc<Link>,
}

enum Link {
    Terminal(Arc<dyn Handler>),
    Layer {
        middleware: Arc<dyn Middleware>,
        next: Next,
    },
}

impl Next {
    /// A chain that calls `handler` directly.
    #[must_use]
    pub fn terminal(handler: Arc<dyn Handler>) -> Self {
        Self {
            link: Arc::new(Link::Terminal(handler)),
        }
    }

    /// A chain that runs `middleware` around `next`.
    #[must_use]
    pub fn layer(middleware: Arc<dyn Middleware>, next: Next) -> Self {
        Self {
            link: Arc::new(Link::Layer { middleware, next }),
        }
    }

    /// Number of middleware between here and the terminal handler.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Link::Layer { next, .. } = current.link.as_ref() {
            depth += 1;
            current = next;
        }
        depth
    }

    /// Middleware names from here inwards.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.depth());
        let mut current = self;
        while let Link::Layer { middleware, next } = current.link.as_ref() {
            names.push(middleware.name().to_string());
            current = next;
        }
        names
    }
}

impl Handler for Next {
    fn handle<'a>(&'a self, request: Request) -> BoxFuture<'a, HandlerResult> {
        match self.link.as_ref() {
            Link::Terminal(handler) => handler.handle(request),
            Link::Layer { middleware, next } => middleware.process(request, next),
        }
    }
}

impl fmt::Debug for Next {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next").field("layers", &self.names()).finish()
    }
}

/// A middleware built from an async function.
///
/// The function receives an owned [`Next`], so the returned future does not
/// borrow from the chain.
///
/// ```rust
/// use jelly_core::{FnMiddleware, Handler};
///
/// let passthrough = FnMiddleware::new("passthrough", |request, next| async move {
///     next.handle(request).await
/// });
/// ```
pub struct FnMiddleware<F> {
    name: String,
    func: F,
}

impl<F> FnMiddleware<F> {
    /// Creates a new function-based middleware.
    pub fn new<Fut>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn process<'a>(&'a self, request: Request, next: &'a Next) -> BoxFuture<'a, HandlerResult> {
        Box::pin((self.func)(request, next.clone()))
    }
}
