//! Built-in handlers for the reserved error cases.

use crate::attributes::RequestExt;
use crate::handler::Handler;
use crate::keys;
use crate::types::{BoxFuture, HandlerResult, Request, Response, ResponseExt};
use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, ALLOW, CONTENT_TYPE};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use std::fmt::Write as _;

/// Answers every request with the same response.
///
/// ```rust
/// use jelly_core::handlers::StaticResponse;
/// use http::StatusCode;
///
/// let not_found = StaticResponse::text(StatusCode::NOT_FOUND, "Not Found");
/// ```
#[derive(Debug, Clone)]
pub struct StaticResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl StaticResponse {
    /// A response with the given status and body and no headers.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// A `text/plain` response.
    pub fn text(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self::new(status, body).with_header(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )
    }

    /// Adds a header to every response.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    fn render(&self) -> Response {
        let mut response = http::Response::new(Full::new(self.body.clone()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();
        response
    }
}

impl Handler for StaticResponse {
    fn handle<'a>(&'a self, _request: Request) -> BoxFuture<'a, HandlerResult> {
        let response = self.render();
        Box::pin(async move { Ok(response) })
    }
}

/// Answers every request with a bodiless response.
#[derive(Debug, Clone, Copy)]
pub struct EmptyResponse(pub StatusCode);

impl Handler for EmptyResponse {
    fn handle<'a>(&'a self, _request: Request) -> BoxFuture<'a, HandlerResult> {
        let status = self.0;
        Box::pin(async move { Ok(Response::empty(status)) })
    }
}

/// Answers `405 Method Not Allowed` with an `Allow` header.
///
/// The header lists the methods the kernel stored under
/// [`keys::ALLOWED_METHODS`], in registration order, joined by `", "`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MethodNotAllowed;

impl Handler for MethodNotAllowed {
    fn handle<'a>(&'a self, request: Request) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            let allowed = request
                .attributes()
                .list(keys::ALLOWED_METHODS)
                .map(|methods| methods.join(", "))
                .unwrap_or_default();

            let mut response = Response::text(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed");
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_str(&allowed)?);
            Ok(response)
        })
    }
}

/// Renders the trapped fault as a `500` text page, cause chain included.
///
/// Meant for development; the message may leak internals.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugException;

impl Handler for DebugException {
    fn handle<'a>(&'a self, request: Request) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            let attributes = request.attributes();
            let mut body = String::from("Internal Server Error\n");
            if let Some(err) = attributes.exception(keys::EXCEPTION) {
                for (depth, cause) in err.chain().enumerate() {
                    let label = if depth == 0 { "error" } else { "caused by" };
                    writeln!(body, "{label}: {cause}")?;
                }
            }
            Ok(Response::text(StatusCode::INTERNAL_SERVER_ERROR, body))
        })
    }
}
