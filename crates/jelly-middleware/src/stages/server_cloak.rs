//! Server identity masking.

use http::header::{HeaderName, HeaderValue, SERVER};
use jelly_core::{BoxFuture, Handler, HandlerResult, Middleware, Next, Request};

static X_POWERED_BY: HeaderName = HeaderName::from_static("x-powered-by");

/// Strips `X-Powered-By` and replaces `Server` with a fixed name.
#[derive(Debug, Clone)]
pub struct ServerCloak {
    server_name: HeaderValue,
}

impl ServerCloak {
    /// Creates the middleware.
    ///
    /// # Errors
    ///
    /// Fails when `server_name` is not a valid header value.
    pub fn new(server_name: &str) -> Result<Self, http::header::InvalidHeaderValue> {
        Ok(Self {
            server_name: HeaderValue::from_str(server_name)?,
        })
    }
}

impl Middleware for ServerCloak {
    fn name(&self) -> &str {
        "server_cloak"
    }

    fn process<'a>(&'a self, request: Request, next: &'a Next) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            let mut response = next.handle(request).await?;
            let headers = response.headers_mut();
            headers.remove(&X_POWERED_BY);
            headers.insert(SERVER, self.server_name.clone());
            Ok(response)
        })
    }
}
