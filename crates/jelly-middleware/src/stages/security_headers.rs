//! Security hardening headers.
//!
//! Sets the following on every response, overwriting any value set inward:
//!
//! | Header | Value |
//! |--------|-------|
//! | `Expect-CT` | `enforce,max-age={max_age}` |
//! | `Permissions-Policy` | `interest-cohort=()` |
//! | `Strict-Transport-Security` | `max-age={max_age}` |
//! | `X-Content-Type-Options` | `nosniff` |
//! | `X-Frame-Options` | `DENY` |
//! | `X-XSS-Protection` | `1; mode=block` |

use http::header::{
    HeaderName, HeaderValue, STRICT_TRANSPORT_SECURITY, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
    X_XSS_PROTECTION,
};
use jelly_core::{BoxFuture, Handler, HandlerResult, Middleware, Next, Request};

/// Default `max-age`, in seconds.
pub const DEFAULT_MAX_AGE: u64 = 30;

static EXPECT_CT: HeaderName = HeaderName::from_static("expect-ct");
static PERMISSIONS_POLICY: HeaderName = HeaderName::from_static("permissions-policy");

/// Middleware that adds hardening headers to responses.
#[derive(Debug, Clone)]
pub struct SecurityHeaders {
    headers: Vec<(HeaderName, HeaderValue)>,
}

impl Default for SecurityHeaders {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AGE)
    }
}

impl SecurityHeaders {
    /// Creates the middleware with the given `max-age` for HSTS and Expect-CT.
    #[must_use]
    pub fn new(max_age: u64) -> Self {
        let headers = vec![
            (EXPECT_CT.clone(), header_value(&format!("enforce,max-age={max_age}"))),
            (PERMISSIONS_POLICY.clone(), HeaderValue::from_static("interest-cohort=()")),
            (STRICT_TRANSPORT_SECURITY, header_value(&format!("max-age={max_age}"))),
            (X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
            (X_FRAME_OPTIONS, HeaderValue::from_static("DENY")),
            (X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block")),
        ];
        Self { headers }
    }
}

/// Values built from `max_age` are ASCII digits and punctuation only.
fn header_value(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static(""))
}

impl Middleware for SecurityHeaders {
    fn name(&self) -> &str {
        "security_headers"
    }

    fn process<'a>(&'a self, request: Request, next: &'a Next) -> BoxFuture<'a, HandlerResult> {
        Box::pin(async move {
            let mut response = next.handle(request).await?;
            let headers = response.headers_mut();
            for (name, value) in &self.headers {
                headers.insert(name.clone(), value.clone());
            }
            Ok(response)
        })
    }
}
