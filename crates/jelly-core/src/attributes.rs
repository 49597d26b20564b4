//! Request attributes.
//!
//! Attributes are a string-keyed bag attached to each request through its
//! extensions. The kernel stores routing results here and middleware may add
//! its own entries. Setting an attribute never mutates a bag another request
//! copy can observe: the map is shared until written, then copied.

use crate::types::Request;
use indexmap::IndexMap;
use jelly_router::PathArgs;
use std::fmt;
use std::sync::Arc;

/// Why routing failed to select a user handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutingError {
    /// No route pattern matches the path.
    NotFound,
    /// The path matches but the method is not bound.
    MethodNotAllowed,
}

impl RoutingError {
    /// Stable lowercase name, used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::MethodNotAllowed => "method_not_allowed",
        }
    }
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value stored under an attribute key.
#[derive(Debug, Clone)]
pub enum AttributeValue {
    /// Free-form text.
    Text(String),
    /// Ordered list of strings.
    List(Vec<String>),
    /// Captured path arguments.
    Params(PathArgs),
    /// Routing miss marker.
    Routing(RoutingError),
    /// A fault raised by a handler or middleware.
    Exception(Arc<anyhow::Error>),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<String>> for AttributeValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<PathArgs> for AttributeValue {
    fn from(value: PathArgs) -> Self {
        Self::Params(value)
    }
}

impl From<RoutingError> for AttributeValue {
    fn from(value: RoutingError) -> Self {
        Self::Routing(value)
    }
}

impl From<anyhow::Error> for AttributeValue {
    fn from(value: anyhow::Error) -> Self {
        Self::Exception(Arc::new(value))
    }
}

/// Copy-on-write attribute bag.
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    inner: Arc<IndexMap<String, AttributeValue>>,
}

impl Attributes {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        Arc::make_mut(&mut self.inner).insert(key.into(), value.into());
    }

    /// Returns the raw value under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&AttributeValue> {
        self.inner.get(key)
    }

    /// Returns true if `key` is set.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns the text stored under `key`.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the list stored under `key`.
    #[must_use]
    pub fn list(&self, key: &str) -> Option<&[String]> {
        match self.get(key)? {
            AttributeValue::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the path arguments stored under `key`.
    #[must_use]
    pub fn params(&self, key: &str) -> Option<&PathArgs> {
        match self.get(key)? {
            AttributeValue::Params(args) => Some(args),
            _ => None,
        }
    }

    /// Returns the routing marker stored under `key`.
    #[must_use]
    pub fn routing_error(&self, key: &str) -> Option<RoutingError> {
        match self.get(key)? {
            AttributeValue::Routing(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Returns the fault stored under `key`.
    #[must_use]
    pub fn exception(&self, key: &str) -> Option<&anyhow::Error> {
        match self.get(key)? {
            AttributeValue::Exception(err) => Some(err),
            _ => None,
        }
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttributeValue)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the bag is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Attribute access on [`Request`].
pub trait RequestExt: Sized {
    /// Returns a snapshot of the request attributes.
    fn attributes(&self) -> Attributes;

    /// Returns the value under `key` without copying the bag.
    fn attribute(&self, key: &str) -> Option<&AttributeValue>;

    /// Sets `key` in place.
    fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>);

    /// Returns the request with `key` set.
    fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Copies the request, body and extensions included.
    fn duplicate(&self) -> Self;
}

impl RequestExt for Request {
    fn attributes(&self) -> Attributes {
        self.extensions()
            .get::<Attributes>()
            .cloned()
            .unwrap_or_default()
    }

    fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.extensions().get::<Attributes>()?.get(key)
    }

    fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<AttributeValue>) {
        let extensions = self.extensions_mut();
        if let Some(attributes) = extensions.get_mut::<Attributes>() {
            attributes.insert(key, value);
        } else {
            let mut attributes = Attributes::new();
            attributes.insert(key, value);
            extensions.insert(attributes);
        }
    }

    fn duplicate(&self) -> Self {
        let mut copy = http::Request::new(self.body().clone());
        *copy.method_mut() = self.method().clone();
        *copy.uri_mut() = self.uri().clone();
        *copy.version_mut() = self.version();
        *copy.headers_mut() = self.headers().clone();
        *copy.extensions_mut() = self.extensions().clone();
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use bytes::Bytes;
    use http_body_util::Full;

    fn request() -> Request {
        http::Request::builder()
            .uri("/hello/tron")
            .header("x-trace", "1")
            .body(Full::new(Bytes::from_static(b"payload")))
            .unwrap()
    }

    #[test]
    fn test_missing_attributes_are_empty() {
        let request = request();
        assert!(request.attributes().is_empty());
        assert!(request.attribute(keys::HANDLER).is_none());
    }

    #[test]
    fn test_with_attribute_round_trip() {
        let request = request()
            .with_attribute(keys::HANDLER, "hello_handler")
            .with_attribute(keys::ALLOWED_METHODS, vec!["GET".to_string()]);

        let attributes = request.attributes();
        assert_eq!(attributes.text(keys::HANDLER), Some("hello_handler"));
        assert_eq!(attributes.list(keys::ALLOWED_METHODS), Some(&["GET".to_string()][..]));
        assert_eq!(attributes.text(keys::ALLOWED_METHODS), None);
    }

    #[test]
    fn test_copies_do_not_observe_later_writes() {
        let original = request().with_attribute("a", "1");
        let mut copy = original.duplicate();
        copy.set_attribute("b", "2");

        assert!(!original.attributes().contains("b"));
        assert_eq!(copy.attributes().len(), 2);
    }

    #[test]
    fn test_duplicate_keeps_request_parts() {
        let original = request().with_attribute(keys::HANDLER, "x");
        let copy = original.duplicate();

        assert_eq!(copy.uri(), original.uri());
        assert_eq!(copy.headers().get("x-trace").unwrap(), "1");
        assert_eq!(copy.attributes().text(keys::HANDLER), Some("x"));
    }

    #[test]
    fn test_exception_attribute() {
        let request = request().with_attribute(keys::EXCEPTION, anyhow::anyhow!("boom"));
        let attributes = request.attributes();
        assert_eq!(attributes.exception(keys::EXCEPTION).unwrap().to_string(), "boom");
    }

    #[test]
    fn test_routing_error_names() {
        assert_eq!(RoutingError::NotFound.to_string(), "not_found");
        assert_eq!(RoutingError::MethodNotAllowed.as_str(), "method_not_allowed");
    }
}
