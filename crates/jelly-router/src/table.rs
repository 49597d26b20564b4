//! Route table: registration and method-aware lookup.

use crate::args::PathArgs;
use crate::node::Node;
use crate::{MatchResult, RouteError};
use http::Method;

/// A registered `(method, pattern, handler id)` triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// HTTP method, standard or extension.
    pub method: Method,
    /// Path pattern as registered, e.g. `/hello/{name}`.
    pub pattern: String,
    /// Service id of the handler bound to this route.
    pub handler_id: String,
}

/// Accumulates routes and answers which handler id serves a method and path.
///
/// Routes are compiled into a radix tree at registration time, so matching
/// never fails: every lookup produces a [`MatchResult`].
///
/// # Example
///
/// ```rust
/// use jelly_router::{MatchResult, RouteTable};
/// use http::Method;
///
/// let mut table = RouteTable::new();
/// table.add_route(Method::GET, "/hello/{name}", "hello_handler").unwrap();
///
/// match table.match_route(&Method::GET, "/hello/tron") {
///     MatchResult::Found { handler_id, args } => {
///         assert_eq!(handler_id, "hello_handler");
///         assert_eq!(args.get("name"), Some("tron"));
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RouteTable {
    root: Node,
    routes: Vec<Route>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            routes: Vec::new(),
        }
    }

    /// Registers `handler_id` for `method` requests matching `pattern`.
    ///
    /// Patterns start with `/` and may contain `{name}` placeholders spanning
    /// a whole segment and a trailing `*name` catch-all.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] when the pattern is malformed, when it reuses a
    /// placeholder position under a different name, or when the method is
    /// already bound for the same pattern.
    pub fn add_route(
        &mut self,
        method: Method,
        pattern: &str,
        handler_id: impl Into<String>,
    ) -> Result<(), RouteError> {
        let handler_id = handler_id.into();
        let segments = Node::parse_pattern(pattern)?;
        let seq = self.routes.len();
        self.root
            .insert(pattern, &segments, method.clone(), handler_id.clone(), seq)?;
        self.routes.push(Route {
            method,
            pattern: pattern.to_string(),
            handler_id,
        });
        Ok(())
    }

    /// Matches a request method and path.
    ///
    /// `HEAD` falls back to the `GET` binding when no explicit `HEAD` route
    /// exists. When the path matches but the method does not, the allowed
    /// methods are gathered from every route whose pattern matches the path,
    /// deduplicated and in registration order.
    pub fn match_route(&self, method: &Method, path: &str) -> MatchResult<'_> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if let Some(found) = self.find(&segments, method) {
            return found;
        }
        if method == Method::HEAD {
            if let Some(found) = self.find(&segments, &Method::GET) {
                return found;
            }
        }

        let mut tables = Vec::new();
        self.root.collect(&segments, &mut tables);
        let mut bound: Vec<(usize, &Method)> = tables.iter().flat_map(|t| t.bindings()).collect();
        if bound.is_empty() {
            return MatchResult::NotFound;
        }
        bound.sort_unstable_by_key(|(seq, _)| *seq);

        let mut allowed: Vec<Method> = Vec::with_capacity(bound.len());
        for (_, method) in bound {
            if !allowed.contains(method) {
                allowed.push(method.clone());
            }
        }
        MatchResult::MethodNotAllowed { allowed }
    }

    fn find(&self, segments: &[&str], method: &Method) -> Option<MatchResult<'_>> {
        let mut args = PathArgs::new();
        let table = self
            .root
            .find(segments, &mut args, &|t| t.contains(method))?;
        let handler_id = table.handler(method)?;
        Some(MatchResult::Found { handler_id, args })
    }

    /// Returns the registered routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if no route has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RouteTable {
        let mut table = RouteTable::new();
        table.add_route(Method::GET, "/hello/{name}", "hello").unwrap();
        table.add_route(Method::POST, "/hello/{name}", "greet").unwrap();
        table.add_route(Method::GET, "/", "index").unwrap();
        table
    }

    #[test]
    fn test_root_path() {
        let table = table();
        assert!(matches!(
            table.match_route(&Method::GET, "/"),
            MatchResult::Found { handler_id: "index", .. }
        ));
    }

    #[test]
    fn test_head_falls_back_to_get() {
        let table = table();
        match table.match_route(&Method::HEAD, "/hello/tron") {
            MatchResult::Found { handler_id, args } => {
                assert_eq!(handler_id, "hello");
                assert_eq!(args.get("name"), Some("tron"));
            }
            other => panic!("expected found, got {other:?}"),
        }
    }

    #[test]
    fn test_allowed_methods_in_registration_order() {
        let table = table();
        assert_eq!(
            table.match_route(&Method::DELETE, "/hello/tron"),
            MatchResult::MethodNotAllowed {
                allowed: vec![Method::GET, Method::POST]
            }
        );
    }

    #[test]
    fn test_method_falls_through_to_lower_priority_branch() {
        let mut table = RouteTable::new();
        table.add_route(Method::GET, "/users/me", "me").unwrap();
        table.add_route(Method::DELETE, "/users/{id}", "delete_user").unwrap();

        match table.match_route(&Method::DELETE, "/users/me") {
            MatchResult::Found { handler_id, args } => {
                assert_eq!(handler_id, "delete_user");
                assert_eq!(args.get("id"), Some("me"));
            }
            other => panic!("expected found, got {other:?}"),
        }
    }

    #[test]
    fn test_allowed_methods_merge_matching_branches() {
        let mut table = RouteTable::new();
        table.add_route(Method::GET, "/users/me", "me").unwrap();
        table.add_route(Method::DELETE, "/users/{id}", "delete_user").unwrap();

        assert_eq!(
            table.match_route(&Method::PUT, "/users/me"),
            MatchResult::MethodNotAllowed {
                allowed: vec![Method::GET, Method::DELETE]
            }
        );
        assert_eq!(
            table.match_route(&Method::PUT, "/users/7"),
            MatchResult::MethodNotAllowed {
                allowed: vec![Method::DELETE]
            }
        );
    }

    #[test]
    fn test_merged_allowed_methods_follow_registration_order() {
        let mut table = RouteTable::new();
        table.add_route(Method::POST, "/docs/*path", "upload").unwrap();
        table.add_route(Method::GET, "/docs/{name}", "show").unwrap();
        table.add_route(Method::GET, "/docs/index", "index").unwrap();
        table.add_route(Method::DELETE, "/docs/index", "purge").unwrap();

        assert_eq!(
            table.match_route(&Method::PATCH, "/docs/index"),
            MatchResult::MethodNotAllowed {
                allowed: vec![Method::POST, Method::GET, Method::DELETE]
            }
        );
    }

    #[test]
    fn test_routes_are_recorded() {
        let table = table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.routes()[1].handler_id, "greet");
        assert_eq!(table.routes()[1].method, Method::POST);
    }

    #[test]
    fn test_failed_registration_is_not_recorded() {
        let mut table = table();
        assert!(table.add_route(Method::GET, "/hello/{who}", "other").is_err());
        assert_eq!(table.len(), 3);
    }
}
