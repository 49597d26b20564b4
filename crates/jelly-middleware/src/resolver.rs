//! Middleware chain resolution.
//!
//! Handlers join *groups*; middleware is attached to groups or applied
//! globally. Resolving a handler flattens its groups' middleware, in the
//! order the groups were joined, followed by the global middleware.
//!
//! Every handler is implicitly a member of a group named after its own id,
//! so middleware can target a single handler without declaring a group.
//!
//! # Example
//!
//! ```rust
//! use jelly_middleware::MiddlewareChainResolver;
//!
//! let mut resolver = MiddlewareChainResolver::new();
//! resolver.push_handler("dashboard", ["monitored"]);
//! resolver.push_local_middleware("basic-auth", "dashboard");
//! resolver.push_local_middleware("ip-logger", "monitored");
//! resolver.push_global_middleware("security-headers");
//!
//! assert_eq!(
//!     resolver.resolve("dashboard"),
//!     vec!["basic-auth", "ip-logger", "security-headers"],
//! );
//! assert_eq!(resolver.resolve("index"), vec!["security-headers"]);
//! ```

use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;

/// Maps handler ids to the ordered middleware ids that wrap them.
///
/// The list returned by [`resolve`](Self::resolve) runs from the innermost
/// middleware to the outermost: a handler's own groups sit closest to it and
/// the first global middleware wraps them all.
///
/// Nothing here checks that an id names a real service; callers with access
/// to a service locator do that.
#[derive(Debug, Clone, Default)]
pub struct MiddlewareChainResolver {
    handlers: IndexMap<String, IndexSet<String>>,
    groups: HashMap<String, Vec<String>>,
    globals: Vec<String>,
}

impl MiddlewareChainResolver {
    /// Creates an empty resolver.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler and its group memberships.
    ///
    /// Repeated calls merge new groups after the existing ones. Repeated
    /// group ids are ignored.
    pub fn push_handler<I, S>(&mut self, handler_id: &str, groups: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let memberships = self
            .handlers
            .entry(handler_id.to_string())
            .or_insert_with(|| IndexSet::from([handler_id.to_string()]));
        memberships.extend(groups.into_iter().map(Into::into));
    }

    /// Appends `middleware_id` to the middleware of `group_id`.
    ///
    /// The same middleware attached twice runs twice.
    pub fn push_local_middleware(&mut self, middleware_id: impl Into<String>, group_id: impl Into<String>) {
        self.groups
            .entry(group_id.into())
            .or_default()
            .push(middleware_id.into());
    }

    /// Appends `middleware_id` to the middleware applied to every handler.
    pub fn push_global_middleware(&mut self, middleware_id: impl Into<String>) {
        self.globals.push(middleware_id.into());
    }

    /// Returns the middleware ids wrapping `handler_id`, innermost first.
    ///
    /// A handler that was never pushed gets the global middleware only.
    #[must_use]
    pub fn resolve(&self, handler_id: &str) -> Vec<String> {
        let mut chain = Vec::new();
        if let Some(memberships) = self.handlers.get(handler_id) {
            for group in memberships {
                if let Some(middleware) = self.groups.get(group) {
                    chain.extend(middleware.iter().cloned());
                }
            }
        }
        chain.extend(self.globals.iter().cloned());
        chain
    }

    /// Returns true if `handler_id` was pushed.
    #[must_use]
    pub fn contains_handler(&self, handler_id: &str) -> bool {
        self.handlers.contains_key(handler_id)
    }

    /// Returns the global middleware ids in push order.
    #[must_use]
    pub fn global_middleware(&self) -> &[String] {
        &self.globals
    }
}
