//! Radix tree route table for Jelly.
//!
//! Routes bind an HTTP method and a path pattern to a handler *service id*.
//! The table never stores handlers themselves; the kernel resolves the id
//! through a service locator after matching.
//!
//! # Features
//!
//! - **Radix Tree Matching**: lookup cost follows path depth, not route count
//! - **Placeholders**: `{name}` captures one segment, `*name` captures the rest
//! - **Method Awareness**: reports allowed methods when only the verb is wrong
//! - **Extension Methods**: verbs such as `UPDATE` route like any other
//!
//! # Example
//!
//! ```rust
//! use jelly_router::{MatchResult, RouteTable};
//! use http::Method;
//!
//! let mut table = RouteTable::new();
//! table.add_route(Method::GET, "/hello/{name}", "hello_handler").unwrap();
//! table.add_route(Method::POST, "/hello/{name}", "greet_handler").unwrap();
//!
//! assert_eq!(
//!     table.match_route(&Method::DELETE, "/hello/tron"),
//!     MatchResult::MethodNotAllowed { allowed: vec![Method::GET, Method::POST] },
//! );
//! assert_eq!(table.match_route(&Method::GET, "/bye"), MatchResult::NotFound);
//! ```
//!
//! # Architecture
//!
//! ```text
//!                    (root)
//!                      │
//!              ┌───────┴───────┐
//!              │               │
//!            "hello"        "files"
//!              │               │
//!           "{name}"        "*path"
//!              │               │
//!        [GET, POST]         [GET]
//! ```
//!
//! Static children win over placeholders, which win over catch-alls. A
//! branch that matches the path but not the method is abandoned in favour of
//! a lower-priority branch that serves the method.
//!
//! # Segments
//!
//! Empty segments are ignored in both patterns and request paths, so
//! `/hello/tron/` and `/hello//tron` both match `/hello/{name}`. Trailing
//! slashes are therefore not significant.
//!
//! Placeholders carry a name only. Inline constraints such as `{id:\d+}`
//! are rejected with [`RouteError::InvalidPattern`]; validate captured
//! values in the handler instead.

mod args;
mod methods;
mod node;
mod table;

pub use args::PathArgs;
pub use methods::MethodTable;
pub use table::{Route, RouteTable};

use http::Method;
use thiserror::Error;

/// Outcome of matching a method and path against a [`RouteTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult<'a> {
    /// A route serves this method and path.
    Found {
        /// Service id of the matched handler
        handler_id: &'a str,
        /// Values captured by placeholders
        args: PathArgs,
    },
    /// No route pattern matches the path.
    NotFound,
    /// The path matches but the method is not bound.
    MethodNotAllowed {
        /// Methods bound for the path, in registration order
        allowed: Vec<Method>,
    },
}

impl MatchResult<'_> {
    /// Returns true for [`MatchResult::Found`].
    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// Errors raised while registering a route.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The pattern is syntactically invalid.
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// Offending pattern
        pattern: String,
        /// What is wrong with it
        reason: String,
    },

    /// A placeholder reuses a tree position under a different name.
    #[error("route pattern '{pattern}' names placeholder '{given}' where '{existing}' is already registered")]
    ConflictingPlaceholder {
        /// Offending pattern
        pattern: String,
        /// Segment already in the tree
        existing: String,
        /// Placeholder name in the new pattern
        given: String,
    },

    /// The method is already bound for this pattern.
    #[error("route {method} {pattern} is already registered")]
    DuplicateRoute {
        /// Method bound twice
        method: Method,
        /// Pattern bound twice
        pattern: String,
    },
}
