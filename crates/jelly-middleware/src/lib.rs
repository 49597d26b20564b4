//! # Jelly Middleware
//!
//! Middleware chain resolution and onion composition for the Jelly
//! framework, plus the built-in middleware.
//!
//! ## Chain Lifecycle
//!
//! ```text
//! setup:    push_handler / push_local_middleware / push_global_middleware
//!                               │
//! request:  resolve(handler_id) ─┴─► [inner .. outer] ids
//!                                        │ look up + reverse
//!           ExecutionStack::compose(handler, [outer .. inner])
//!                                        │
//!           outer ─► … ─► inner ─► handler ─► inner ─► … ─► outer
//! ```
//!
//! The resolver knows ids only, so it can be exercised without a service
//! locator. The stack knows instances only.
//!
//! ## Example
//!
//! ```
//! use jelly_middleware::MiddlewareChainResolver;
//!
//! let mut resolver = MiddlewareChainResolver::new();
//! resolver.push_handler("admin", ["protected"]);
//! resolver.push_local_middleware("basic-auth", "protected");
//! resolver.push_global_middleware("security-headers");
//!
//! assert_eq!(resolver.resolve("admin"), vec!["basic-auth", "security-headers"]);
//! ```

#![doc(html_root_url = "https://docs.rs/jelly-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod resolver;
pub mod stack;
pub mod stages;

pub use resolver::MiddlewareChainResolver;
pub use stack::ExecutionStack;
pub use stages::{ExceptionTrapper, SecurityHeaders, ServerCloak, UncaughtExceptionSafeguard};
