//! Built-in middleware.
//!
//! | Middleware | Purpose |
//! |------------|---------|
//! | [`ExceptionTrapper`] | Re-dispatches faults to the exception handler |
//! | [`UncaughtExceptionSafeguard`] | Logs faults and answers `500` |
//! | [`SecurityHeaders`] | Adds hardening response headers |
//! | [`ServerCloak`] | Hides the server implementation |

pub mod exception_trapper;
pub mod safeguard;
pub mod security_headers;
pub mod server_cloak;

pub use exception_trapper::ExceptionTrapper;
pub use safeguard::UncaughtExceptionSafeguard;
pub use security_headers::SecurityHeaders;
pub use server_cloak::ServerCloak;
