//! Reserved attribute keys and service ids.
//!
//! These names are part of the public contract between the kernel and user
//! handlers. They never change between releases.

/// Request attribute keys written by the kernel and built-in middleware.
pub mod keys {
    /// Service id of the handler selected for the request. Always set.
    pub const HANDLER: &str = "jelly.attributes.handler";

    /// Path arguments captured by the matched route.
    pub const ARGS: &str = "jelly.attributes.args";

    /// Why routing missed, when it did.
    pub const ERROR_TYPE: &str = "jelly.attributes.error_type";

    /// Methods bound for the path when the request method is not.
    pub const ALLOWED_METHODS: &str = "jelly.attributes.allowed_methods";

    /// Fault caught by an exception trapper.
    pub const EXCEPTION: &str = "jelly.attributes.exception";

    /// Middleware ids wrapping the handler, outermost first.
    pub const MIDDLEWARE_CHAIN: &str = "jelly.attributes.middleware_chain";
}

/// Service ids the kernel looks up by name.
pub mod services {
    /// Handler for requests no route matches. Mandatory.
    pub const NOT_FOUND_HANDLER: &str = "jelly.service.not_found_handler";

    /// Handler for requests whose path matches but method does not. Mandatory.
    pub const BAD_METHOD_HANDLER: &str = "jelly.service.bad_method_handler";

    /// Handler that renders faults caught by an exception trapper.
    pub const EXCEPTION_HANDLER: &str = "jelly.service.exception_handler";

    /// Ids a route may never be mapped to.
    pub const RESERVED: [&str; 3] = [NOT_FOUND_HANDLER, BAD_METHOD_HANDLER, EXCEPTION_HANDLER];

    /// Returns true if `id` is one of the reserved service ids.
    #[must_use]
    pub fn is_reserved(id: &str) -> bool {
        RESERVED.contains(&id)
    }
}
