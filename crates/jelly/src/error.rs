//! Dispatch errors.

use jelly_core::SetupError;
use thiserror::Error;

/// Why a request produced no response.
///
/// Routing misses are not errors: they are answered by the not-found and
/// bad-method handlers.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The application is wired wrong. Not recoverable per request.
    #[error("setup error: {0}")]
    Setup(#[from] SetupError),

    /// A handler or middleware failed and nothing in the chain trapped it.
    #[error(transparent)]
    Unhandled(anyhow::Error),
}

impl DispatchError {
    /// Returns true for [`DispatchError::Setup`].
    #[must_use]
    pub const fn is_setup(&self) -> bool {
        matches!(self, Self::Setup(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = DispatchError::from(SetupError::missing("hello_handler"));
        assert!(err.is_setup());
        assert_eq!(
            err.to_string(),
            "setup error: service 'hello_handler' is not registered"
        );

        let err = DispatchError::Unhandled(anyhow::anyhow!("disk on fire"));
        assert!(!err.is_setup());
        assert_eq!(err.to_string(), "disk on fire");
    }
}
