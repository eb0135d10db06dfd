//! Error type carried by a failing middleware.

use thiserror::Error;

/// A boxed error from any source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The error a middleware yields to abandon its chain.
///
/// Returning this from [`Middleware::process`](crate::Middleware::process)
/// stops every remaining layer of the current chain and of every enclosing
/// chain; the error surfaces unchanged to whoever dispatched the outermost
/// chain.
#[derive(Debug, Error)]
pub enum MiddlewareError {
    /// A middleware rejected the request with a message.
    #[error("middleware '{middleware}' failed: {message}")]
    Failed {
        /// Name of the middleware that failed.
        middleware: &'static str,
        /// Human-readable reason.
        message: String,
    },

    /// A middleware failed because of an underlying error.
    #[error("middleware '{middleware}' failed")]
    Source {
        /// Name of the middleware that failed.
        middleware: &'static str,
        /// Underlying error.
        #[source]
        source: BoxError,
    },
}

impl MiddlewareError {
    /// Creates a failure with a message.
    pub fn failed(middleware: &'static str, message: impl Into<String>) -> Self {
        Self::Failed {
            middleware,
            message: message.into(),
        }
    }

    /// Wraps an underlying error.
    pub fn source(middleware: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Source {
            middleware,
            source: source.into(),
        }
    }

    /// Returns the name of the middleware that failed.
    #[must_use]
    pub fn middleware(&self) -> &'static str {
        match self {
            Self::Failed { middleware, .. } | Self::Source { middleware, .. } => middleware,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_display() {
        let err = MiddlewareError::failed("oauth_start", "no host header");
        assert_eq!(err.middleware(), "oauth_start");
        assert!(err.to_string().contains("no host header"));
    }

    #[test]
    fn test_source_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        let err = MiddlewareError::source("static", io);
        assert_eq!(err.middleware(), "static");
        assert!(std::error::Error::source(&err).is_some());
    }
}
