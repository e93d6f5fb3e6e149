//! Common error types used throughout kourai.
//!
//! Catalog lookups and link operations fail in a handful of ways callers
//! treat differently: an empty result, a rate-limit rejection, a transport
//! failure, an unexpected response body, or a local I/O error.

/// Common error type for kourai.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The catalog returned no results for a query.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The catalog rejected the request with "too many requests".
    #[error("Rate limited by catalog")]
    RateLimited,

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The catalog answered with an unexpected HTTP status.
    #[error("Unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Transport error.
    pub fn transport<S: Into<String>>(msg: S) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a new Malformed error.
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::Malformed(msg.into())
    }

    /// Create a new Status error.
    pub fn status<S: Into<String>>(status: u16, body: S) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the catalog simply had no match.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the same request might succeed if sent again later.
    ///
    /// Nothing in kourai retries; this only grades log output.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited | Self::Transport(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::not_found("Foobar");
        assert_eq!(err.to_string(), "Not found: Foobar");

        let err = Error::RateLimited;
        assert_eq!(err.to_string(), "Rate limited by catalog");

        let err = Error::status(503, "busy");
        assert_eq!(err.to_string(), "Unexpected status 503: busy");

        let err = Error::malformed("expected value at line 1");
        assert_eq!(err.to_string(), "Malformed response: expected value at line 1");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_transient() {
        assert!(Error::RateLimited.is_transient());
        assert!(Error::transport("reset").is_transient());
        assert!(Error::status(502, "").is_transient());
        assert!(!Error::status(401, "").is_transient());
        assert!(!Error::not_found("x").is_transient());
        assert!(!Error::malformed("x").is_transient());
    }

    #[test]
    fn test_error_constructors() {
        assert!(Error::not_found("x").is_not_found());
        assert!(matches!(Error::invalid_input("x"), Error::InvalidInput(_)));
        assert!(matches!(Error::internal("x"), Error::Internal(_)));
        assert!(matches!(Error::transport("x"), Error::Transport(_)));
    }
}
