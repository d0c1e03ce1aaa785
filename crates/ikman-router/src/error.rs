//! Error types for router operations.

use thiserror::Error;

/// Primary error type for router transport and rule operations.
#[derive(Debug, Error)]
pub enum RouterError {
    /// Router rejected the login handshake after all attempts.
    #[error("router login failed")]
    Login {
        /// Number of attempts made.
        attempts: u32,
        /// Detail from the last rejected attempt.
        detail: String,
    },
    /// HTTP client operation failed.
    #[error("http operation failed")]
    Http {
        /// Operation identifier.
        operation: &'static str,
        /// URL used for the request.
        url: String,
        /// Source HTTP client error.
        source: reqwest::Error,
    },
    /// HTTP response returned a non-success status.
    #[error("http response status error")]
    HttpStatus {
        /// Operation identifier.
        operation: &'static str,
        /// URL used for the request.
        url: String,
        /// HTTP status code returned by the router.
        status: u16,
    },
}

/// Convenience alias for router results.
pub type RouterResult<T> = Result<T, RouterError>;
