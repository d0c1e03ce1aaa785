//! Error types for the API server host.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Primary error type for serving the HTTP front door.
#[derive(Debug, Error)]
pub enum ApiServerError {
    /// Listener could not be bound.
    #[error("failed to bind API listener")]
    Bind {
        /// Address the bind was attempted on.
        addr: SocketAddr,
        /// Source IO error.
        source: io::Error,
    },
    /// Server terminated unexpectedly.
    #[error("api server terminated unexpectedly")]
    Serve {
        /// Source IO error.
        source: io::Error,
    },
}
