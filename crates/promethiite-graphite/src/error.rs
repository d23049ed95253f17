//! Client error types.

use std::time::Duration;

use thiserror::Error;

/// Graphite client errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The metric cannot be expressed in the plaintext protocol.
    #[error("invalid metric: {0}")]
    InvalidMetric(String),

    /// Connection failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// Writing to an established connection failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Connect or write did not finish in time.
    #[error("timed out after {0:?}")]
    Timeout(Duration),
}
