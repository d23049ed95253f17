//! Errors that end a conversion run.

use std::path::PathBuf;

use promethiite_exposition::ParseError;
use thiserror::Error;

/// Conversion errors. Every variant is fatal to the run.
#[derive(Debug, Error)]
pub enum Error {
    /// The input file is missing or unreadable.
    #[error("failed to read {}: {source}", .path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading standard input failed.
    #[error("failed to read standard input: {0}")]
    Stdin(#[source] std::io::Error),

    /// The exposition text is malformed. `context` shows the offending line.
    #[error("{context}")]
    Parse {
        #[source]
        error: ParseError,
        context: String,
    },

    /// The sink rejected a metric or failed to send.
    #[error("graphite error: {0}")]
    Sink(#[from] promethiite_graphite::Error),
}

impl Error {
    /// Wrap a parse error with a rendering of the offending line.
    pub fn parse(error: ParseError, source: &str) -> Self {
        let context = error.format_with_source(source);
        Error::Parse { error, context }
    }
}
