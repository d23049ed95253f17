//! Prometheus text exposition parser.
//!
//! This crate turns a metrics dump in the Prometheus text format into an
//! ordered list of [`MetricFamily`] values.
//!
//! # Format
//!
//! ```text
//! # HELP http_requests_total The total number of HTTP requests.
//! # TYPE http_requests_total counter
//! http_requests_total{method="post",code="200"} 1027 1395066363000
//! http_requests_total{method="post",code="400"} 3 1395066363000
//! metric_without_timestamp_and_labels 12.47
//! ```
//!
//! Parsing is all-or-nothing: the first malformed line fails the whole
//! document with a [`ParseError`] pointing at that line.
//!
//! # Usage
//!
//! ```rust
//! use promethiite_exposition::parse;
//!
//! let families = parse("up{job=\"node\"} 1\n").unwrap();
//! assert_eq!(families[0].samples[0].label("job"), Some("node"));
//! ```

pub mod error;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod span;

pub use error::ParseError;
pub use model::{Labels, MetricFamily, MetricType, Sample};
pub use span::Span;

/// Parse an exposition document into metric families, in document order.
///
/// # Example
///
/// ```rust
/// use promethiite_exposition::{parse, MetricType};
///
/// let families = parse("# TYPE temp gauge\ntemp 21.5\n").unwrap();
/// assert_eq!(families[0].metric_type, MetricType::Gauge);
/// ```
pub fn parse(source: &str) -> Result<Vec<MetricFamily>, ParseError> {
    parser::parse(source)
}

/// Tokenize a single sample line (for debugging/testing).
///
/// # Example
///
/// ```rust
/// use promethiite_exposition::tokenize;
///
/// let tokens = tokenize("up 1");
/// assert_eq!(tokens.len(), 2);
/// ```
pub fn tokenize(line: &str) -> Vec<lexer::SpannedToken> {
    lexer::tokenize(line)
}
