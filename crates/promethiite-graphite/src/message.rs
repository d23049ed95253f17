//! Graphite plaintext protocol encoding.
//!
//! One metric is one line: `path[;tag=value...] value timestamp\n`, with the
//! tags sorted by name and the timestamp in whole seconds.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::Error;

/// Tag name to tag value.
pub type Tags = BTreeMap<String, String>;

/// A metric ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    /// Metric name without the sink prefix.
    pub name: String,
    pub value: f64,
    pub tags: Tags,
    /// Seconds since the Unix epoch. `None` means "when sent".
    pub timestamp: Option<i64>,
}

impl Metric {
    /// Create an untagged metric stamped at send time.
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            tags: Tags::new(),
            timestamp: None,
        }
    }

    /// Add a tag.
    pub fn with_tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(name.into(), value.into());
        self
    }

    /// Replace all tags.
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    /// Set an explicit timestamp in seconds.
    pub fn with_timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Current Unix time in whole seconds.
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64().round() as i64)
        .unwrap_or(0)
}

/// Characters carbon does not accept inside a tag.
pub fn is_reserved(c: char) -> bool {
    c.is_whitespace() || c == ';' || c == '~'
}

/// Check that a metric survives the line protocol intact.
pub fn validate(metric: &Metric) -> Result<(), Error> {
    if metric.name.is_empty() || metric.name.contains(char::is_whitespace) {
        return Err(Error::InvalidMetric(format!(
            "metric name {:?} must be non-empty and free of whitespace",
            metric.name
        )));
    }
    for (name, value) in &metric.tags {
        if name.is_empty() || name.contains(|c: char| is_reserved(c) || c == '=') {
            return Err(Error::InvalidMetric(format!(
                "tag name {:?} on {} must be non-empty and free of whitespace, ';', '~' and '='",
                name, metric.name
            )));
        }
        if value.is_empty() || value.contains(is_reserved) {
            return Err(Error::InvalidMetric(format!(
                "tag {}={:?} on {} must be non-empty and free of whitespace, ';' and '~'",
                name, value, metric.name
            )));
        }
    }
    Ok(())
}

/// Outbound path: `prefix.name`, or `name` when the prefix is empty.
pub fn metric_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// Encode one metric as a newline-terminated plaintext line.
///
/// `now` stamps metrics that carry no timestamp of their own.
pub fn encode_line(prefix: &str, metric: &Metric, now: i64) -> Result<String, Error> {
    validate(metric)?;
    if prefix.contains(char::is_whitespace) {
        return Err(Error::InvalidMetric(format!(
            "prefix {:?} must be free of whitespace",
            prefix
        )));
    }

    let mut line = metric_path(prefix, &metric.name);
    for (name, value) in &metric.tags {
        line.push(';');
        line.push_str(name);
        line.push('=');
        line.push_str(value);
    }
    line.push_str(&format!(
        " {:?} {}\n",
        metric.value,
        metric.timestamp.unwrap_or(now)
    ));
    Ok(line)
}

/// Pack lines into payloads of at most `max_size` bytes.
///
/// Lines are never split; a single line longer than `max_size` gets a
/// payload of its own.
pub fn pack_datagrams<S: AsRef<str>>(lines: &[S], max_size: usize) -> Vec<Vec<u8>> {
    let mut datagrams = Vec::new();
    let mut current: Vec<u8> = Vec::new();

    for line in lines {
        let bytes = line.as_ref().as_bytes();
        if !current.is_empty() && current.len() + bytes.len() > max_size {
            datagrams.push(std::mem::take(&mut current));
        }
        current.extend_from_slice(bytes);
    }
    if !current.is_empty() {
        datagrams.push(current);
    }

    datagrams
}
