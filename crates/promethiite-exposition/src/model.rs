//! Metric families and samples produced by the parser.

use std::collections::BTreeMap;

use crate::span::Span;

/// Label name to label value.
pub type Labels = BTreeMap<String, String>;

/// The type declared for a family by its `# TYPE` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetricType {
    Counter,
    Gauge,
    Histogram,
    Summary,
    #[default]
    Untyped,
}

impl MetricType {
    /// Parse the type keyword of a `# TYPE` line.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "counter" => Some(MetricType::Counter),
            "gauge" => Some(MetricType::Gauge),
            "histogram" => Some(MetricType::Histogram),
            "summary" => Some(MetricType::Summary),
            "untyped" => Some(MetricType::Untyped),
            _ => None,
        }
    }

    /// Suffixes a sample name may carry and still belong to a family of this type.
    pub(crate) fn sample_suffixes(self) -> &'static [&'static str] {
        match self {
            MetricType::Counter | MetricType::Gauge | MetricType::Untyped => &[""],
            MetricType::Summary => &["", "_sum", "_count"],
            MetricType::Histogram => &["_bucket", "_sum", "_count"],
        }
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricType::Counter => write!(f, "counter"),
            MetricType::Gauge => write!(f, "gauge"),
            MetricType::Histogram => write!(f, "histogram"),
            MetricType::Summary => write!(f, "summary"),
            MetricType::Untyped => write!(f, "untyped"),
        }
    }
}

/// One observation: `name{labels} value [timestamp]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub name: String,
    pub labels: Labels,
    pub value: f64,
    /// Milliseconds since the Unix epoch, when the line carries one.
    pub timestamp_ms: Option<i64>,
    /// Location of the sample line in the document.
    pub span: Span,
}

impl Sample {
    /// Look up a label value by name.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.labels.get(name).map(String::as_str)
    }
}

/// A named group of samples sharing one `# TYPE`/`# HELP` declaration.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetricFamily {
    pub name: String,
    pub help: Option<String>,
    pub metric_type: MetricType,
    pub samples: Vec<Sample>,
}

impl MetricFamily {
    /// Create an empty untyped family.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Whether a sample with this name belongs to the family.
    pub fn accepts(&self, sample_name: &str) -> bool {
        self.metric_type
            .sample_suffixes()
            .iter()
            .any(|suffix| {
                sample_name.len() == self.name.len() + suffix.len()
                    && sample_name.starts_with(self.name.as_str())
                    && sample_name.ends_with(suffix)
            })
    }

    /// Number of samples in the family.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(name: &str, metric_type: MetricType) -> MetricFamily {
        MetricFamily {
            metric_type,
            ..MetricFamily::new(name)
        }
    }

    #[test]
    fn test_type_keywords() {
        assert_eq!(MetricType::from_keyword("counter"), Some(MetricType::Counter));
        assert_eq!(MetricType::from_keyword("untyped"), Some(MetricType::Untyped));
        assert_eq!(MetricType::from_keyword("Counter"), None);
        assert_eq!(MetricType::from_keyword("info"), None);
        assert_eq!(MetricType::Histogram.to_string(), "histogram");
    }

    #[test]
    fn test_histogram_accepts_suffixed_names_only() {
        let hist = family("rpc_seconds", MetricType::Histogram);
        assert!(hist.accepts("rpc_seconds_bucket"));
        assert!(hist.accepts("rpc_seconds_sum"));
        assert!(hist.accepts("rpc_seconds_count"));
        assert!(!hist.accepts("rpc_seconds"));
        assert!(!hist.accepts("rpc_seconds_total"));
    }

    #[test]
    fn test_summary_accepts_bare_name() {
        let summary = family("rpc_duration_seconds", MetricType::Summary);
        assert!(summary.accepts("rpc_duration_seconds"));
        assert!(summary.accepts("rpc_duration_seconds_count"));
        assert!(!summary.accepts("rpc_duration_seconds_bucket"));
    }

    #[test]
    fn test_counter_accepts_exact_name() {
        let counter = family("http_requests_total", MetricType::Counter);
        assert!(counter.accepts("http_requests_total"));
        assert!(!counter.accepts("http_requests"));
        assert!(!counter.accepts("http_requests_total_sum"));
    }
}
