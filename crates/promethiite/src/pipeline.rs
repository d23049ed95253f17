//! Parse, transform, send.
//!
//! The whole document is parsed and every sample converted before the first
//! send, so malformed input never produces partial output. Conversion itself
//! cannot fail: every parsed sample becomes exactly one metric.

use promethiite_exposition::parse;
use promethiite_graphite::{Metric, MetricSink};
use tracing::{debug, info};

use crate::error::Error;
use crate::transform::to_graphite;

/// Counts from one conversion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    /// Metric families parsed.
    pub families: usize,
    /// Metrics handed to the sink; equals the number of samples.
    pub metrics: usize,
}

/// Parse the text and convert every sample, in document order.
pub fn convert(text: &str) -> Result<(usize, Vec<Metric>), Error> {
    let families = parse(text).map_err(|e| Error::parse(e, text))?;

    let mut metrics = Vec::with_capacity(families.iter().map(|f| f.sample_count()).sum());
    for family in &families {
        debug!(
            family = %family.name,
            metric_type = %family.metric_type,
            samples = family.sample_count(),
            "converting family"
        );
        metrics.extend(family.samples.iter().map(to_graphite));
    }

    Ok((families.len(), metrics))
}

/// Convert `text` and hand every metric to `sink`, then flush it.
pub async fn run<S: MetricSink>(text: &str, sink: &mut S) -> Result<Summary, Error> {
    let (families, metrics) = convert(text)?;
    info!(families, samples = metrics.len(), "parsed exposition");

    let count = metrics.len();
    for metric in metrics {
        sink.send(metric).await?;
    }
    sink.flush().await?;

    Ok(Summary {
        families,
        metrics: count,
    })
}
