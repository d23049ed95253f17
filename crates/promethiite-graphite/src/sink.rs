//! The sink interface the conversion pipeline writes to.

use crate::message::Metric;
use crate::Error;

/// Destination for converted metrics.
///
/// [`GraphiteClient`](crate::GraphiteClient) is the network implementation;
/// tests substitute in-memory recorders.
#[allow(async_fn_in_trait)]
pub trait MetricSink {
    /// Submit one metric. Implementations may buffer.
    async fn send(&mut self, metric: Metric) -> Result<(), Error>;

    /// Push out anything still buffered.
    async fn flush(&mut self) -> Result<(), Error>;
}

impl<S: MetricSink> MetricSink for &mut S {
    async fn send(&mut self, metric: Metric) -> Result<(), Error> {
        (**self).send(metric).await
    }

    async fn flush(&mut self) -> Result<(), Error> {
        (**self).flush().await
    }
}
