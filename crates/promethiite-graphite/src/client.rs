//! Buffered Graphite client.

use tracing::{debug, error, info};

use crate::config::SinkConfig;
use crate::connection::Connection;
use crate::error::Error;
use crate::message::{encode_line, unix_now, Metric};
use crate::sink::MetricSink;

/// A Graphite client that buffers encoded lines and writes them in batches.
///
/// The connection is opened on the first flush and reused for the rest of
/// the client's life. A failed write drops the connection and the batch.
///
/// # Example
///
/// ```ignore
/// use promethiite_graphite::{GraphiteClient, Metric, MetricSink, SinkConfig};
///
/// let mut client = GraphiteClient::new(SinkConfig::new("graphite").with_prefix("app"));
/// client.send(Metric::new("up", 1.0)).await?;
/// client.close().await?;
/// ```
pub struct GraphiteClient {
    config: SinkConfig,
    connection: Option<Connection>,
    pending: Vec<String>,
    sent: usize,
    dropped: usize,
}

impl GraphiteClient {
    /// Create a client bound to the configured server, transport and prefix.
    pub fn new(config: SinkConfig) -> Self {
        let pending = Vec::with_capacity(config.batch_size.min(4096));
        Self {
            config,
            connection: None,
            pending,
            sent: 0,
            dropped: 0,
        }
    }

    /// The client configuration.
    pub fn config(&self) -> &SinkConfig {
        &self.config
    }

    /// Lines waiting for the next flush.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Lines successfully written so far.
    pub fn sent(&self) -> usize {
        self.sent
    }

    /// Lines discarded because their batch failed to send.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Whether a connection is currently open.
    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Flush remaining lines and close the connection.
    pub async fn close(mut self) -> Result<(), Error> {
        self.flush().await?;
        if let Some(connection) = self.connection.take() {
            if let Err(e) = connection.shutdown().await {
                debug!(error = %e, "error while closing graphite connection");
            }
        }
        info!(
            sent = self.sent,
            dropped = self.dropped,
            "graphite client closed"
        );
        Ok(())
    }

    async fn write_pending(&mut self, lines: &[String]) -> Result<usize, Error> {
        if self.connection.is_none() {
            let connection = Connection::establish(&self.config).await?;
            info!(
                address = %self.config.address(),
                transport = %self.config.transport,
                "connected to graphite"
            );
            self.connection = Some(connection);
        }

        let result = match self.connection.as_mut() {
            Some(connection) => connection.write_lines(lines, &self.config).await,
            None => Err(Error::Connection("not connected".to_string())),
        };
        if result.is_err() {
            self.connection = None;
        }
        result
    }
}

impl MetricSink for GraphiteClient {
    async fn send(&mut self, metric: Metric) -> Result<(), Error> {
        let line = encode_line(&self.config.prefix, &metric, unix_now())?;
        debug!(line = line.trim_end(), "queued metric");
        self.pending.push(line);

        if self.pending.len() >= self.config.batch_size {
            self.flush().await?;
        }
        Ok(())
    }

    async fn flush(&mut self) -> Result<(), Error> {
        if self.pending.is_empty() {
            return Ok(());
        }

        let lines = std::mem::take(&mut self.pending);
        match self.write_pending(&lines).await {
            Ok(bytes) => {
                self.sent += lines.len();
                debug!(lines = lines.len(), bytes, "flushed metrics");
                Ok(())
            }
            Err(e) => {
                self.dropped += lines.len();
                if self.config.raise_send_errors {
                    return Err(e);
                }
                error!(
                    error = %e,
                    address = %self.config.address(),
                    dropped = lines.len(),
                    "failed to send metrics"
                );
                Ok(())
            }
        }
    }
}
