//! Sink configuration.

use std::time::Duration;

/// Default Graphite plaintext port.
pub const DEFAULT_PORT: u16 = 2003;

/// Default connect/write timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of buffered lines that triggers a flush.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Default upper bound for one UDP datagram payload.
pub const DEFAULT_MAX_DATAGRAM_SIZE: usize = 1432;

/// Network transport used to reach the Graphite server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Tcp,
    Udp,
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Tcp => write!(f, "tcp"),
            Transport::Udp => write!(f, "udp"),
        }
    }
}

/// Graphite sink configuration.
#[derive(Debug, Clone)]
pub struct SinkConfig {
    /// Server host name or IP address.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// TCP or UDP.
    pub transport: Transport,

    /// Path segment prepended to every metric name. Empty means none.
    pub prefix: String,

    /// Bound on connecting and on each write.
    pub timeout: Duration,

    /// Buffered lines that trigger a flush.
    pub batch_size: usize,

    /// Largest UDP payload; lines are never split across datagrams.
    pub max_datagram_size: usize,

    /// Return send failures instead of logging them and dropping the batch.
    pub raise_send_errors: bool,
}

impl SinkConfig {
    /// Create a new configuration for the given server host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            transport: Transport::Tcp,
            prefix: String::new(),
            timeout: DEFAULT_TIMEOUT,
            batch_size: DEFAULT_BATCH_SIZE,
            max_datagram_size: DEFAULT_MAX_DATAGRAM_SIZE,
            raise_send_errors: false,
        }
    }

    /// Create a configuration for a server on localhost.
    pub fn localhost() -> Self {
        Self::new("127.0.0.1")
    }

    /// Set the server port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the transport.
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Set the metric prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the connect/write timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the flush threshold.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the largest UDP payload.
    pub fn with_max_datagram_size(mut self, size: usize) -> Self {
        self.max_datagram_size = size.max(1);
        self
    }

    /// Choose whether send failures are returned or logged.
    pub fn with_raise_send_errors(mut self, raise: bool) -> Self {
        self.raise_send_errors = raise;
        self
    }

    /// `host:port`, bracketing bare IPv6 addresses.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self::localhost()
    }
}
