//! Graphite client for promethiite.
//!
//! Metrics are encoded in the plaintext protocol with tagged series
//! (`path;tag=value value timestamp`), buffered, and written to a Graphite
//! server over TCP or UDP.
//!
//! # Quick Start
//!
//! ```ignore
//! use promethiite_graphite::{GraphiteClient, Metric, MetricSink, SinkConfig, Transport};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SinkConfig::new("graphite.internal")
//!         .with_transport(Transport::Udp)
//!         .with_prefix("app");
//!     let mut client = GraphiteClient::new(config);
//!
//!     client.send(Metric::new("requests", 42.0).with_tag("method", "GET")).await?;
//!
//!     // Flush and close the connection
//!     client.close().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod connection;
pub mod error;
pub mod message;
pub mod sink;

pub use client::GraphiteClient;
pub use config::{SinkConfig, Transport};
pub use error::Error;
pub use message::{encode_line, is_reserved, metric_path, validate, Metric, Tags};
pub use sink::MetricSink;
