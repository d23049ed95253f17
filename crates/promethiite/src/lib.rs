//! promethiite: forward Prometheus metrics to Graphite.
//!
//! Reads a Prometheus text exposition dump from a file or standard input,
//! turns every sample into a tagged Graphite metric named
//! `<prefix>.<sample name>`, and sends it to a Graphite server over TCP or
//! UDP. Meant for single-shot runs from a scheduler.

pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod pipeline;
pub mod transform;

pub use config::{Args, Config};
pub use error::Error;
pub use pipeline::Summary;

use promethiite_graphite::GraphiteClient;
use tracing::info;

/// Read the input, convert it and send it to the configured server.
pub async fn run(config: &Config) -> Result<Summary, Error> {
    let text = input::read_input(config.input.as_deref()).await?;
    let source = match &config.input {
        Some(path) => path.display().to_string(),
        None => "stdin".to_string(),
    };
    info!(%source, bytes = text.len(), "read input");

    let mut client = GraphiteClient::new(config.sink.clone());
    let summary = pipeline::run(&text, &mut client).await?;
    client.close().await?;

    Ok(summary)
}
