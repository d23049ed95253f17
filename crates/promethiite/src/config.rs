//! Command-line arguments and run configuration.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use promethiite_graphite::config::DEFAULT_PORT;
use promethiite_graphite::{SinkConfig, Transport};
use tracing::Level;

use crate::transform::normalize_prefix;

/// Transport choice on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Proto {
    /// Plaintext over TCP
    Tcp,
    /// Plaintext over UDP
    Udp,
}

impl From<Proto> for Transport {
    fn from(proto: Proto) -> Self {
        match proto {
            Proto::Tcp => Transport::Tcp,
            Proto::Udp => Transport::Udp,
        }
    }
}

/// Ingests Prometheus metrics, converts them to Graphite metrics, and sends
/// them to a configured Graphite server.
#[derive(Parser, Debug)]
#[command(name = "promethiite")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// A file path from which to get the stats. Reads standard input by default.
    #[arg(short = 'f', long = "file")]
    pub file: Option<PathBuf>,

    /// Value to prepend to the metric name on send to Graphite.
    #[arg(short = 'p', long)]
    pub prefix: String,

    /// Graphite server.
    #[arg(short = 's', long)]
    pub server: String,

    /// Graphite server port.
    #[arg(short = 'o', long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Protocol to use to reach the Graphite server.
    #[arg(short = 'r', long, default_value = "tcp", value_enum)]
    pub proto: Proto,

    /// Set output verbosity (-v=info, -vv=debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Everything a run needs, resolved from [`Args`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Input file; `None` reads standard input.
    pub input: Option<PathBuf>,

    /// Graphite sink settings, with the prefix already normalized.
    pub sink: SinkConfig,

    /// Log level used when `RUST_LOG` is not set.
    pub log_level: Level,
}

impl Args {
    /// Convert command-line arguments to a run configuration.
    pub fn into_config(self) -> Config {
        let sink = SinkConfig::new(self.server)
            .with_port(self.port)
            .with_transport(self.proto.into())
            .with_prefix(normalize_prefix(&self.prefix));

        Config {
            input: self.file,
            sink,
            log_level: verbosity_level(self.verbose),
        }
    }
}

/// Map the `-v` count to a log level.
pub fn verbosity_level(count: u8) -> Level {
    match count {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}
