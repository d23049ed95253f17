//! promethiite binary.

use clap::{CommandFactory, Parser};
use promethiite::{logging, Args};
use tracing::{debug, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Bare invocation prints usage instead of a missing-argument error
    if std::env::args_os().len() <= 1 {
        Args::command().print_help()?;
        std::process::exit(1);
    }

    let args = Args::parse();
    let config = args.into_config();
    logging::init_tracing(config.log_level);
    debug!(?config, "configuration loaded");

    let summary = promethiite::run(&config).await?;
    info!(
        families = summary.families,
        metrics = summary.metrics,
        server = %config.sink.address(),
        "done"
    );

    Ok(())
}
