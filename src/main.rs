use anyhow::{Context, Result};
use clap::Parser;
use itemdb::cli::{self, Cli};
use itemdb::config::load_config;
use itemdb::logging::init_logging;
use tracing::debug;

fn main() -> Result<()> {
    let args = Cli::parse();

    let mut config = load_config(args.config.as_deref()).context("loading config")?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }

    init_logging(&config.log_level)?;
    debug!(data_dir = %config.data_dir.display(), "config loaded");

    cli::run(args.kind, &config)
}
