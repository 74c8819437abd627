//! dealfinder entry point.
//!
//! Parses the command line, loads layered configuration and dispatches to
//! the subcommand. Logging goes to stderr; status lines and reports go to
//! stdout.

use anyhow::Result;
use clap::Parser;
use dealfinder_core::AppConfig;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;
mod pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.log_json);

    let mut config = AppConfig::load()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    tracing::debug!(db = %config.db_path.display(), country = %config.country, "configuration loaded");

    commands::run(cli.command, &config).await
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
