mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use dox_config::Config;

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the summary line
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    commands::convert::handle(cli, &config)
}
