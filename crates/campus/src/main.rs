//! Campus server binary

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::Result;
use campus::{load_config, server, Overrides};
use clap::Parser;

/// Person and course HTTP service
#[derive(Debug, Parser)]
#[command(name = "campus", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Port to listen on, overriding every other setting
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&Overrides {
        config_path: cli.config,
        port: cli.port,
    })?;

    server::init_tracing(&config.log.filter);
    server::run(config).await
}
