//! veilctl (veil) - bulk alias provisioning CLI
//!
//! The operator surface for the masking service: provision aliases in
//! waves, or list and export the existing set.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod export;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Progress and warnings go to stderr; tables and results to stdout.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.run().await {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
