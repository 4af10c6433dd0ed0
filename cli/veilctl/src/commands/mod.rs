//! CLI commands.

mod generate;
mod list;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use veil_client::MaskServiceClient;

use crate::config::{Config, Session};

/// veilmail CLI - bulk-provision and inspect masked email aliases.
#[derive(Debug, Parser)]
#[command(name = "veil")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the session cookie file.
    #[arg(long, global = true, env = "VEIL_COOKIE_FILE")]
    cookie_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Provision aliases in waves until interrupted.
    Generate(generate::GenerateCommand),

    /// List aliases and export them to a flat file.
    List(list::ListCommand),
}

impl Cli {
    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;

        let cookie_path = match self.cookie_file {
            Some(path) => path,
            None => Session::default_path()?,
        };
        let session = Session::load(&cookie_path)?;
        if session.is_none() {
            warn!(
                path = %cookie_path.display(),
                "No session cookie found; remote calls may be unauthorized"
            );
        }

        let ctx = CommandContext { config, session };

        match self.command {
            Some(Commands::Generate(cmd)) => cmd.run(ctx).await,
            Some(Commands::List(cmd)) => cmd.run(ctx).await,
            None => menu(ctx).await,
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub session: Option<Session>,
}

impl CommandContext {
    /// Get a client carrying the session cookie, when one was loaded.
    pub fn client(&self) -> Result<MaskServiceClient> {
        let client = MaskServiceClient::new(
            &self.config.api_url,
            self.session.as_ref().map(|session| session.cookie.as_str()),
        )?;
        Ok(client)
    }
}

/// Interactive action picker shown when no subcommand is given.
///
/// Anything other than a known selection — including EOF or Ctrl+C —
/// exits cleanly.
async fn menu(ctx: CommandContext) -> Result<()> {
    println!("1. Generate aliases");
    println!("2. List aliases");
    println!();
    println!("{}", "Select your action (Ctrl+C to exit)".green().bold());

    let mut line = String::new();
    let mut reader = BufReader::new(tokio::io::stdin());
    tokio::select! {
        read = reader.read_line(&mut line) => {
            read?;
        }
        _ = tokio::signal::ctrl_c() => return Ok(()),
    }

    match line.trim() {
        "1" => generate::GenerateCommand::default().run(ctx).await,
        "2" => list::ListCommand::default().run(ctx).await,
        _ => Ok(()),
    }
}
