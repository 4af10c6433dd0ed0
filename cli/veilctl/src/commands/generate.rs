//! Generate command (unattended provisioning loop).

use std::time::Duration;

use anyhow::Result;
use clap::Args;
use tokio::sync::watch;

use veil_provision::{Provisioner, ProvisionerConfig};

use crate::output::print_info;

use super::CommandContext;

/// Generate command.
#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Aliases to aim for per cycle.
    #[arg(long, default_value = "20")]
    count: usize,

    /// Concurrent provisioning attempts per wave.
    #[arg(long, default_value = "5")]
    concurrency: usize,

    /// Idle seconds between cycles.
    #[arg(long, default_value = "1800")]
    interval_secs: u64,

    /// Label attached to every reservation.
    #[arg(long, default_value = "Generated by veil")]
    label: String,
}

impl Default for GenerateCommand {
    fn default() -> Self {
        Self {
            count: 20,
            concurrency: 5,
            interval_secs: 1800,
            label: "Generated by veil".to_string(),
        }
    }
}

impl GenerateCommand {
    /// Run provisioning cycles until Ctrl+C.
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let client = ctx.client()?;
        let provisioner = Provisioner::new(
            client,
            ProvisionerConfig {
                count_per_cycle: self.count,
                concurrency: self.concurrency,
                idle_interval: Duration::from_secs(self.interval_secs),
                label: self.label,
            },
        );

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = shutdown_tx.send(true);
            }
        });

        // Returns only once the shutdown channel flips; interrupt is a
        // normal exit, not an error.
        provisioner.run(shutdown_rx).await;

        print_info("Provisioning stopped.");
        Ok(())
    }
}
