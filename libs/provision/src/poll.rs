//! The unattended provisioning loop.

use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use veil_client::MaskServiceClient;

use crate::batch::generate_batch;
use crate::worker::ReservedAlias;

/// Provisioning loop configuration.
#[derive(Debug, Clone)]
pub struct ProvisionerConfig {
    /// Aliases to aim for per cycle.
    pub count_per_cycle: usize,

    /// Concurrency bound for one wave.
    pub concurrency: usize,

    /// Idle time between cycles.
    pub idle_interval: Duration,

    /// Label attached to every reservation.
    pub label: String,
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            count_per_cycle: 20,
            concurrency: 5,
            idle_interval: Duration::from_secs(30 * 60),
            label: "Generated by veil".to_string(),
        }
    }
}

/// Runs provisioning cycles forever, idling in between.
pub struct Provisioner {
    client: MaskServiceClient,
    config: ProvisionerConfig,
}

impl Provisioner {
    pub fn new(client: MaskServiceClient, mut config: ProvisionerConfig) -> Self {
        config.concurrency = config.concurrency.max(1);
        Self { client, config }
    }

    /// Run until the shutdown channel flips to `true`.
    ///
    /// Shutdown is observed at every suspension point: an in-flight
    /// wave is dropped where it stands and the idle sleep is cut short.
    /// Either way the loop returns cleanly; aliases that were already
    /// reserved are durable on the remote side.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            count_per_cycle = self.config.count_per_cycle,
            concurrency = self.config.concurrency,
            idle_secs = self.config.idle_interval.as_secs(),
            "Starting provisioning loop"
        );

        loop {
            let collected = tokio::select! {
                aliases = self.run_cycle() => aliases,
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Provisioning loop shutting down");
                        return;
                    }
                    continue;
                }
            };

            info!(
                generated = collected.len(),
                sleep_minutes = self.config.idle_interval.as_secs() / 60,
                "Cycle complete, idling"
            );

            tokio::select! {
                _ = tokio::time::sleep(self.config.idle_interval) => {}
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("Provisioning loop shutting down");
                        return;
                    }
                }
            }
        }
    }

    /// One full countdown of strictly sequential waves.
    ///
    /// The countdown moves by the concurrency bound on every wave, not
    /// by how many aliases that wave actually produced; failed slots
    /// are never reissued, so a cycle with partial failures collects
    /// fewer aliases than `count_per_cycle`.
    pub async fn run_cycle(&self) -> Vec<ReservedAlias> {
        let mut remaining = self.config.count_per_cycle as i64;
        let mut collected = Vec::new();

        while remaining > 0 {
            let wave = (self.config.concurrency as i64).min(remaining) as usize;
            let batch = generate_batch(&self.client, wave, &self.config.label).await;
            collected.extend(batch);
            remaining -= self.config.concurrency as i64;
        }

        collected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, Request, ResponseTemplate};

    async fn mount_service(
        server: &MockServer,
        expected_creates: Option<u64>,
        rejected: &'static [&'static str],
    ) {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut generate = Mock::given(method("POST"))
            .and(path("/v1/hme/generate"))
            .respond_with(move |_: &Request| {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                ResponseTemplate::new(200).set_body_json(json!({
                    "success": true,
                    "result": { "hme": format!("hme{n}@veil.example") }
                }))
            });
        if let Some(expected) = expected_creates {
            generate = generate.expect(expected);
        }
        generate.mount(server).await;

        Mock::given(method("POST"))
            .and(path("/v1/hme/reserve"))
            .respond_with(move |req: &Request| {
                let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
                let address = body["hme"].as_str().unwrap();
                if rejected.contains(&address) {
                    ResponseTemplate::new(200).set_body_json(json!({
                        "success": false,
                        "error": -41013,
                        "reason": "address already reserved"
                    }))
                } else {
                    ResponseTemplate::new(200).set_body_json(json!({
                        "success": true,
                        "result": {}
                    }))
                }
            })
            .mount(server)
            .await;
    }

    fn config(count: usize, concurrency: usize) -> ProvisionerConfig {
        ProvisionerConfig {
            count_per_cycle: count,
            concurrency,
            idle_interval: Duration::from_millis(10),
            label: "test".to_string(),
        }
    }

    #[test]
    fn default_config_carries_the_operator_defaults() {
        let config = ProvisionerConfig::default();
        assert_eq!(config.count_per_cycle, 20);
        assert_eq!(config.concurrency, 5);
        assert_eq!(config.idle_interval, Duration::from_secs(30 * 60));
    }

    #[tokio::test]
    async fn full_cycle_runs_four_waves_of_five() {
        let server = MockServer::start().await;
        mount_service(&server, Some(20), &[]).await;

        let client = MaskServiceClient::new(&server.uri(), None).unwrap();
        let provisioner = Provisioner::new(client, config(20, 5));

        let collected = provisioner.run_cycle().await;
        assert_eq!(collected.len(), 20);
    }

    #[tokio::test]
    async fn countdown_moves_by_bound_not_by_successes() {
        let server = MockServer::start().await;
        // Both rejected addresses are handed out in the first wave, so
        // that wave yields 3. The cycle still runs exactly two waves
        // (10 creates) and never reissues the failed slots.
        mount_service(&server, Some(10), &["hme0@veil.example", "hme1@veil.example"]).await;

        let client = MaskServiceClient::new(&server.uri(), None).unwrap();
        let provisioner = Provisioner::new(client, config(10, 5));

        let collected = provisioner.run_cycle().await;
        assert_eq!(collected.len(), 8);
    }

    #[tokio::test]
    async fn trailing_wave_requests_only_the_remainder() {
        let server = MockServer::start().await;
        mount_service(&server, Some(8), &[]).await;

        let client = MaskServiceClient::new(&server.uri(), None).unwrap();
        let provisioner = Provisioner::new(client, config(8, 5));

        // Waves of 5 and 3; the countdown goes 8 -> 3 -> -2.
        let collected = provisioner.run_cycle().await;
        assert_eq!(collected.len(), 8);
    }

    #[tokio::test]
    async fn run_returns_cleanly_on_shutdown() {
        let server = MockServer::start().await;
        mount_service(&server, None, &[]).await;

        let client = MaskServiceClient::new(&server.uri(), None).unwrap();
        let provisioner = Provisioner::new(client, config(2, 2));
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let handle = tokio::spawn(async move { provisioner.run(shutdown_rx).await });

        // Let at least one cycle land, then interrupt.
        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();

        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("loop should stop after shutdown")
            .unwrap();

        let creates = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .filter(|r| r.url.path() == "/v1/hme/generate")
            .count();
        assert!(creates >= 2, "expected at least one full cycle, saw {creates} creates");
    }
}
