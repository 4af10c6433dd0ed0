//! One fan-out wave of provisioning workers.

use futures_util::future::join_all;

use veil_client::MaskServiceClient;

use crate::worker::{provision_one, ReservedAlias};

/// Launch exactly `n` workers concurrently and wait for all of them.
///
/// The caller is responsible for keeping `n` within the concurrency
/// bound; this function is one wave, not a queue. Stragglers are never
/// cancelled early, aborted workers are filtered out, and the survivors
/// come back in submission order rather than completion order. Anywhere
/// between 0 and `n` aliases is a normal outcome.
pub async fn generate_batch(
    client: &MaskServiceClient,
    n: usize,
    label: &str,
) -> Vec<ReservedAlias> {
    let wave = (0..n).map(|_| provision_one(client, label));

    join_all(wave).await.into_iter().flatten().collect()
}
