//! Per-alias lifecycle: create, then reserve.

use tracing::{debug, info, warn};

use veil_client::MaskServiceClient;

/// A fully provisioned alias: generated and reserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedAlias {
    pub address: String,
}

/// Drive one alias through the two-phase workflow.
///
/// Sequential, no internal concurrency, no retries. Every failure mode
/// yields `None`: a transport-level failure is a silent no-op, an
/// application-level failure is logged once with the envelope's
/// normalized message. A reserve failure after a successful create
/// leaves the alias created-but-unreserved on the remote side; that is
/// accepted and never reconciled locally, and no partial alias is ever
/// returned.
pub async fn provision_one(client: &MaskServiceClient, label: &str) -> Option<ReservedAlias> {
    let generated = match client.generate_alias().await {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!(error = %e, "Generate call yielded no response");
            return None;
        }
    };

    if !generated.success {
        warn!(reason = %generated.error_message(), "Failed to generate alias");
        return None;
    }

    let Some(result) = generated.result else {
        warn!("Generate succeeded but carried no result");
        return None;
    };
    let address = result.hme;
    info!(address = %address, "Alias generated");

    let reserved = match client.reserve_alias(&address, label).await {
        Ok(envelope) => envelope,
        Err(e) => {
            debug!(address = %address, error = %e, "Reserve call yielded no response");
            return None;
        }
    };

    if !reserved.success {
        warn!(
            address = %address,
            reason = %reserved.error_message(),
            "Failed to reserve alias"
        );
        return None;
    }

    info!(address = %address, "Alias reserved");
    Some(ReservedAlias { address })
}
