//! Concurrent two-phase alias provisioning.
//!
//! The pipeline has three layers, leaf-first:
//!
//! - [`provision_one`]: drives a single alias through the
//!   create→reserve workflow. Pure per-item logic, no shared state; all
//!   failure is absorbed into `None`.
//! - [`generate_batch`]: fans out up to the concurrency bound of
//!   workers as one wave and fans them all back in. Partial failure is
//!   expected and non-fatal.
//! - [`Provisioner`]: the unattended outer loop — repeat waves until a
//!   cycle's countdown is exhausted, idle for a fixed interval, start
//!   over. Runs until the shutdown channel flips.
//!
//! No call is retried and no local state outlives a cycle; the remote
//! service is the system of record for everything that succeeded.

mod batch;
mod poll;
mod worker;

pub use batch::generate_batch;
pub use poll::{Provisioner, ProvisionerConfig};
pub use worker::{provision_one, ReservedAlias};
