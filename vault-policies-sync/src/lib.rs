//! # vault-policies-sync
//!
//! Reconciles a policy directory with a [`PolicyStore`](vault_policies_core::PolicyStore).
//!
//! [`pipeline::run`] is the single entrypoint: it takes a [`SyncMode`] and
//! returns a [`SyncReport`] describing every policy it touched, or would
//! have touched under `--dry-run`.

pub mod diff;
pub mod error;
pub mod pipeline;
pub mod plan;
pub mod remote;

#[cfg(test)]
pub(crate) mod testing;

pub use error::SyncError;
pub use pipeline::{BackupEntry, BackupReport, RemoteReport, SyncMode, SyncReport};
pub use plan::{Plan, PolicyChange};
