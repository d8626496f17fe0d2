//! Shared sync pipeline entrypoint used by every CLI command.
//!
//! | mode      | reads            | mutates                          |
//! |-----------|------------------|----------------------------------|
//! | `Backup`  | remote           | directory (overwrite, no delete) |
//! | `Upload`  | directory        | remote (overwrite, no delete)    |
//! | `Restore` | directory, remote| remote (overwrite and delete)    |

use std::fmt;
use std::path::Path;

use vault_policies_core::{scanner, writer, PolicyName, PolicyStore, WriteResult};

use crate::plan::{self, Plan};
use crate::remote;
use crate::SyncError;

/// Direction of a sync pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Remote → directory.
    Backup,
    /// Directory → remote, without deletions.
    Upload,
    /// Directory → remote, deleting remote-only policies.
    Restore,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Backup => write!(f, "backup"),
            SyncMode::Upload => write!(f, "upload"),
            SyncMode::Restore => write!(f, "restore"),
        }
    }
}

/// One policy file handled by a backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupEntry {
    pub name: PolicyName,
    pub document: String,
    pub result: WriteResult,
}

/// Outcome of a backup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupReport {
    pub entries: Vec<BackupEntry>,
}

/// Outcome of an upload or restore pass.
///
/// Unless `dry_run` is set, every mutation in `plan` has been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteReport {
    pub plan: Plan,
    pub dry_run: bool,
}

/// Outcome of [`run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncReport {
    Backup(BackupReport),
    Remote(RemoteReport),
}

/// Run one sync pass of `mode` between `dir` and `store`.
pub fn run<S: PolicyStore>(
    store: &mut S,
    mode: SyncMode,
    dir: &Path,
    dry_run: bool,
) -> Result<SyncReport, SyncError> {
    tracing::debug!("{mode} of {} (dry_run = {dry_run})", dir.display());
    let report = match mode {
        SyncMode::Backup => SyncReport::Backup(backup(store, dir, dry_run)?),
        SyncMode::Upload => SyncReport::Remote(upload(store, dir, dry_run)?),
        SyncMode::Restore => SyncReport::Remote(restore(store, dir, dry_run)?),
    };
    tracing::debug!("done with {mode} of {}", dir.display());
    Ok(report)
}

/// Write every remote policy to `<dir>/<name>.hcl`.
///
/// Files for policies that no longer exist remotely are left in place. A
/// name that cannot be stored as a file aborts the pass before anything is
/// written.
pub fn backup<S: PolicyStore>(
    store: &S,
    dir: &Path,
    dry_run: bool,
) -> Result<BackupReport, SyncError> {
    let remote = remote::fetch_all(store)?;
    for name in remote.keys() {
        writer::check_file_name(name)?;
    }

    let mut entries = Vec::with_capacity(remote.len());
    for (name, document) in remote {
        let result = writer::write_policy_file(dir, &name, &document, dry_run)?;
        entries.push(BackupEntry {
            name,
            document,
            result,
        });
    }
    Ok(BackupReport { entries })
}

/// Write every local policy to the store. Never deletes.
pub fn upload<S: PolicyStore>(
    store: &mut S,
    dir: &Path,
    dry_run: bool,
) -> Result<RemoteReport, SyncError> {
    tracing::debug!("walking directory {}", dir.display());
    let local = scanner::scan_dir(dir)?;

    let plan = plan::plan_push(&local);
    plan.apply(store, dry_run)?;
    Ok(RemoteReport { plan, dry_run })
}

/// Make the store hold exactly the local policies.
pub fn restore<S: PolicyStore>(
    store: &mut S,
    dir: &Path,
    dry_run: bool,
) -> Result<RemoteReport, SyncError> {
    tracing::debug!("walking directory {}", dir.display());
    let local = scanner::scan_dir(dir)?;
    let remote = remote::fetch_all(store)?;

    let plan = plan::plan_mirror(&local, &remote);
    plan.apply(store, dry_run)?;
    Ok(RemoteReport { plan, dry_run })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
