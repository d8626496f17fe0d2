//! Set differences between a local and a remote [`PolicySet`].
//!
//! Planning is pure: it never touches the directory or the store. The
//! resulting [`Plan`] carries the documents it needs, so applying it only
//! requires the store.

use vault_policies_core::{Builtin, PolicyName, PolicySet, PolicyStore};

use crate::error::{remote_err, SyncError};

/// One step of a sync pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyChange {
    /// Local only: create remotely.
    Create { name: PolicyName, document: String },
    /// Both sides, documents differ: overwrite remote with local.
    Update {
        name: PolicyName,
        previous: String,
        document: String,
    },
    /// Push without comparing against the remote.
    Write { name: PolicyName, document: String },
    /// Remote only: delete remotely.
    Delete { name: PolicyName },
    /// Both sides, byte-identical.
    Unchanged { name: PolicyName },
    /// A change Vault would reject for one of its built-in policies.
    Protected { name: PolicyName, reason: &'static str },
}

impl PolicyChange {
    pub fn name(&self) -> &PolicyName {
        match self {
            PolicyChange::Create { name, .. }
            | PolicyChange::Update { name, .. }
            | PolicyChange::Write { name, .. }
            | PolicyChange::Delete { name }
            | PolicyChange::Unchanged { name }
            | PolicyChange::Protected { name, .. } => name,
        }
    }

    /// Whether applying this change calls the store.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            PolicyChange::Create { .. }
                | PolicyChange::Update { .. }
                | PolicyChange::Write { .. }
                | PolicyChange::Delete { .. }
        )
    }

    /// The document this change would store, if any.
    pub fn document(&self) -> Option<&str> {
        match self {
            PolicyChange::Create { document, .. }
            | PolicyChange::Update { document, .. }
            | PolicyChange::Write { document, .. } => Some(document),
            _ => None,
        }
    }
}

/// Ordered list of changes, sorted by policy name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    pub changes: Vec<PolicyChange>,
}

impl Plan {
    /// True when applying the plan would not call the store at all.
    pub fn is_noop(&self) -> bool {
        !self.changes.iter().any(PolicyChange::is_mutation)
    }

    pub fn mutations(&self) -> usize {
        self.changes.iter().filter(|c| c.is_mutation()).count()
    }

    /// Apply every mutation to `store`: deletions first, then writes.
    ///
    /// With `dry_run` the store is never called. The first failure aborts;
    /// changes already applied stay applied.
    pub fn apply<S: PolicyStore>(&self, store: &mut S, dry_run: bool) -> Result<(), SyncError> {
        if dry_run {
            for change in self.changes.iter().filter(|c| c.is_mutation()) {
                tracing::debug!("[dry-run] would apply {change:?}");
            }
            return Ok(());
        }

        for change in &self.changes {
            if let PolicyChange::Delete { name } = change {
                tracing::info!("deleting policy {name}");
                store
                    .delete_policy(name)
                    .map_err(|e| remote_err(format!("delete policy '{name}'"), e))?;
            }
        }

        for change in &self.changes {
            if let Some(document) = change.document() {
                let name = change.name();
                tracing::info!("setting policy {name}");
                store
                    .write_policy(name, document)
                    .map_err(|e| remote_err(format!("write policy '{name}'"), e))?;
            }
        }
        Ok(())
    }
}

const ROOT_IMMUTABLE: &str = "Vault does not allow modifying the root policy";
const BUILTIN_UNDELETABLE: &str = "Vault does not allow deleting built-in policies";

/// Full mirror: make `remote` equal to `local`.
///
/// Remote-only names become deletions, local names that are missing or
/// different remotely become writes, identical documents are left alone.
pub fn plan_mirror(local: &PolicySet, remote: &PolicySet) -> Plan {
    let deletions = remote
        .keys()
        .filter(|name| !local.contains_key(*name))
        .map(|name| match name.builtin() {
            Some(b) if !b.can_delete() => protected(name, BUILTIN_UNDELETABLE),
            _ => PolicyChange::Delete { name: name.clone() },
        });

    let writes = local
        .iter()
        .map(|(name, ours)| match remote.get(name) {
            Some(theirs) if theirs == ours => PolicyChange::Unchanged { name: name.clone() },
            _ if name.builtin() == Some(Builtin::Root) => protected(name, ROOT_IMMUTABLE),
            Some(theirs) => PolicyChange::Update {
                name: name.clone(),
                previous: theirs.clone(),
                document: ours.clone(),
            },
            None => PolicyChange::Create {
                name: name.clone(),
                document: ours.clone(),
            },
        });

    // Both sets are keyed by name, so every name appears exactly once.
    let mut changes: Vec<_> = deletions.chain(writes).collect();
    changes.sort_by(|a, b| a.name().cmp(b.name()));

    Plan { changes }
}

/// One-way push: write every local policy, delete nothing.
pub fn plan_push(local: &PolicySet) -> Plan {
    let changes = local
        .iter()
        .map(|(name, document)| match name.builtin() {
            Some(b) if !b.can_write() => protected(name, ROOT_IMMUTABLE),
            _ => PolicyChange::Write {
                name: name.clone(),
                document: document.clone(),
            },
        })
        .collect();

    Plan { changes }
}

fn protected(name: &PolicyName, reason: &'static str) -> PolicyChange {
    PolicyChange::Protected {
        name: name.clone(),
        reason,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
