//! Loading the full remote policy set.

use vault_policies_core::{PolicySet, PolicyStore};

use crate::error::{remote_err, SyncError};

/// List every policy in `store` and fetch its document.
///
/// A policy that disappears between the listing and the read is skipped.
pub fn fetch_all<S: PolicyStore>(store: &S) -> Result<PolicySet, SyncError> {
    tracing::debug!("listing remote policies");
    let names = store
        .list_policies()
        .map_err(|e| remote_err("list policies", e))?;

    let mut policies = PolicySet::new();
    for name in names {
        tracing::debug!("getting policy {name}");
        match store
            .read_policy(&name)
            .map_err(|e| remote_err(format!("read policy '{name}'"), e))?
        {
            Some(document) => {
                policies.insert(name, document);
            }
            None => tracing::warn!("policy {name} was listed but no longer exists; skipping"),
        }
    }
    Ok(policies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use vault_policies_core::PolicyName;

    #[test]
    fn fetches_every_listed_policy() {
        let store = MemoryStore::with(&[("admin", "a"), ("reader", "r")]);
        let set = fetch_all(&store).unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set[&PolicyName::from("reader")], "r");
    }

    #[test]
    fn vanished_policy_is_skipped() {
        let mut store = MemoryStore::with(&[("admin", "a")]);
        store.phantom.push(PolicyName::from("ghost"));
        let set = fetch_all(&store).unwrap();
        assert_eq!(set.keys().collect::<Vec<_>>(), vec![&PolicyName::from("admin")]);
    }

    #[test]
    fn list_failure_aborts() {
        let mut store = MemoryStore::with(&[("admin", "a")]);
        store.fail_on = Some("list");
        let err = fetch_all(&store).unwrap_err();
        assert!(err.to_string().starts_with("failed to list policies"));
    }
}
