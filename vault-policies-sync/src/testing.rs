//! In-memory [`PolicyStore`] that behaves like Vault's policy endpoints.

use thiserror::Error;

use vault_policies_core::{PolicyName, PolicySet, PolicyStore};

#[derive(Debug, Error)]
#[error("{0}")]
pub(crate) struct MemoryError(String);

#[derive(Debug, Default)]
pub(crate) struct MemoryStore {
    pub policies: PolicySet,
    /// Names that are listed but 404 on read.
    pub phantom: Vec<PolicyName>,
    /// Operation (`list`, `read`, `write`, `delete`) that always fails.
    pub fail_on: Option<&'static str>,
    /// Every successful mutation, in order: `write <name>` / `delete <name>`.
    pub mutations: Vec<String>,
}

impl MemoryStore {
    pub fn with(policies: &[(&str, &str)]) -> Self {
        Self {
            policies: policies
                .iter()
                .map(|(name, doc)| (PolicyName::from(*name), doc.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    /// A fresh Vault: `default` with some rules, `root` empty.
    pub fn vault() -> Self {
        Self::with(&[("default", "path \"sys/capabilities-self\" {}"), ("root", "")])
    }

    fn check(&self, operation: &str) -> Result<(), MemoryError> {
        if self.fail_on == Some(operation) {
            return Err(MemoryError(format!("{operation} refused")));
        }
        Ok(())
    }
}

impl PolicyStore for MemoryStore {
    type Error = MemoryError;

    fn list_policies(&self) -> Result<Vec<PolicyName>, MemoryError> {
        self.check("list")?;
        let mut names: Vec<_> = self.policies.keys().cloned().collect();
        names.extend(self.phantom.iter().cloned());
        Ok(names)
    }

    fn read_policy(&self, name: &PolicyName) -> Result<Option<String>, MemoryError> {
        self.check("read")?;
        Ok(self.policies.get(name).cloned())
    }

    fn write_policy(&mut self, name: &PolicyName, document: &str) -> Result<(), MemoryError> {
        self.check("write")?;
        if name.as_str() == "root" {
            return Err(MemoryError("cannot update root policy".to_string()));
        }
        self.policies.insert(name.clone(), document.to_string());
        self.mutations.push(format!("write {name}"));
        Ok(())
    }

    fn delete_policy(&mut self, name: &PolicyName) -> Result<(), MemoryError> {
        self.check("delete")?;
        if name.builtin().is_some() {
            return Err(MemoryError(format!("cannot delete {name} policy")));
        }
        self.policies.remove(name);
        self.mutations.push(format!("delete {name}"));
        Ok(())
    }
}
