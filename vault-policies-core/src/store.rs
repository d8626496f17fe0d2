//! The remote side of a sync pass.

use crate::types::PolicyName;

/// A keyed store of policy documents, such as a Vault server.
///
/// Every call is blocking and either fully succeeds or returns an error;
/// callers abort on the first failure.
pub trait PolicyStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Names of every policy currently held by the store.
    fn list_policies(&self) -> Result<Vec<PolicyName>, Self::Error>;

    /// The document for `name`, or `None` if the store has no such policy.
    fn read_policy(&self, name: &PolicyName) -> Result<Option<String>, Self::Error>;

    /// Create or replace `name` with `document`.
    fn write_policy(&mut self, name: &PolicyName, document: &str) -> Result<(), Self::Error>;

    /// Remove `name` from the store.
    fn delete_policy(&mut self, name: &PolicyName) -> Result<(), Self::Error>;
}
