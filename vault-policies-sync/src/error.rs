//! Error types for vault-policies-sync.

use thiserror::Error;

use vault_policies_core::ScanError;

/// All errors that can arise from a sync pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Reading or writing the policy directory failed.
    #[error("policy directory error: {0}")]
    Local(#[from] ScanError),

    /// A call to the remote store failed.
    #[error("failed to {operation}: {source}")]
    Remote {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Convenience constructor for [`SyncError::Remote`].
pub(crate) fn remote_err<E>(operation: impl Into<String>, source: E) -> SyncError
where
    E: std::error::Error + Send + Sync + 'static,
{
    SyncError::Remote {
        operation: operation.into(),
        source: Box::new(source),
    }
}
