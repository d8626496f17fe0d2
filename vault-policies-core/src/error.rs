//! Error types for vault-policies-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::types::PolicyName;

/// All errors that can arise while reading or writing the policy directory.
#[derive(Debug, Error)]
pub enum ScanError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The scan root exists but is not a directory.
    #[error("{path} is not a directory")]
    NotADirectory { path: PathBuf },

    /// A policy file whose content is not valid UTF-8.
    #[error("policy file {path} is not valid UTF-8")]
    NotUtf8 { path: PathBuf },

    /// A `.hcl` file from which no usable policy name can be derived.
    #[error("cannot derive a policy name from {path}: {reason}")]
    InvalidName { path: PathBuf, reason: &'static str },

    /// A policy name that cannot be stored as a file in the policy directory.
    #[error("policy '{name}' cannot be written to disk: {reason}")]
    UnsafeName {
        name: PolicyName,
        reason: &'static str,
    },

    /// Two files in the tree map to the same policy name.
    #[error("policy '{name}' is defined twice: {first} and {second}")]
    DuplicatePolicy {
        name: PolicyName,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Convenience constructor for [`ScanError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> ScanError {
    ScanError::Io {
        path: path.into(),
        source,
    }
}
