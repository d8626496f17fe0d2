//! Error types for vault-policies-client.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise while configuring or talking to Vault.
#[derive(Debug, Error)]
pub enum VaultError {
    /// No token in `VAULT_TOKEN` and no readable token file.
    #[error("no Vault token: set VAULT_TOKEN or log in to create {path}")]
    MissingToken { path: PathBuf },

    /// Invalid connection settings.
    #[error("invalid Vault configuration: {0}")]
    Config(String),

    /// A file referenced by the configuration could not be read.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PEM or TLS setup failure.
    #[error("TLS configuration error: {0}")]
    Tls(String),

    /// `VAULT_ADDR` (or a derived request URL) is not a valid URL.
    #[error("invalid Vault address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: url::ParseError,
    },

    /// The request never produced an HTTP response.
    #[error("{method} {url} failed: {source}")]
    Transport {
        method: &'static str,
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    /// Vault answered with a non-success status.
    #[error("{method} {url} returned {status}: {}", format_errors(.errors))]
    Api {
        method: &'static str,
        url: String,
        status: u16,
        errors: Vec<String>,
    },

    /// The response body did not have the expected shape.
    #[error("unexpected response from {url}: {reason}")]
    Response { url: String, reason: String },
}

fn format_errors(errors: &[String]) -> String {
    if errors.is_empty() {
        "no error details".to_string()
    } else {
        errors.join("; ")
    }
}

pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> VaultError {
    VaultError::Io {
        path: path.into(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_lists_vault_messages() {
        let err = VaultError::Api {
            method: "DELETE",
            url: "http://127.0.0.1:8200/v1/sys/policy/root".to_string(),
            status: 400,
            errors: vec!["cannot delete root policy".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "DELETE http://127.0.0.1:8200/v1/sys/policy/root returned 400: cannot delete root policy"
        );
    }

    #[test]
    fn api_error_without_details() {
        let err = VaultError::Api {
            method: "GET",
            url: "http://vault/v1/sys/policy".to_string(),
            status: 503,
            errors: vec![],
        };
        assert!(err.to_string().ends_with("503: no error details"));
    }
}
