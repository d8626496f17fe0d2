//! Connection settings.
//!
//! # API pattern
//!
//! - [`VaultConfig::from_env_at`] takes an explicit home directory and an
//!   environment lookup; used in tests.
//! - [`VaultConfig::from_env`] derives both from the process and delegates.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{io_err, VaultError};

pub const DEV_ADDRESS: &str = "http://127.0.0.1:8200";
pub const DEV_TOKEN: &str = "dev-only-token";
pub const DEFAULT_ADDRESS: &str = "https://127.0.0.1:8200";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const TOKEN_FILE: &str = ".vault-token";

/// PEM files for a TLS connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsFiles {
    /// CA bundle that replaces the built-in roots.
    pub ca_cert: Option<PathBuf>,
    /// Client certificate and key, always set together.
    pub client_identity: Option<(PathBuf, PathBuf)>,
}

impl TlsFiles {
    pub fn is_empty(&self) -> bool {
        self.ca_cert.is_none() && self.client_identity.is_none()
    }
}

/// Everything needed to reach one Vault server with one token.
#[derive(Clone, PartialEq, Eq)]
pub struct VaultConfig {
    pub address: String,
    pub token: String,
    pub namespace: Option<String>,
    pub tls: TlsFiles,
    pub timeout: Duration,
}

impl std::fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultConfig")
            .field("address", &self.address)
            .field("token", &"<redacted>")
            .field("namespace", &self.namespace)
            .field("tls", &self.tls)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl VaultConfig {
    /// A local `vault server -dev` instance.
    pub fn dev() -> Self {
        Self {
            address: DEV_ADDRESS.to_string(),
            token: DEV_TOKEN.to_string(),
            namespace: None,
            tls: TlsFiles::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Resolve settings from the process environment and `~/.vault-token`.
    pub fn from_env() -> Result<Self, VaultError> {
        let home = dirs::home_dir()
            .ok_or_else(|| VaultError::Config("cannot determine home directory".to_string()))?;
        Self::from_env_at(&home, |key| std::env::var(key).ok())
    }

    /// Resolve settings using `env` for variable lookups and `home` for the
    /// token file. Empty variables count as unset.
    pub fn from_env_at(
        home: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, VaultError> {
        let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let address = var("VAULT_ADDR").unwrap_or_else(|| DEFAULT_ADDRESS.to_string());
        let token = match var("VAULT_TOKEN") {
            Some(token) => token.trim().to_string(),
            None => read_token_file(&home.join(TOKEN_FILE))?,
        };

        let client_identity = match (var("VAULT_CLIENT_CERT"), var("VAULT_CLIENT_KEY")) {
            (Some(cert), Some(key)) => Some((PathBuf::from(cert), PathBuf::from(key))),
            (None, None) => None,
            _ => {
                return Err(VaultError::Config(
                    "VAULT_CLIENT_CERT and VAULT_CLIENT_KEY must be set together".to_string(),
                ))
            }
        };

        let timeout = match var("VAULT_CLIENT_TIMEOUT") {
            Some(raw) => parse_timeout(&raw)?,
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            address,
            token,
            namespace: var("VAULT_NAMESPACE"),
            tls: TlsFiles {
                ca_cert: var("VAULT_CACERT").map(PathBuf::from),
                client_identity,
            },
            timeout,
        })
    }

    /// `--dev` wins over the environment.
    pub fn select(dev: bool) -> Result<Self, VaultError> {
        if dev {
            Ok(Self::dev())
        } else {
            Self::from_env()
        }
    }
}

fn read_token_file(path: &Path) -> Result<String, VaultError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(VaultError::MissingToken {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(io_err(path, e)),
    };
    let token = raw.trim();
    if token.is_empty() {
        return Err(VaultError::MissingToken {
            path: path.to_path_buf(),
        });
    }
    Ok(token.to_string())
}

/// Seconds, optionally suffixed with `s` (`30`, `30s`).
fn parse_timeout(raw: &str) -> Result<Duration, VaultError> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix('s').unwrap_or(trimmed);
    digits
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .ok_or_else(|| VaultError::Config(format!("invalid VAULT_CLIENT_TIMEOUT '{raw}'")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
