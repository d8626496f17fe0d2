//! rustls client configuration from PEM files.

use std::path::Path;
use std::sync::Arc;

use rustls::pki_types::{CertificateDer, PrivateKeyDer};
use rustls::{ClientConfig, RootCertStore};

use crate::config::TlsFiles;
use crate::error::{io_err, VaultError};

/// Build a client config for `files`.
///
/// The CA bundle replaces ureq's built-in roots, so it is required whenever
/// any TLS file is configured.
pub(crate) fn client_config(files: &TlsFiles) -> Result<Arc<ClientConfig>, VaultError> {
    let Some(ca_path) = files.ca_cert.as_deref() else {
        return Err(VaultError::Config(
            "VAULT_CACERT is required when a client certificate is configured".to_string(),
        ));
    };

    let mut roots = RootCertStore::empty();
    for cert in read_certs(ca_path)? {
        roots
            .add(cert)
            .map_err(|e| VaultError::Tls(format!("{}: {e}", ca_path.display())))?;
    }

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let builder = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| VaultError::Tls(e.to_string()))?
        .with_root_certificates(roots);

    let config = match &files.client_identity {
        Some((cert_path, key_path)) => {
            let certs = read_certs(cert_path)?;
            let key = read_key(key_path)?;
            builder
                .with_client_auth_cert(certs, key)
                .map_err(|e| VaultError::Tls(e.to_string()))?
        }
        None => builder.with_no_client_auth(),
    };

    Ok(Arc::new(config))
}

fn read_pem(path: &Path) -> Result<Vec<u8>, VaultError> {
    std::fs::read(path).map_err(|e| io_err(path, e))
}

fn read_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, VaultError> {
    let pem = read_pem(path)?;
    let certs = rustls_pemfile::certs(&mut pem.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| VaultError::Tls(format!("{}: {e}", path.display())))?;
    if certs.is_empty() {
        return Err(VaultError::Tls(format!(
            "{}: no certificates found",
            path.display()
        )));
    }
    Ok(certs)
}

fn read_key(path: &Path) -> Result<PrivateKeyDer<'static>, VaultError> {
    let pem = read_pem(path)?;
    rustls_pemfile::private_key(&mut pem.as_slice())
        .map_err(|e| VaultError::Tls(format!("{}: {e}", path.display())))?
        .ok_or_else(|| VaultError::Tls(format!("{}: no private key found", path.display())))
}
