//! # vault-policies-client
//!
//! Blocking Vault client for the `sys/policy` endpoints.
//!
//! Build a [`VaultConfig`] with [`VaultConfig::dev`] or
//! [`VaultConfig::from_env`], then hand it to [`VaultClient::new`]. The client
//! implements [`vault_policies_core::PolicyStore`].

pub mod client;
pub mod config;
pub mod error;
mod tls;

pub use client::VaultClient;
pub use config::{TlsFiles, VaultConfig};
pub use error::VaultError;
