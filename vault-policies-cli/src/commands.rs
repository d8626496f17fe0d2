//! Shared arguments and plumbing for `backup`, `upload` and `restore`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use vault_policies_client::{VaultClient, VaultConfig};
use vault_policies_sync::{pipeline, SyncMode, SyncReport};

use crate::output;

/// Global flags that affect every command.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    pub dev: bool,
    pub dry_run: bool,
}

/// Arguments shared by every sync command.
#[derive(Args, Debug)]
pub struct DirectoryArgs {
    /// Directory holding one <name>.hcl file per policy.
    pub directory: PathBuf,
}

impl DirectoryArgs {
    pub fn run(self, mode: SyncMode, options: &Options) -> Result<()> {
        let config = VaultConfig::select(options.dev).context("failed to load Vault settings")?;
        let mut client = VaultClient::new(&config)
            .with_context(|| format!("failed to set up a client for {}", config.address))?;

        let report = pipeline::run(&mut client, mode, &self.directory, options.dry_run)
            .with_context(|| format!("{mode} failed for '{}'", self.directory.display()))?;

        match report {
            SyncReport::Backup(report) => {
                output::print_backup(&self.directory, &report, options.dry_run)
            }
            SyncReport::Remote(report) => output::print_remote(mode, &config.address, &report),
        }
        Ok(())
    }
}
