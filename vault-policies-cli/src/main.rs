//! vault-policies: keep Vault ACL policies in sync with a directory.
//!
//! # Usage
//!
//! ```text
//! vault-policies [--dev] [--dry-run] [--debug] backup  <directory>   (alias: import)
//! vault-policies [--dev] [--dry-run] [--debug] upload  <directory>   (alias: export)
//! vault-policies [--dev] [--dry-run] [--debug] restore <directory>   (alias: sync)
//! ```
//!
//! One `<name>.hcl` file per policy. Connection settings come from
//! `VAULT_ADDR`, `VAULT_TOKEN` / `~/.vault-token`, `VAULT_NAMESPACE` and the
//! `VAULT_CACERT` / `VAULT_CLIENT_CERT` / `VAULT_CLIENT_KEY` TLS files.

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{DirectoryArgs, Options};
use vault_policies_sync::SyncMode;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "vault-policies",
    version,
    about = "A helper to keep Vault policies in sync with your code",
    long_about = "vault-policies keeps your Vault policies in sync with a directory of \
                  .hcl files, so policy changes can ship with your release process."
)]
struct Cli {
    /// Use the local dev server (http://127.0.0.1:8200, token "dev-only-token").
    #[arg(long, global = true)]
    dev: bool,

    /// Describe every change without writing files or calling Vault mutations.
    #[arg(long, global = true)]
    dry_run: bool,

    /// Log every step to stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write every Vault policy to <directory>/<name>.hcl.
    #[command(visible_alias = "import")]
    Backup(DirectoryArgs),

    /// Write every policy in the directory to Vault (overwrites existing
    /// policies, never removes any).
    #[command(visible_alias = "export")]
    Upload(DirectoryArgs),

    /// Make Vault hold exactly the policies in the directory (overwrites
    /// changed policies and removes policies missing from the directory).
    #[command(visible_alias = "sync")]
    Restore(DirectoryArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let options = Options {
        dev: cli.dev,
        dry_run: cli.dry_run,
    };
    match cli.command {
        Commands::Backup(args) => args.run(SyncMode::Backup, &options),
        Commands::Upload(args) => args.run(SyncMode::Upload, &options),
        Commands::Restore(args) => args.run(SyncMode::Restore, &options),
    }
}

fn init_tracing(debug: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
