//! Human-readable reports on stdout.

use std::path::Path;

use colored::Colorize;

use vault_policies_core::WriteResult;
use vault_policies_sync::{diff, BackupReport, PolicyChange, RemoteReport, SyncMode};

pub fn print_backup(directory: &Path, report: &BackupReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let written = report
        .entries
        .iter()
        .filter(|e| !matches!(e.result, WriteResult::Unchanged { .. }))
        .count();
    let unchanged = report.entries.len() - written;

    if report.entries.is_empty() {
        println!("{prefix}✓ backup — Vault has no policies");
        return;
    }

    let verb = if dry_run { "would write" } else { "written" };
    println!(
        "{prefix}✓ backup to '{}' ({written} {verb}, {unchanged} unchanged)",
        directory.display()
    );

    for entry in &report.entries {
        match &entry.result {
            WriteResult::Written { path } => println!("  {}  {}", "✎".green(), path.display()),
            WriteResult::Unchanged { path } => println!("  {}  {}", "·".dimmed(), path.display()),
            WriteResult::WouldWrite { path } => {
                println!("  {}  {}", "~".yellow(), path.display());
                print_document(&entry.document);
            }
        }
    }
}

pub fn print_remote(mode: SyncMode, address: &str, report: &RemoteReport) {
    let prefix = if report.dry_run { "[dry-run] " } else { "" };
    let plan = &report.plan;

    if plan.changes.is_empty() {
        println!("{prefix}✓ {mode} — no policies found");
        return;
    }

    let count = |f: fn(&PolicyChange) -> bool| plan.changes.iter().filter(|c| f(c)).count();
    let written = count(|c| c.document().is_some());
    let deleted = count(|c| matches!(c, PolicyChange::Delete { .. }));
    let unchanged = count(|c| matches!(c, PolicyChange::Unchanged { .. }));
    let protected = count(|c| matches!(c, PolicyChange::Protected { .. }));

    let (write_verb, delete_verb) = if report.dry_run {
        ("would write", "would delete")
    } else {
        ("written", "deleted")
    };
    let mut summary = format!("{written} {write_verb}");
    if mode == SyncMode::Restore {
        summary.push_str(&format!(", {deleted} {delete_verb}, {unchanged} unchanged"));
    }
    if protected > 0 {
        summary.push_str(&format!(", {protected} protected"));
    }
    if plan.is_noop() && mode == SyncMode::Restore {
        println!("{prefix}✓ {mode} to {address} — nothing to do ({summary})");
    } else {
        println!("{prefix}✓ {mode} to {address} ({summary})");
    }

    for change in &plan.changes {
        print_change(change, report.dry_run);
    }
}

fn print_change(change: &PolicyChange, dry_run: bool) {
    let name = change.name();
    match change {
        PolicyChange::Create { document, .. } | PolicyChange::Write { document, .. } => {
            println!("  {}  {name}", "+".green());
            if dry_run {
                print_document(document);
            }
        }
        PolicyChange::Update { .. } => {
            println!("  {}  {name}", "~".yellow());
            if !dry_run {
                return;
            }
            if let Some(diff) = diff::change_diff(change) {
                print!("{diff}");
                if !diff.ends_with('\n') {
                    println!();
                }
            }
        }
        PolicyChange::Delete { .. } => println!("  {}  {name}", "-".red()),
        PolicyChange::Unchanged { .. } => println!("  {}  {name}", "·".dimmed()),
        PolicyChange::Protected { reason, .. } => {
            println!("  {}  {name} (skipped: {reason})", "!".yellow())
        }
    }
}

fn print_document(document: &str) {
    for line in document.lines() {
        println!("      {line}");
    }
}
