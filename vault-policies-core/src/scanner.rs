//! Policy directory scanner.
//!
//! Walks a directory tree and loads every `*.hcl` file as a policy named
//! after the file stem. Subdirectories only group files on disk; they never
//! become part of the policy name, so a name may appear at most once across
//! the whole tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{io_err, ScanError};
use crate::types::{PolicyName, PolicySet, POLICY_EXTENSION};

/// Load every policy under `dir`.
///
/// Entries are visited in file-name order. Symlinked directories are not
/// descended into. The first unreadable entry aborts the scan.
pub fn scan_dir(dir: &Path) -> Result<PolicySet, ScanError> {
    let meta = fs::metadata(dir).map_err(|e| io_err(dir, e))?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut found: BTreeMap<PolicyName, (PathBuf, String)> = BTreeMap::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_err(dir, e))?;
        if entry.file_type().is_dir() {
            continue;
        }
        let path = entry.path();

        let Some(name) = policy_name_for(path)? else {
            tracing::debug!("skipping {}", path.display());
            continue;
        };
        let content = read_policy_file(path)?;
        tracing::debug!("found policy {name} in {}", path.display());

        if let Some((first, _)) = found.get(&name) {
            return Err(ScanError::DuplicatePolicy {
                name,
                first: first.clone(),
                second: path.to_path_buf(),
            });
        }
        found.insert(name, (path.to_path_buf(), content));
    }

    Ok(found
        .into_iter()
        .map(|(name, (_, content))| (name, content))
        .collect())
}

fn walk_err(root: &Path, err: walkdir::Error) -> ScanError {
    let path = err.path().unwrap_or(root).to_path_buf();
    io_err(path, err.into())
}

/// `Ok(None)` for files that are not policies at all, an error for files
/// that look like policies but cannot be named.
fn policy_name_for(path: &Path) -> Result<Option<PolicyName>, ScanError> {
    let invalid = |reason| ScanError::InvalidName {
        path: path.to_path_buf(),
        reason,
    };
    if path.file_name().is_some_and(|n| n == ".hcl") {
        return Err(invalid("name is empty"));
    }
    match PolicyName::from_path(path) {
        Some(name) => match name.file_name_problem() {
            Some(reason) => Err(invalid(reason)),
            None => Ok(Some(name)),
        },
        None if path.extension().is_some_and(|ext| ext == POLICY_EXTENSION) => {
            Err(invalid("file name is not valid UTF-8"))
        }
        None => Ok(None),
    }
}

fn read_policy_file(path: &Path) -> Result<String, ScanError> {
    let bytes = fs::read(path).map_err(|e| io_err(path, e))?;
    String::from_utf8(bytes).map_err(|_| ScanError::NotUtf8 {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
