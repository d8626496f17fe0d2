//! Atomic policy file writer.
//!
//! ## `write_policy_file` protocol
//!
//! 1. Read the current file, if any.
//! 2. Compare bytes with the new document → skip if identical.
//! 3. Write to `<name>.hcl.tmp`.
//! 4. Rename to `<name>.hcl` (atomic on POSIX).

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{io_err, ScanError};
use crate::types::PolicyName;

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written (content changed or did not previously exist).
    Written { path: PathBuf },
    /// File was skipped because on-disk content already matches.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path } => path,
        }
    }
}

/// Refuse names that would not map to exactly `<dir>/<name>.hcl`.
pub fn check_file_name(name: &PolicyName) -> Result<(), ScanError> {
    match name.file_name_problem() {
        Some(reason) => Err(ScanError::UnsafeName {
            name: name.clone(),
            reason,
        }),
        None => Ok(()),
    }
}

/// Write `document` to `<dir>/<name>.hcl`, creating `dir` if needed.
pub fn write_policy_file(
    dir: &Path,
    name: &PolicyName,
    document: &str,
    dry_run: bool,
) -> Result<WriteResult, ScanError> {
    check_file_name(name)?;
    let path = dir.join(name.file_name());
    let tmp = PathBuf::from(format!("{}.tmp", path.display()));
    write_with_tmp(&path, document, dry_run, &tmp)
}

fn write_with_tmp(
    path: &Path,
    document: &str,
    dry_run: bool,
    tmp: &Path,
) -> Result<WriteResult, ScanError> {
    match std::fs::read(path) {
        Ok(existing) if existing == document.as_bytes() => {
            tracing::debug!("unchanged: {}", path.display());
            return Ok(WriteResult::Unchanged {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(io_err(path, e)),
    }

    if dry_run {
        tracing::debug!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    std::fs::write(tmp, document).map_err(|e| io_err(tmp, e))?;

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
