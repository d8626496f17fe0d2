//! Unified diffs between a remote and a local policy document.

use similar::TextDiff;

use vault_policies_core::PolicyName;

use crate::plan::PolicyChange;

/// Diff `previous` (remote) against `document` (local) for `name`.
///
/// Headers are `remote/<name>.hcl` and `local/<name>.hcl`. Identical
/// documents produce an empty string.
pub fn unified_diff(name: &PolicyName, previous: &str, document: &str) -> String {
    let file = name.file_name();
    let old_header = format!("remote/{file}");
    let new_header = format!("local/{file}");
    TextDiff::from_lines(previous, document)
        .unified_diff()
        .header(&old_header, &new_header)
        .context_radius(3)
        .to_string()
}

/// The diff a [`PolicyChange::Update`] would apply; `None` for every other
/// change.
pub fn change_diff(change: &PolicyChange) -> Option<String> {
    match change {
        PolicyChange::Update {
            name,
            previous,
            document,
        } => Some(unified_diff(name, previous, document)),
        _ => None,
    }
}
