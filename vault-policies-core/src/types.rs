//! Domain types shared by every crate in the workspace.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// File extension (without the dot) of a policy document on disk.
pub const POLICY_EXTENSION: &str = "hcl";

// ---------------------------------------------------------------------------
// PolicyName
// ---------------------------------------------------------------------------

/// A strongly-typed Vault policy name.
///
/// Ordering is lexicographic so every pass over a [`PolicySet`] is
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PolicyName(pub String);

impl PolicyName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `<name>.hcl`, the file this policy is stored in.
    pub fn file_name(&self) -> String {
        format!("{}.{POLICY_EXTENSION}", self.0)
    }

    /// Derive a policy name from a path ending in `.hcl`.
    ///
    /// Returns `None` when the extension is anything else. A file literally
    /// named `.hcl` has no extension and therefore no name.
    pub fn from_path(path: &Path) -> Option<Self> {
        if path.extension()? != POLICY_EXTENSION {
            return None;
        }
        let stem = path.file_stem()?.to_str()?;
        Some(Self(stem.to_owned()))
    }

    /// Why this name cannot live as a single `<name>.hcl` file in a policy
    /// directory, or `None` when it can.
    ///
    /// Vault accepts `/` in policy names and lowercases every name it
    /// stores, so anything that would not survive the trip to disk and back
    /// under the same name is refused.
    pub fn file_name_problem(&self) -> Option<&'static str> {
        match self.0.as_str() {
            "" => Some("name is empty"),
            "." | ".." => Some("name is a relative path component"),
            s if s.contains(['/', '\\']) => Some("name contains a path separator"),
            s if s.bytes().any(|b| b.is_ascii_uppercase()) => {
                Some("Vault stores policy names in lowercase")
            }
            _ => None,
        }
    }

    /// The Vault built-in this name refers to, if any.
    pub fn builtin(&self) -> Option<Builtin> {
        match self.0.as_str() {
            "root" => Some(Builtin::Root),
            "default" => Some(Builtin::Default),
            _ => None,
        }
    }
}

impl fmt::Display for PolicyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PolicyName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PolicyName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for PolicyName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// Built-in policies
// ---------------------------------------------------------------------------

/// Policies Vault creates and guards itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    /// `root`: cannot be modified or removed.
    Root,
    /// `default`: may be modified, cannot be removed.
    Default,
}

impl Builtin {
    pub fn can_write(self) -> bool {
        matches!(self, Builtin::Default)
    }

    pub fn can_delete(self) -> bool {
        false
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Builtin::Root => write!(f, "root"),
            Builtin::Default => write!(f, "default"),
        }
    }
}

// ---------------------------------------------------------------------------
// PolicySet
// ---------------------------------------------------------------------------

/// Policy name → policy document. Documents are opaque text compared
/// byte-for-byte.
pub type PolicySet = BTreeMap<PolicyName, String>;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("admin.hcl", Some("admin"))]
    #[case("team/ops.hcl", Some("ops"))]
    #[case("ci.deploy.hcl", Some("ci.deploy"))]
    #[case("README.md", None)]
    #[case("admin.HCL", None)]
    #[case("admin.hcl.tmp", None)]
    #[case("admin", None)]
    #[case(".hcl", None)]
    fn name_from_path(#[case] path: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            PolicyName::from_path(Path::new(path)),
            expected.map(PolicyName::from)
        );
    }

    #[rstest]
    #[case("admin", None)]
    #[case("ci.deploy", None)]
    #[case("team-ops_2", None)]
    #[case("", Some("name is empty"))]
    #[case(".", Some("name is a relative path component"))]
    #[case("..", Some("name is a relative path component"))]
    #[case("../escaped", Some("name contains a path separator"))]
    #[case("team/ops", Some("name contains a path separator"))]
    #[case("team\\ops", Some("name contains a path separator"))]
    #[case("Admin", Some("Vault stores policy names in lowercase"))]
    fn file_name_problems(#[case] name: &str, #[case] expected: Option<&str>) {
        assert_eq!(PolicyName::from(name).file_name_problem(), expected);
    }

    #[test]
    fn mixed_case_file_keeps_its_stem() {
        let name = PolicyName::from_path(Path::new("Admin.hcl")).unwrap();
        assert_eq!(name.as_str(), "Admin");
        assert!(name.file_name_problem().is_some());
    }

    #[test]
    fn file_name_appends_extension() {
        assert_eq!(PolicyName::from("admin").file_name(), "admin.hcl");
    }

    #[test]
    fn builtins_are_recognized() {
        assert_eq!(PolicyName::from("root").builtin(), Some(Builtin::Root));
        assert_eq!(PolicyName::from("default").builtin(), Some(Builtin::Default));
        assert_eq!(PolicyName::from("admin").builtin(), None);
        assert!(!Builtin::Root.can_write());
        assert!(Builtin::Default.can_write());
        assert!(!Builtin::Default.can_delete());
    }

    #[test]
    fn policy_set_iterates_in_name_order() {
        let mut set = PolicySet::new();
        set.insert(PolicyName::from("zeta"), String::new());
        set.insert(PolicyName::from("alpha"), String::new());
        let names: Vec<_> = set.keys().map(PolicyName::as_str).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}
