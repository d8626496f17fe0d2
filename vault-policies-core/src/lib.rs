//! Policy types, the remote store seam, and the on-disk policy directory.
//!
//! - [`types`]: [`PolicyName`], [`PolicySet`] and Vault's built-in policies
//! - [`store`]: the [`PolicyStore`] trait implemented by remote backends
//! - [`scanner`]: builds a [`PolicySet`] from a directory of `.hcl` files
//! - [`writer`]: atomic, content-gated writes of single policy files

pub mod error;
pub mod scanner;
pub mod store;
pub mod types;
pub mod writer;

pub use error::ScanError;
pub use store::PolicyStore;
pub use types::{Builtin, PolicyName, PolicySet, POLICY_EXTENSION};
pub use writer::WriteResult;
