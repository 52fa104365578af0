//! Keep kubeconfig credentials in a secret store instead of in the file.
//!
//! [`SecureEngine`] moves inline certificates, keys and basic-auth out of a kubeconfig and
//! leaves an exec-plugin reference behind, [`RestoreEngine`] answers kubectl's exec-credential
//! calls from the store, and [`UndoEngine`] puts the credentials back inline.

pub mod auth;
pub mod bundle;
pub mod clean;
pub mod direct;
pub mod error;
pub mod exec;
pub mod fs;
pub mod loader;
pub mod prompt;
pub mod report;
pub mod restore;
pub mod secure;
pub mod store;
pub mod undo;

use std::path::PathBuf;

pub use clean::KubeConfig;
pub use error::{Error, Result, StoreError};
pub use restore::RestoreEngine;
pub use secure::SecureEngine;
pub use undo::UndoEngine;

pub fn kube_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".kube"))
}
