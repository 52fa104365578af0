//! Deciding what state a user entry is in, and moving it between states.

use std::{ffi::OsStr, path::Path};

use crate::clean::{ExecConfig, InteractiveMode, UserSpec};

pub const EXEC_API_VERSION: &str = "client.authentication.k8s.io/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensitivity {
    /// Inline certificate, key, username or password that should be moved out.
    Sensitive,
    /// Already handed over to this tool's exec plugin.
    Delegated,
    /// Runs somebody else's exec plugin; never ours to touch.
    ForeignExec,
    /// Nothing worth protecting (token, file paths, auth provider...).
    Clean,
}

fn filled(field: &Option<String>) -> bool {
    field.as_deref().map_or(false, |s| !s.is_empty())
}

pub fn has_sensitive(user: &UserSpec) -> bool {
    filled(&user.client_certificate_data)
        || filled(&user.client_key_data)
        || filled(&user.username)
        || filled(&user.password)
}

/// Whether `exec` launches `executable`: either the command ends with its path, or the
/// command is a bare program name equal to its file name (resolved through `PATH`).
pub fn points_to(exec: &ExecConfig, executable: &Path) -> bool {
    if exec.command.is_empty() {
        return false;
    }
    if exec.command.ends_with(executable.to_string_lossy().as_ref()) {
        return true;
    }
    let bare = Path::new(&exec.command).components().count() == 1;
    bare && executable.file_name() == Some(OsStr::new(&exec.command))
}

pub fn classify(user: &UserSpec, executable: &Path) -> Sensitivity {
    let ours = user.exec.as_ref().map(|exec| points_to(exec, executable));
    match (has_sensitive(user), ours) {
        (_, Some(false)) => Sensitivity::ForeignExec,
        (true, _) => Sensitivity::Sensitive,
        (false, Some(true)) => Sensitivity::Delegated,
        (false, None) => Sensitivity::Clean,
    }
}

/// Drop the inline credentials and point the entry at our exec plugin.
pub fn delegate(user: &mut UserSpec, executable: &Path) {
    user.client_certificate_data = None;
    user.client_key_data = None;
    user.username = None;
    user.password = None;
    user.exec = Some(ExecConfig {
        api_version: EXEC_API_VERSION.to_string(),
        command: executable.to_string_lossy().into_owned(),
        provide_cluster_info: true,
        interactive_mode: Some(InteractiveMode::Never),
        ..Default::default()
    });
}
