//! Finding, loading, backing up and writing back the kubeconfig an engine operates on.

use std::{
    env,
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
};

use tracing::{debug, info};

use crate::{
    clean::KubeConfig,
    error::{Error, Result},
    fs::FileSystem,
    kube_dir,
};

pub const BACKUP_SUFFIX: &str = ".back";

/// A kubeconfig as read at the start of a run.
#[derive(Debug)]
pub struct Loaded {
    pub path: PathBuf,
    pub config: KubeConfig,
}

/// Pick the kubeconfig to work on: `explicit`, else the first entry of `KUBECONFIG`,
/// else `~/.kube/config`. The result is absolute.
pub fn resolve_kubeconfig(explicit: Option<&Path>) -> Result<PathBuf> {
    resolve_with(explicit, env::var_os("KUBECONFIG"), kube_dir())
}

fn resolve_with(
    explicit: Option<&Path>,
    kubeconfig_env: Option<OsString>,
    kube_dir: Option<PathBuf>,
) -> Result<PathBuf> {
    let from_env = kubeconfig_env
        .as_deref()
        .and_then(|list| env::split_paths(list).find(|p| !p.as_os_str().is_empty()));

    let path = match (explicit, from_env) {
        (Some(path), _) if !path.as_os_str().is_empty() => path.to_path_buf(),
        (_, Some(path)) => path,
        _ => kube_dir
            .map(|dir| dir.join("config"))
            .ok_or_else(|| Error::Configuration("cannot locate a home directory".into()))?,
    };

    if path.is_absolute() {
        return Ok(path);
    }
    let cwd = env::current_dir()
        .map_err(|e| Error::Configuration(format!("cannot resolve {}: {e}", path.display())))?;
    Ok(cwd.join(path))
}

pub fn backup_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(OsStr::new(BACKUP_SUFFIX));
    PathBuf::from(name)
}

/// Read and parse the kubeconfig at `path`, then copy its bytes to the backup file.
///
/// Nothing else has happened yet when this returns, so a failed backup aborts the run
/// before the store or the document is touched.
pub fn load_and_backup(fs: &dyn FileSystem, path: &Path) -> Result<Loaded> {
    let raw = fs.read(path).map_err(|e| {
        Error::Configuration(format!("cannot read kubeconfig {}: {e}", path.display()))
    })?;
    let config = KubeConfig::parse(&raw).map_err(|e| match e {
        Error::Parse(msg) => Error::Parse(format!("{}: {msg}", path.display())),
        other => other,
    })?;

    let backup = backup_path(path);
    fs.write(&backup, &raw).map_err(|source| Error::Write {
        path: backup.clone(),
        source,
    })?;
    debug!(path = %path.display(), backup = %backup.display(), "backed up kubeconfig");

    Ok(Loaded {
        path: path.to_path_buf(),
        config,
    })
}

/// Write `updated` back to where `loaded` came from, unless nothing changed.
///
/// Returns whether the file was rewritten.
pub fn write_back(fs: &dyn FileSystem, loaded: &Loaded, updated: &KubeConfig) -> Result<bool> {
    if *updated == loaded.config {
        debug!(path = %loaded.path.display(), "kubeconfig unchanged, not rewriting");
        return Ok(false);
    }

    let raw = updated.to_yaml()?;
    fs.replace(&loaded.path, &raw).map_err(|source| Error::Write {
        path: loaded.path.clone(),
        source,
    })?;
    info!(path = %loaded.path.display(), "wrote updated kubeconfig");
    Ok(true)
}
