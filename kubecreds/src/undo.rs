use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{
    auth::points_to,
    bundle::CredentialBundle,
    clean::KubeConfig,
    error::{Result, StoreError},
    fs::FileSystem,
    loader::{load_and_backup, resolve_kubeconfig, write_back},
    report::{Action, Report},
    store::SecretStore,
};

/// Puts stored credentials back inline for users delegated to this tool.
///
/// Store records are read, never deleted.
pub struct UndoEngine<'a> {
    pub fs: &'a dyn FileSystem,
    pub store: &'a dyn SecretStore,
    pub executable: PathBuf,
}

impl UndoEngine<'_> {
    pub fn run(&self, kubeconfig: Option<&Path>, only_user: Option<&str>) -> Result<Report> {
        let path = resolve_kubeconfig(kubeconfig)?;
        let loaded = load_and_backup(self.fs, &path)?;
        let mut config = loaded.config.clone();
        let mut report = Report::new(path);

        let names: Vec<String> = config.users.keys().cloned().collect();
        for name in names {
            if only_user.map_or(false, |only| only != name) {
                debug!(user = %name, "skipping, not the requested user");
                continue;
            }

            let ours = config.users[&name]
                .exec
                .as_ref()
                .map_or(false, |exec| points_to(exec, &self.executable));
            if !ours {
                debug!(user = %name, "not delegated to this tool");
                continue;
            }

            info!(user = %name, "restoring credentials");
            match self.find_bundle(&config, &name, &mut report)? {
                Some(bundle) => {
                    if let Some(user) = config.users.get_mut(&name) {
                        bundle.reinline(user);
                    }
                }
                None => warn!(user = %name, "no stored credentials found, user stays delegated"),
            }
        }

        report.written = write_back(self.fs, &loaded, &config)?;
        Ok(report)
    }

    /// The first stored bundle for `name` reachable through one of its contexts.
    fn find_bundle(
        &self,
        config: &KubeConfig,
        name: &str,
        report: &mut Report,
    ) -> Result<Option<CredentialBundle>> {
        for (context, _, cluster) in config.contexts_for(name) {
            let server = cluster.server.as_str();
            if server.is_empty() {
                continue;
            }

            let secret = match self.store.get_secret(server) {
                Ok(secret) => secret,
                Err(StoreError::ItemNotFound { .. }) => {
                    debug!(user = %name, context, server, "no secret for this context");
                    report.context(name, context, server, Action::Missing);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            // Records are keyed by server alone; another user may own this one.
            if secret.name != name {
                warn!(user = %name, context, server, owner = %secret.name, "secret belongs to another user");
                report.context(name, context, server, Action::Missing);
                continue;
            }

            let bundle = CredentialBundle::decode(&secret.name, &secret.value)?;
            info!(user = %name, context, server, "restored from secret");
            report.context(name, context, server, Action::Restored);
            return Ok(Some(bundle));
        }

        Ok(None)
    }
}
