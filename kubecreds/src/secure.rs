//! Moving inline credentials into the secret store and pointing users at the exec plugin.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{
    auth::{classify, delegate, has_sensitive, points_to, Sensitivity},
    bundle::CredentialBundle,
    clean::KubeConfig,
    error::{Result, StoreError},
    fs::FileSystem,
    loader::{load_and_backup, resolve_kubeconfig, write_back},
    prompt::Prompter,
    report::{Action, Report},
    store::{SecretStore, StoredSecret},
};

pub struct SecureEngine<'a> {
    pub fs: &'a dyn FileSystem,
    pub store: &'a mut dyn SecretStore,
    pub prompter: &'a mut dyn Prompter,
    /// Path written into the exec block of every user this run delegates.
    pub executable: PathBuf,
}

impl SecureEngine<'_> {
    /// Secure every sensitive user in the kubeconfig, or just `only_user`.
    ///
    /// The first store or write error stops the run before the kubeconfig is rewritten.
    /// Declined prompts are not errors.
    pub fn run(&mut self, kubeconfig: Option<&Path>, only_user: Option<&str>) -> Result<Report> {
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

            let user = &config.users[&name];
            match classify(user, &self.executable) {
                Sensitivity::Sensitive => {}
                Sensitivity::ForeignExec if has_sensitive(user) => {
                    warn!(user = %name, "user runs another exec plugin, leaving it alone");
                    continue;
                }
                state => {
                    debug!(user = %name, ?state, "nothing to secure");
                    continue;
                }
            }

            info!(user = %name, "securing user");
            let bundle = CredentialBundle::extract(&name, user);
            let stored = self.store_bundle(&config, &bundle, &mut report)?;

            // Without a copy in the store, removing the inline credentials would lose them.
            if !stored {
                warn!(user = %name, "no stored copy, keeping inline credentials");
                report.user(&name, Action::KeptInline);
                continue;
            }

            if self.confirm(&format!("Remove sensitive parts from user {name}?")) {
                if let Some(user) = config.users.get_mut(&name) {
                    delegate(user, &self.executable);
                }
                info!(user = %name, "user now uses the exec plugin");
                report.user(&name, Action::Delegated);
            } else {
                report.user(&name, Action::KeptInline);
            }
        }

        report.written = write_back(self.fs, &loaded, &config)?;
        Ok(report)
    }

    /// Offer each context of the user in turn until one of them leaves a copy of
    /// `bundle` in the store. Returns whether that happened.
    fn store_bundle(
        &mut self,
        config: &KubeConfig,
        bundle: &CredentialBundle,
        report: &mut Report,
    ) -> Result<bool> {
        let name = bundle.name.as_str();
        let encoded = bundle.encode()?;

        for (context, _, cluster) in config.contexts_for(name) {
            let server = cluster.server.as_str();
            if server.is_empty() {
                warn!(user = %name, context, "cluster has no server, skipping");
                continue;
            }

            if !self.confirm(&format!("Create secret for context {context} ({server})?")) {
                report.context(name, context, server, Action::Declined);
                continue;
            }

            match self.store.create_secret(name, server, &encoded) {
                Ok(()) => {
                    info!(user = %name, context, server, "secret created");
                    report.context(name, context, server, Action::Stored);
                    return Ok(true);
                }
                Err(StoreError::DuplicateItem { .. }) => {}
                Err(e) => return Err(e.into()),
            }

            let existing = self.existing(server)?;
            let owner = existing.as_ref().map(|e| e.name.as_str());

            // Records are keyed by server alone; the record may be the only copy of
            // another user's credentials.
            if let Some(owner) = owner.filter(|owner| *owner != name) {
                if self.is_delegated(config, owner) {
                    warn!(
                        user = %name,
                        context,
                        server,
                        owner,
                        "secret is the only copy of a delegated user's credentials, not replacing"
                    );
                    report.context(name, context, server, Action::KeptExisting);
                    continue;
                }
            }

            let question = match owner {
                Some(owner) => {
                    format!("Secret for {server} already exists (user {owner}). Replace it?")
                }
                None => format!("Secret for {server} already exists. Replace it?"),
            };
            if !self.confirm(&question) {
                if existing.map_or(false, |existing| holds(&existing, bundle)) {
                    debug!(user = %name, server, "existing secret already matches");
                    report.context(name, context, server, Action::AlreadyStored);
                    return Ok(true);
                }
                report.context(name, context, server, Action::KeptExisting);
                continue;
            }

            match self.store.delete_secret(server) {
                Ok(()) | Err(StoreError::ItemNotFound { .. }) => {}
                Err(e) => return Err(e.into()),
            }
            self.store.create_secret(name, server, &encoded)?;
            info!(user = %name, context, server, "secret replaced");
            report.context(name, context, server, Action::Replaced);
            return Ok(true);
        }

        Ok(false)
    }

    fn existing(&self, server: &str) -> Result<Option<StoredSecret>> {
        match self.store.get_secret(server) {
            Ok(existing) => Ok(Some(existing)),
            Err(StoreError::ItemNotFound { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether `user` in the document being worked on, including users delegated
    /// earlier in this run, relies on our exec plugin.
    fn is_delegated(&self, config: &KubeConfig, user: &str) -> bool {
        config
            .users
            .get(user)
            .and_then(|spec| spec.exec.as_ref())
            .map_or(false, |exec| points_to(exec, &self.executable))
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        match self.prompter.confirm(prompt) {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, prompt, "no answer, taking it as no");
                false
            }
        }
    }
}

/// Whether `existing` is exactly `bundle`. Unreadable records don't count.
fn holds(existing: &StoredSecret, bundle: &CredentialBundle) -> bool {
    existing.name == bundle.name
        && CredentialBundle::decode(&existing.name, &existing.value)
            .map_or(false, |stored| stored == *bundle)
}
