//! Answering kubectl when it runs us as an exec-credential plugin.

use tracing::debug;

use crate::{
    bundle::CredentialBundle,
    error::{Error, Result},
    exec::{ExecCredential, ExecCredentialStatus, EXEC_INFO_ENV},
    store::SecretStore,
};

/// Looks up the credentials for the cluster kubectl is connecting to.
///
/// Never writes anything; every invocation reads the store afresh.
pub struct RestoreEngine<'a> {
    pub store: &'a dyn SecretStore,
}

impl RestoreEngine<'_> {
    /// `exec_info` is the content of `KUBERNETES_EXEC_INFO`.
    pub fn run(&self, exec_info: Option<&str>) -> Result<ExecCredential> {
        let raw = exec_info
            .filter(|raw| !raw.trim().is_empty())
            .ok_or_else(|| Error::Configuration(format!("{EXEC_INFO_ENV} is not set")))?;
        let request = ExecCredential::from_json(raw)?;

        let server = request.server().to_string();
        if server.is_empty() {
            return Err(Error::Configuration(
                "empty cluster endpoint, the exec block needs provideClusterInfo: true".into(),
            ));
        }
        debug!(server = %server, "looking up credentials");

        let secret = self.store.get_secret(&server)?;
        debug!(server = %server, user = %secret.name, "found secret");

        let bundle = CredentialBundle::decode(&secret.name, &secret.value)?;
        let (client_certificate_data, client_key_data) = bundle.client_pem()?;
        if client_certificate_data.is_none() && client_key_data.is_none() {
            return Err(Error::Configuration(format!(
                "stored credentials for {} hold no client certificate or key",
                secret.name
            )));
        }

        Ok(request.answer(ExecCredentialStatus {
            client_certificate_data,
            client_key_data,
        }))
    }
}
