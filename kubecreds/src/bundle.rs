//! The slice of a user entry that gets sent to the secret store.
//!
//! A bundle travels as a one-user kubeconfig document, YAML encoded and then base64
//! encoded, so the store only ever sees an opaque string.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::{
    clean::{KubeConfig, UserSpec},
    error::{Error, Result},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialBundle {
    /// Name of the user entry the material came from.
    pub name: String,
    /// Base64 PEM, as kubeconfig keeps it in `client-certificate-data`.
    pub certificate: Option<String>,
    /// Base64 PEM, as kubeconfig keeps it in `client-key-data`.
    pub key: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialBundle {
    /// Copy only the sensitive fields; exec blocks, tokens and the rest stay behind.
    pub fn extract(name: &str, user: &UserSpec) -> Self {
        Self {
            name: name.to_string(),
            certificate: user.client_certificate_data.clone(),
            key: user.client_key_data.clone(),
            username: user.username.clone(),
            password: user.password.clone(),
        }
    }

    /// Put the material back into `user` and drop its exec reference.
    pub fn reinline(&self, user: &mut UserSpec) {
        user.client_certificate_data = self.certificate.clone();
        user.client_key_data = self.key.clone();
        user.username = self.username.clone();
        user.password = self.password.clone();
        user.exec = None;
    }

    pub fn encode(&self) -> Result<String> {
        let mut doc = KubeConfig::default();
        doc.users.insert(
            self.name.clone(),
            UserSpec {
                client_certificate_data: self.certificate.clone(),
                client_key_data: self.key.clone(),
                username: self.username.clone(),
                password: self.password.clone(),
                ..Default::default()
            },
        );
        Ok(STANDARD.encode(doc.to_yaml()?))
    }

    /// Decode a stored value and pick out the entry called `name`.
    pub fn decode(name: &str, value: &str) -> Result<Self> {
        let raw = STANDARD
            .decode(value.trim())
            .map_err(|e| Error::Parse(format!("stored secret for {name} is not base64: {e}")))?;
        let doc = KubeConfig::parse(&raw)?;
        let user = doc.users.get(name).ok_or_else(|| {
            Error::Parse(format!("stored secret holds no credentials for user {name}"))
        })?;
        Ok(Self::extract(name, user))
    }

    /// PEM text of the client certificate and key, for the exec-credential status.
    pub fn client_pem(&self) -> Result<(Option<String>, Option<String>)> {
        let pem = |field: &Option<String>, what: &str| -> Result<Option<String>> {
            match field.as_deref() {
                None | Some("") => Ok(None),
                Some(data) => {
                    let raw = STANDARD.decode(data.trim()).map_err(|e| {
                        Error::Parse(format!("{what} of {} is not base64: {e}", self.name))
                    })?;
                    String::from_utf8(raw).map(Some).map_err(|e| {
                        Error::Parse(format!("{what} of {} is not text: {e}", self.name))
                    })
                }
            }
        };
        Ok((
            pem(&self.certificate, "client certificate")?,
            pem(&self.key, "client key")?,
        ))
    }
}
