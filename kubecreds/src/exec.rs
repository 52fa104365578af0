//! The `client.authentication.k8s.io/v1` exec-credential objects kubectl exchanges with
//! a credential plugin.

use std::collections::BTreeMap;

use serde::*;
use serde_json::Value as JsonValue;

use crate::{
    auth::EXEC_API_VERSION,
    error::{Error, Result},
};

/// Environment variable kubectl puts the request in.
pub const EXEC_INFO_ENV: &str = "KUBERNETES_EXEC_INFO";
pub const EXEC_CREDENTIAL_KIND: &str = "ExecCredential";

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecCredential {
    #[serde(default)]
    pub api_version: String,
    #[serde(default)]
    pub kind: String,
    #[serde(default)]
    pub spec: ExecCredentialSpec,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ExecCredentialStatus>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExecCredentialSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<ExecCluster>,
    #[serde(default)]
    pub interactive: bool,
}

/// What kubectl tells the plugin about the cluster (`provideClusterInfo: true`).
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ExecCluster {
    #[serde(default)]
    pub server: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate_authority_data: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExecCredentialStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_certificate_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_key_data: Option<String>,
}

impl ExecCredential {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| Error::Parse(format!("{EXEC_INFO_ENV}: {e}")))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Parse(format!("exec credential: {e}")))
    }

    /// The server kubectl is connecting to, if it sent one.
    pub fn server(&self) -> &str {
        self.spec
            .cluster
            .as_ref()
            .map(|c| c.server.as_str())
            .unwrap_or_default()
    }

    /// Turn the request into a response carrying `status`.
    pub fn answer(mut self, status: ExecCredentialStatus) -> Self {
        self.api_version = EXEC_API_VERSION.to_string();
        self.kind = EXEC_CREDENTIAL_KIND.to_string();
        self.status = Some(status);
        self
    }
}
