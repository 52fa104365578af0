use std::collections::BTreeMap;

use crate::direct;
pub use crate::direct::{
    Cluster, ClusterSpec, Context, ContextSpec, ExecConfig, Extra, InteractiveMode, Kind, User,
    UserSpec,
};
use crate::error::Result;

/// A kubeconfig keyed by entry name, the shape the engines work on.
///
/// Converting back to [`direct::KubeConfig`] writes the entries sorted by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KubeConfig {
    pub contexts: BTreeMap<String, ContextSpec>,
    pub current_context: String,
    pub clusters: BTreeMap<String, ClusterSpec>,
    pub preferences: serde_yaml::Value,
    pub users: BTreeMap<String, UserSpec>,
    pub extra: Extra,
}

impl KubeConfig {
    pub fn parse(raw: &[u8]) -> Result<KubeConfig> {
        direct::KubeConfig::from_slice(raw).map(KubeConfig::from)
    }

    pub fn to_yaml(&self) -> Result<Vec<u8>> {
        direct::KubeConfig::from(self.clone()).to_vec()
    }

    /// Contexts that authenticate as `user`, with the cluster each one points at.
    ///
    /// Contexts naming a cluster that isn't in the document are left out.
    pub fn contexts_for<'a>(
        &'a self,
        user: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a str, &'a ClusterSpec)> + 'a {
        self.contexts
            .iter()
            .filter(move |(_, ctx)| ctx.user == user)
            .filter_map(move |(name, ctx)| match self.clusters.get(&ctx.cluster) {
                Some(cluster) => Some((name.as_str(), ctx.cluster.as_str(), cluster)),
                None => {
                    tracing::warn!(context = %name, cluster = %ctx.cluster, "context points at a missing cluster");
                    None
                }
            })
    }
}

impl From<direct::KubeConfig> for KubeConfig {
    fn from(kc: direct::KubeConfig) -> Self {
        Self {
            current_context: kc.current_context,
            preferences: kc.preferences,
            extra: kc.extra,
            contexts: kc
                .contexts
                .into_iter()
                .map(|ctx| (ctx.name, ctx.context))
                .collect(),
            clusters: kc
                .clusters
                .into_iter()
                .map(|cls| (cls.name, cls.cluster))
                .collect(),
            users: kc
                .users
                .into_iter()
                .map(|usr| (usr.name, usr.user))
                .collect(),
        }
    }
}

impl From<KubeConfig> for direct::KubeConfig {
    fn from(kc: KubeConfig) -> Self {
        direct::KubeConfig {
            kind: Kind::Config,
            api_version: direct::ApiVersion::V1,
            preferences: kc.preferences,
            current_context: kc.current_context,
            extra: kc.extra,

            clusters: kc
                .clusters
                .into_iter()
                .map(|(name, cluster)| Cluster { name, cluster })
                .collect(),
            contexts: kc
                .contexts
                .into_iter()
                .map(|(name, context)| Context { name, context })
                .collect(),
            users: kc
                .users
                .into_iter()
                .map(|(name, user)| User { name, user })
                .collect(),
        }
    }
}
