use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing or unusable input: kubeconfig path, exec info, cluster endpoint.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Malformed kubeconfig, exec info or stored bundle.
    #[error("parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The backup or the rewritten kubeconfig could not be persisted.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("a secret for {service} already exists")]
    DuplicateItem { service: String },

    #[error("no secret stored for {service}")]
    ItemNotFound { service: String },

    #[error("secret store failure: {0}")]
    Backend(String),
}
