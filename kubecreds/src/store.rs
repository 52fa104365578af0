use std::collections::BTreeMap;

use crate::error::StoreError;

/// A record as the store hands it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSecret {
    /// The user entry the bundle belongs to.
    pub name: String,
    /// The encoded bundle.
    pub value: String,
}

/// An external key-value store for credential bundles, keyed by cluster server URL.
///
/// Each server holds at most one record.
pub trait SecretStore {
    /// Fails with [`StoreError::DuplicateItem`] if `service` already has a record.
    fn create_secret(&mut self, name: &str, service: &str, value: &str) -> Result<(), StoreError>;

    fn delete_secret(&mut self, service: &str) -> Result<(), StoreError>;

    /// Fails with [`StoreError::ItemNotFound`] if `service` has no record.
    fn get_secret(&self, service: &str) -> Result<StoredSecret, StoreError>;
}

/// A store that lives and dies with the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: BTreeMap<String, StoredSecret>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl SecretStore for MemoryStore {
    fn create_secret(&mut self, name: &str, service: &str, value: &str) -> Result<(), StoreError> {
        if self.records.contains_key(service) {
            return Err(StoreError::DuplicateItem {
                service: service.to_string(),
            });
        }
        self.records.insert(
            service.to_string(),
            StoredSecret {
                name: name.to_string(),
                value: value.to_string(),
            },
        );
        Ok(())
    }

    fn delete_secret(&mut self, service: &str) -> Result<(), StoreError> {
        self.records
            .remove(service)
            .map(|_| ())
            .ok_or_else(|| StoreError::ItemNotFound {
                service: service.to_string(),
            })
    }

    fn get_secret(&self, service: &str) -> Result<StoredSecret, StoreError> {
        self.records
            .get(service)
            .cloned()
            .ok_or_else(|| StoreError::ItemNotFound {
                service: service.to_string(),
            })
    }
}
