//! The OS credential store (macOS Keychain, Windows Credential Manager, Linux Secret Service).

use keyring::Entry;
use serde::{Deserialize, Serialize};

use kubecreds::{
    store::{SecretStore, StoredSecret},
    StoreError,
};

/// Account every entry is filed under; the service is the cluster server URL.
pub const ACCOUNT: &str = "kubectl-credentials-keychain";

#[derive(Serialize, Deserialize)]
struct Record {
    name: String,
    value: String,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Keychain;

fn backend(e: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn entry(service: &str) -> Result<Entry, StoreError> {
    Entry::new(service, ACCOUNT).map_err(backend)
}

impl SecretStore for Keychain {
    fn create_secret(&mut self, name: &str, service: &str, value: &str) -> Result<(), StoreError> {
        let entry = entry(service)?;
        match entry.get_password() {
            Ok(_) => {
                return Err(StoreError::DuplicateItem {
                    service: service.to_string(),
                })
            }
            Err(keyring::Error::NoEntry) => {}
            Err(e) => return Err(backend(e)),
        }

        let record = serde_json::to_string(&Record {
            name: name.to_string(),
            value: value.to_string(),
        })
        .map_err(backend)?;
        entry.set_password(&record).map_err(backend)
    }

    fn delete_secret(&mut self, service: &str) -> Result<(), StoreError> {
        match entry(service)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Err(StoreError::ItemNotFound {
                service: service.to_string(),
            }),
            Err(e) => Err(backend(e)),
        }
    }

    fn get_secret(&self, service: &str) -> Result<StoredSecret, StoreError> {
        let raw = match entry(service)?.get_password() {
            Ok(raw) => raw,
            Err(keyring::Error::NoEntry) => {
                return Err(StoreError::ItemNotFound {
                    service: service.to_string(),
                })
            }
            Err(e) => return Err(backend(e)),
        };
        let record: Record = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Backend(format!("unreadable keychain entry for {service}: {e}")))?;
        Ok(StoredSecret {
            name: record.name,
            value: record.value,
        })
    }
}
