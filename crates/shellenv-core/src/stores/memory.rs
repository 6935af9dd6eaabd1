//! In-memory store backends

use std::collections::BTreeMap;

use super::{ConfigMapStore, CredentialStore, EnvSource, SecretStore};
use crate::error::{Error, Result, StoreKind};

type Namespaced = (String, String);

/// A store backed by plain maps, keyed by `(namespace, name)`.
///
/// Implements every store trait, so one value can serve a whole session.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    secrets: BTreeMap<Namespaced, BTreeMap<String, Vec<u8>>>,
    config_maps: BTreeMap<Namespaced, BTreeMap<String, String>>,
    credentials: BTreeMap<String, BTreeMap<String, Vec<u8>>>,
    env: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret<K: Into<String>>(
        mut self,
        name: impl Into<String>,
        namespace: impl Into<String>,
        data: impl IntoIterator<Item = (K, Vec<u8>)>,
    ) -> Self {
        self.secrets.insert(
            (namespace.into(), name.into()),
            data.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        );
        self
    }

    pub fn with_config_map<K: Into<String>, V: Into<String>>(
        mut self,
        name: impl Into<String>,
        namespace: impl Into<String>,
        data: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        self.config_maps.insert(
            (namespace.into(), name.into()),
            data.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        );
        self
    }

    pub fn with_credential<K: Into<String>>(
        mut self,
        name: impl Into<String>,
        data: impl IntoIterator<Item = (K, Vec<u8>)>,
    ) -> Self {
        self.credentials.insert(
            name.into(),
            data.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        );
        self
    }

    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(name.into(), value.into());
        self
    }
}

impl SecretStore for MemoryStore {
    fn get_secret(&self, name: &str, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let secret = self
            .secrets
            .get(&(namespace.to_string(), name.to_string()))
            .ok_or_else(|| Error::not_found(StoreKind::Secret, name, Some(namespace)))?;
        Ok(secret.get(key).cloned())
    }
}

impl ConfigMapStore for MemoryStore {
    fn get_config_map(&self, name: &str, namespace: &str) -> Result<BTreeMap<String, String>> {
        self.config_maps
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| Error::not_found(StoreKind::ConfigMap, name, Some(namespace)))
    }
}

impl CredentialStore for MemoryStore {
    fn credential_data(&self, name: &str) -> BTreeMap<String, Vec<u8>> {
        self.credentials.get(name).cloned().unwrap_or_default()
    }
}

impl EnvSource for MemoryStore {
    fn var(&self, name: &str) -> Option<String> {
        self.env.get(name).cloned()
    }
}

/// The environment of the current process
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}
