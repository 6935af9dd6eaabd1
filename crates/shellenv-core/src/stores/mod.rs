//! External store interfaces and the bulk reference adapters
//!
//! Each backend trait mirrors one collaborator the engine consumes. The
//! adapter modules turn a [`BulkReference`] into a partial environment, each
//! with its own failure posture:
//!
//! - [`secret`] and [`config_map`] fail when the resource is unreachable or
//!   missing, never on a missing key inside it
//! - [`credential`] never fails
//! - [`env_blob`] fails when the variable is unset or not a JSON object

pub mod config_map;
pub mod credential;
pub mod env_blob;
mod lazy;
mod memory;
pub mod secret;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use config_map::load_scripts;
pub use lazy::LazyStore;
pub use memory::{MemoryStore, ProcessEnv};

/// A secret backend.
///
/// Implementations backed by a network service must return
/// `StoreUnavailable` once the caller's deadline expires rather than block.
pub trait SecretStore: Send + Sync {
    /// Raw bytes stored under `key` in the secret `namespace/name`.
    ///
    /// Returns `Ok(None)` when the secret exists but has no such key, and
    /// `StoreNotFound` when the secret itself does not exist.
    fn get_secret(&self, name: &str, namespace: &str, key: &str) -> Result<Option<Vec<u8>>>;
}

/// A config map backend.
pub trait ConfigMapStore: Send + Sync {
    /// All entries of the config map `namespace/name`.
    fn get_config_map(&self, name: &str, namespace: &str) -> Result<BTreeMap<String, String>>;
}

/// Credential bundles supplied alongside the request.
pub trait CredentialStore: Send + Sync {
    /// Data of the bundle `name`; empty when the bundle is absent.
    fn credential_data(&self, name: &str) -> BTreeMap<String, Vec<u8>>;
}

/// Source of environment blobs (a variable holding a JSON object).
pub trait EnvSource: Send + Sync {
    fn var(&self, name: &str) -> Option<String>;
}

/// Keys read from a JSON object stored in an environment variable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVarsRef {
    /// Name of the environment variable
    #[serde(default)]
    pub name: String,
    /// Keys to copy out of the JSON object
    #[serde(default)]
    pub keys: Vec<String>,
}

/// A secret entry holding a JSON object of variables
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    /// Data key whose value is the JSON object
    #[serde(default)]
    pub key: String,
    /// Variables to copy; all of them when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
}

/// Keys read from a credential bundle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub keys: Vec<String>,
}

/// Keys read from a config map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigMapRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    /// Entries to copy; all of them when empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
}

/// Script entries read from a config map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptsConfigMapRef {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub script_names: Vec<String>,
}

/// A request for a whole set of variables from one external store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulkReference {
    Environment(EnvVarsRef),
    ConfigMap(ConfigMapRef),
    Secret(SecretRef),
    Credential(CredentialRef),
}

impl fmt::Display for BulkReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BulkReference::Environment(r) => write!(f, "shellEnvVarsRef {}", r.name),
            BulkReference::ConfigMap(r) => write!(f, "config map {}/{}", r.namespace, r.name),
            BulkReference::Secret(r) => write!(f, "secret {}/{}", r.namespace, r.name),
            BulkReference::Credential(r) => write!(f, "credential {}", r.name),
        }
    }
}

/// Copy `keys` out of `data`, mapping missing keys to the empty string.
/// With no keys requested, every entry is copied.
pub(crate) fn select_keys(
    data: BTreeMap<String, String>,
    keys: &[String],
) -> BTreeMap<String, String> {
    if keys.is_empty() {
        return data;
    }
    keys.iter()
        .map(|key| (key.clone(), data.get(key).cloned().unwrap_or_default()))
        .collect()
}

/// The external stores available to one resolution session
#[derive(Clone, Copy)]
pub struct Stores<'a> {
    secrets: &'a dyn SecretStore,
    config_maps: &'a dyn ConfigMapStore,
    credentials: &'a dyn CredentialStore,
    environment: &'a dyn EnvSource,
}

impl<'a> Stores<'a> {
    pub fn new(
        secrets: &'a dyn SecretStore,
        config_maps: &'a dyn ConfigMapStore,
        credentials: &'a dyn CredentialStore,
        environment: &'a dyn EnvSource,
    ) -> Self {
        Self {
            secrets,
            config_maps,
            credentials,
            environment,
        }
    }

    /// Use one backend for every store.
    pub fn from_backend<B>(backend: &'a B) -> Self
    where
        B: SecretStore + ConfigMapStore + CredentialStore + EnvSource,
    {
        Self::new(backend, backend, backend, backend)
    }

    /// Replace the environment blob source.
    pub fn with_environment(mut self, environment: &'a dyn EnvSource) -> Self {
        self.environment = environment;
        self
    }

    pub fn config_maps(&self) -> &'a dyn ConfigMapStore {
        self.config_maps
    }

    /// Resolve a bulk reference into a partial environment.
    pub fn fetch(&self, reference: &BulkReference) -> Result<BTreeMap<String, String>> {
        match reference {
            BulkReference::Environment(r) => env_blob::fetch(self.environment, r),
            BulkReference::ConfigMap(r) => config_map::fetch(self.config_maps, r),
            BulkReference::Secret(r) => secret::fetch(self.secrets, r),
            BulkReference::Credential(r) => Ok(credential::fetch(self.credentials, r)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_keys_fills_missing_with_empty() {
        let data = BTreeMap::from([("a".to_string(), "1".to_string())]);
        let selected = select_keys(data, &["a".to_string(), "b".to_string()]);
        assert_eq!(selected["a"], "1");
        assert_eq!(selected["b"], "");
    }

    #[test]
    fn select_keys_without_keys_copies_everything() {
        let data = BTreeMap::from([
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]);
        assert_eq!(select_keys(data.clone(), &[]), data);
    }

    #[test]
    fn bulk_reference_display() {
        let r = BulkReference::Secret(SecretRef {
            name: "creds".into(),
            namespace: "default".into(),
            ..SecretRef::default()
        });
        assert_eq!(r.to_string(), "secret default/creds");
    }
}
