//! Request file loading
//!
//! A request bundles the function parameters with the documents and store
//! contents a real host would fetch from its environment:
//!
//! ```yaml
//! parameters:
//!   shellEnvVars:
//!     - key: NAME
//!       valueRef: metadata.name
//!   shellCommand: echo $NAME
//! observed:
//!   metadata: {name: demo}
//! context:
//!   apiextensions.crossplane.io/environment: {region: eu-west-1}
//! credentials:
//!   foo-creds: {password: secret}
//! secrets:
//!   - name: shell-vars
//!     namespace: crossplane-system
//!     data:
//!       env: {TOKEN: t0k3n}
//! configMaps:
//!   - name: scripts
//!     namespace: crossplane-system
//!     data:
//!       hello.sh: echo hello
//! environment:
//!   SHELL_VARS: '{"LEVEL": "debug"}'
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use shellenv_core::{Documents, MemoryStore, ShellParameters};

use crate::error::{CliError, Result};

/// A named object in a store, optionally namespaced
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoredObject {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub data: BTreeMap<String, Value>,
}

/// Everything needed to resolve one environment
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    #[serde(default)]
    pub parameters: ShellParameters,
    #[serde(default)]
    pub observed: Value,
    #[serde(default)]
    pub context: Value,
    #[serde(default)]
    pub credentials: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub secrets: Vec<StoredObject>,
    #[serde(default)]
    pub config_maps: Vec<StoredObject>,
    /// Environment blob variables; the process environment when absent
    #[serde(default)]
    pub environment: Option<BTreeMap<String, String>>,
}

/// String data as-is; structured data as compact JSON.
fn data_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Request {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| CliError::ReadRequest {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|source| CliError::ParseRequest {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a request from YAML (or JSON, which YAML accepts).
    pub fn parse(content: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    pub fn documents(&self) -> Documents {
        Documents::new(self.observed.clone()).with_context(self.context.clone())
    }

    /// Whether environment blobs come from the request rather than the process.
    pub fn has_environment(&self) -> bool {
        self.environment.is_some()
    }

    /// An in-memory store holding the request's secrets, config maps,
    /// credentials and environment.
    pub fn store(&self) -> MemoryStore {
        let mut store = MemoryStore::new();

        for secret in &self.secrets {
            store = store.with_secret(
                &secret.name,
                &secret.namespace,
                secret
                    .data
                    .iter()
                    .map(|(k, v)| (k.clone(), data_text(v).into_bytes())),
            );
        }
        for config_map in &self.config_maps {
            store = store.with_config_map(
                &config_map.name,
                &config_map.namespace,
                config_map.data.iter().map(|(k, v)| (k.clone(), data_text(v))),
            );
        }
        for (name, data) in &self.credentials {
            store = store.with_credential(
                name,
                data.iter().map(|(k, v)| (k.clone(), v.clone().into_bytes())),
            );
        }
        for (name, value) in self.environment.iter().flatten() {
            store = store.with_env(name, value);
        }

        store
    }
}
