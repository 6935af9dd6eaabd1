//! Function input parameters

use serde::{Deserialize, Serialize};

use crate::document::DocumentStore;
use crate::error::{Error, Result};
use crate::path::PathExpression;
use crate::policy::{self, ResolutionPolicy};
use crate::reference::ReferenceEntry;
use crate::stores::{
    BulkReference, ConfigMapRef, CredentialRef, EnvVarsRef, ScriptsConfigMapRef, SecretRef,
};

const DEFAULT_STDOUT_FIELD: &str = "status.atFunction.shell.stdout";
const DEFAULT_STDERR_FIELD: &str = "status.atFunction.shell.stderr";

/// Input parameters of a shell invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShellParameters {
    /// Individually declared variables, resolved in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shell_env_vars: Vec<ReferenceEntry>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell_env_vars_ref: Option<EnvVarsRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shell_env_vars_config_map_refs: Vec<ConfigMapRef>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shell_env_vars_secret_ref: Option<SecretRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shell_credential_refs: Vec<CredentialRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub shell_scripts_config_maps_ref: Vec<ScriptsConfigMapRef>,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub shell_command: String,

    /// Path to a field holding the command
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub shell_command_field: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stdout_field: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stderr_field: String,
}

impl ShellParameters {
    /// Exactly one of `shellCommand` and `shellCommandField` must be set.
    pub fn validate(&self) -> Result<()> {
        match (self.shell_command.is_empty(), self.shell_command_field.is_empty()) {
            (true, true) => Err(Error::InvalidParameters(
                "one of shellCommand or shellCommandField is required".into(),
            )),
            (false, false) => Err(Error::InvalidParameters(
                "exactly one of shellCommand or shellCommandField is required".into(),
            )),
            _ => Ok(()),
        }
    }

    /// Bulk references in the order they are applied: the environment blob,
    /// config maps, the secret, then credential bundles.
    pub fn bulk_references(&self) -> Vec<BulkReference> {
        let mut refs = Vec::new();

        if let Some(env_ref) = self.shell_env_vars_ref.as_ref().filter(|r| !r.keys.is_empty()) {
            refs.push(BulkReference::Environment(env_ref.clone()));
        }
        refs.extend(
            self.shell_env_vars_config_map_refs
                .iter()
                .cloned()
                .map(BulkReference::ConfigMap),
        );
        let secret_ref = self.shell_env_vars_secret_ref.as_ref();
        if let Some(secret_ref) = secret_ref.filter(|r| !r.name.is_empty()) {
            refs.push(BulkReference::Secret(secret_ref.clone()));
        }
        refs.extend(
            self.shell_credential_refs
                .iter()
                .cloned()
                .map(BulkReference::Credential),
        );

        refs
    }

    /// The command to run: `shellCommand`, or the value found at
    /// `shellCommandField`, which must exist.
    pub fn command(&self, docs: &dyn DocumentStore) -> Result<String> {
        self.validate()?;
        if !self.shell_command.is_empty() {
            return Ok(self.shell_command.clone());
        }
        let expr = PathExpression::parse(&self.shell_command_field)?;
        policy::resolve(docs, &expr, ResolutionPolicy::Required, "")
    }

    pub fn stdout_field(&self) -> &str {
        non_empty_or(&self.stdout_field, DEFAULT_STDOUT_FIELD)
    }

    pub fn stderr_field(&self) -> &str {
        non_empty_or(&self.stderr_field, DEFAULT_STDERR_FIELD)
    }
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}
