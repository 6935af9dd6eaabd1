//! Environment composition
//!
//! Entries are resolved strictly in declaration order, then bulk references
//! are applied on top of them. Bulk references therefore override
//! individually declared entries, and later bulk references override
//! earlier ones.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Serialize;

use crate::document::DocumentStore;
use crate::error::{Error, Result};
use crate::export;
use crate::reference::{ReferenceEntry, classify};
use crate::stores::{BulkReference, Stores};

/// The final mapping from variable name to value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Environment {
    vars: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.vars.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.vars.iter()
    }

    /// Render every variable as a shell `export` statement.
    pub fn to_exports(&self) -> Result<String> {
        export::render_exports(self)
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.vars
    }
}

impl Extend<(String, String)> for Environment {
    fn extend<T: IntoIterator<Item = (String, String)>>(&mut self, iter: T) {
        self.vars.extend(iter);
    }
}

impl FromIterator<(String, String)> for Environment {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Environment {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.vars.iter()
    }
}

/// Classify and resolve a single entry.
pub fn resolve_entry(entry: &ReferenceEntry, docs: &dyn DocumentStore) -> Result<String> {
    export::check_name(&entry.key)?;
    let source = classify(entry)?;
    tracing::debug!(key = %entry.key, source = source.label(), "Resolving reference");
    source.resolve(docs)
}

/// Compose an environment from `entries` and `bulk_refs`.
///
/// The first failure aborts the composition; no partial environment is
/// returned. Errors carry the key of the entry, or the name of the bulk
/// reference, that caused them. Every variable name must be a shell
/// identifier, including names supplied by external stores.
pub fn compose(
    entries: &[ReferenceEntry],
    bulk_refs: &[BulkReference],
    docs: &dyn DocumentStore,
    stores: &Stores<'_>,
) -> Result<Environment> {
    let mut env = Environment::new();

    for entry in entries {
        let value = resolve_entry(entry, docs).map_err(|e| Error::Reference {
            key: entry.key.clone(),
            source: Box::new(e),
        })?;
        env.insert(entry.key.clone(), value);
    }

    for bulk_ref in bulk_refs {
        let vars = stores
            .fetch(bulk_ref)
            .and_then(|vars| {
                vars.keys().try_for_each(|name| export::check_name(name))?;
                Ok(vars)
            })
            .map_err(|e| Error::BulkReference {
                name: bulk_ref.to_string(),
                source: Box::new(e),
            })?;
        tracing::debug!(reference = %bulk_ref, count = vars.len(), "Applying bulk reference");
        env.extend(vars);
    }

    tracing::info!(
        entries = entries.len(),
        bulk_refs = bulk_refs.len(),
        variables = env.len(),
        "Composed shell environment"
    );
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Documents;
    use crate::stores::{CredentialRef, MemoryStore};
    use serde_json::json;

    #[test]
    fn later_entry_overwrites_earlier() {
        let store = MemoryStore::new();
        let env = compose(
            &[
                ReferenceEntry::literal("A", "one"),
                ReferenceEntry::literal("A", "two"),
            ],
            &[],
            &Documents::default(),
            &Stores::from_backend(&store),
        )
        .unwrap();
        assert_eq!(env.get("A"), Some("two"));
        assert_eq!(env.len(), 1);
    }

    #[test]
    fn bulk_reference_overrides_entry() {
        let store = MemoryStore::new().with_credential("bundle", [("A", b"two".to_vec())]);
        let env = compose(
            &[ReferenceEntry::literal("A", "one")],
            &[BulkReference::Credential(CredentialRef {
                name: "bundle".into(),
                keys: vec!["A".into()],
            })],
            &Documents::new(json!({})),
            &Stores::from_backend(&store),
        )
        .unwrap();
        assert_eq!(env.get("A"), Some("two"));
    }

    #[test]
    fn error_carries_entry_key() {
        let store = MemoryStore::new();
        let err = compose(
            &[
                ReferenceEntry::literal("OK", "fine"),
                ReferenceEntry::value_ref("BROKEN", "spec.missing"),
            ],
            &[],
            &Documents::new(json!({"spec": {}})),
            &Stores::from_backend(&store),
        )
        .unwrap_err();
        assert_eq!(err.reference_key(), Some("BROKEN"));
        assert!(matches!(err.root(), Error::PathNotFound { .. }));
    }

    #[test]
    fn entry_key_must_be_shell_identifier() {
        let store = MemoryStore::new();
        let err = compose(
            &[ReferenceEntry::literal("MY-VAR", "x")],
            &[],
            &Documents::default(),
            &Stores::from_backend(&store),
        )
        .unwrap_err();
        assert_eq!(err.reference_key(), Some("MY-VAR"));
        assert!(matches!(err.root(), Error::InvalidVariableName { name } if name == "MY-VAR"));
    }

    #[test]
    fn environment_collects_and_iterates_in_key_order() {
        let env: Environment = [("B", "2"), ("A", "1")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let keys: Vec<&String> = env.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["A", "B"]);
    }
}
