//! Secret adapter

use std::collections::BTreeMap;

use super::{SecretRef, SecretStore, select_keys};
use crate::error::{Error, Result};

/// Read the JSON object stored under `reference.key` in the referenced
/// secret and copy the requested variables out of it.
///
/// A missing secret fails; a missing data key or variable yields empty
/// values.
pub fn fetch(store: &dyn SecretStore, reference: &SecretRef) -> Result<BTreeMap<String, String>> {
    let bytes = store.get_secret(&reference.name, &reference.namespace, &reference.key)?;

    let data = match bytes {
        Some(bytes) if !bytes.is_empty() => {
            serde_json::from_slice::<BTreeMap<String, String>>(&bytes).map_err(|e| {
                Error::decode(
                    format!(
                        "key {} of secret {}/{}",
                        reference.key, reference.namespace, reference.name
                    ),
                    e,
                )
            })?
        }
        _ => {
            tracing::debug!(
                secret = %reference.name,
                namespace = %reference.namespace,
                key = %reference.key,
                "Secret has no data under key"
            );
            BTreeMap::new()
        }
    };

    Ok(select_keys(data, &reference.keys))
}
