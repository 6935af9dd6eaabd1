//! Credential bundle adapter

use std::collections::BTreeMap;

use super::{CredentialRef, CredentialStore};

/// Copy the requested keys out of a credential bundle.
///
/// Never fails: an unknown bundle or key yields the empty string, since
/// which credentials are supplied depends on how the function is deployed.
pub fn fetch(store: &dyn CredentialStore, reference: &CredentialRef) -> BTreeMap<String, String> {
    let data = store.credential_data(&reference.name);
    if data.is_empty() {
        tracing::debug!(credential = %reference.name, "Credential bundle not supplied");
    }

    reference
        .keys
        .iter()
        .map(|key| {
            let value = data
                .get(key)
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                .unwrap_or_default();
            (key.clone(), value)
        })
        .collect()
}
