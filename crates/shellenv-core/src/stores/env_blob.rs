//! Environment blob adapter

use std::collections::BTreeMap;

use super::{EnvSource, EnvVarsRef};
use crate::error::{Error, Result, StoreKind};

/// Copy the requested keys out of the JSON object held by the environment
/// variable `reference.name`.
///
/// With no keys requested nothing is read, so an unset variable is not an
/// error.
pub fn fetch(env: &dyn EnvSource, reference: &EnvVarsRef) -> Result<BTreeMap<String, String>> {
    if reference.keys.is_empty() {
        return Ok(BTreeMap::new());
    }

    let raw = env
        .var(&reference.name)
        .ok_or_else(|| Error::not_found(StoreKind::Environment, &reference.name, None))?;

    let data: BTreeMap<String, String> = serde_json::from_str(&raw)
        .map_err(|e| Error::decode(format!("environment variable {}", reference.name), e))?;

    Ok(reference
        .keys
        .iter()
        .map(|key| (key.clone(), data.get(key).cloned().unwrap_or_default()))
        .collect())
}
