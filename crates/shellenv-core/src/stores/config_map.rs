//! Config map adapter and script loading

use std::collections::BTreeMap;

use super::{ConfigMapRef, ConfigMapStore, ScriptsConfigMapRef, select_keys};
use crate::error::Result;

/// Copy the requested entries of a config map.
///
/// A missing config map fails; a missing entry yields the empty string.
pub fn fetch(
    store: &dyn ConfigMapStore,
    reference: &ConfigMapRef,
) -> Result<BTreeMap<String, String>> {
    let data = store.get_config_map(&reference.name, &reference.namespace)?;
    Ok(select_keys(data, &reference.keys))
}

/// Load named scripts from config maps, split into lines.
///
/// A config map that cannot be fetched and a script name it does not
/// contain are both logged and skipped. Later config maps replace scripts
/// of the same name loaded from earlier ones.
pub fn load_scripts(
    store: &dyn ConfigMapStore,
    references: &[ScriptsConfigMapRef],
) -> BTreeMap<String, Vec<String>> {
    let mut scripts = BTreeMap::new();

    for reference in references {
        let data = match store.get_config_map(&reference.name, &reference.namespace) {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(
                    config_map = %reference.name,
                    namespace = %reference.namespace,
                    error = %e,
                    "Unable to get shell scripts from config map, skipping"
                );
                continue;
            }
        };

        for script_name in &reference.script_names {
            match data.get(script_name) {
                Some(body) => {
                    let lines = body.split('\n').map(str::to_string).collect();
                    scripts.insert(script_name.clone(), lines);
                }
                None => tracing::warn!(
                    config_map = %reference.name,
                    script = %script_name,
                    "Script not present in config map, skipping"
                ),
            }
        }
    }

    scripts
}
