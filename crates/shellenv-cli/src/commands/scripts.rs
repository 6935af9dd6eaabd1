//! Scripts command implementation

use std::path::Path;

use shellenv_core::load_scripts;

use crate::error::Result;
use crate::request::Request;

/// Run the scripts command: print loaded scripts as a JSON object of lines.
pub fn run_scripts(request_path: &Path) -> Result<()> {
    let request = Request::load(request_path)?;
    let store = request.store();
    let scripts = load_scripts(&store, &request.parameters.shell_scripts_config_maps_ref);

    println!("{}", serde_json::to_string_pretty(&scripts)?);
    Ok(())
}
