//! Script command implementation

use std::path::Path;

use shellenv_core::render_script;

use crate::error::Result;
use crate::request::Request;

use super::compose_request;

/// Run the script command: print exports followed by the shell command.
pub fn run_script(request_path: &Path) -> Result<()> {
    let request = Request::load(request_path)?;
    let command = request.parameters.command(&request.documents())?;
    let env = compose_request(&request)?;

    tracing::debug!(variables = env.len(), "Rendering shell script");
    println!("{}", render_script(&env, &command)?);
    Ok(())
}
