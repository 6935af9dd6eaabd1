//! Env command implementation

use std::path::Path;

use crate::error::Result;
use crate::request::Request;

use super::compose_request;

/// Run the env command: print the composed environment.
pub fn run_env(request_path: &Path, json: bool) -> Result<()> {
    let request = Request::load(request_path)?;
    let env = compose_request(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&env)?);
    } else {
        for (key, value) in &env {
            println!("{key}={value}");
        }
    }

    Ok(())
}
