//! Get command implementation

use std::path::Path;

use shellenv_core::{PathExpression, ResolutionPolicy, resolve};

use crate::error::Result;
use crate::request::Request;

/// Run the get command: resolve one path and print its value.
pub fn run_get(
    request_path: &Path,
    path: &str,
    optional: bool,
    default: Option<&str>,
) -> Result<()> {
    let request = Request::load(request_path)?;
    let expr = PathExpression::parse(path)?;
    let policy = if optional {
        ResolutionPolicy::Optional
    } else {
        ResolutionPolicy::Required
    };

    let value = resolve(&request.documents(), &expr, policy, default.unwrap_or_default())?;
    println!("{value}");
    Ok(())
}
