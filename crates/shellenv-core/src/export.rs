//! Shell export rendering

use std::sync::LazyLock;

use regex::Regex;

use crate::compose::Environment;
use crate::error::{Error, Result};

static SHELL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Whether `name` can be exported by a POSIX shell.
pub fn is_valid_name(name: &str) -> bool {
    SHELL_NAME.is_match(name)
}

/// Fail with `InvalidVariableName` unless `name` is a shell identifier.
pub(crate) fn check_name(name: &str) -> Result<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(Error::InvalidVariableName {
            name: name.to_string(),
        })
    }
}

/// Quote `value` for use inside double quotes.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// `export KEY="value";`
///
/// The key is emitted unquoted, so anything but a shell identifier is
/// rejected.
pub fn export_statement(key: &str, value: &str) -> Result<String> {
    check_name(key)?;
    Ok(format!("export {}={};", key, quote(value)))
}

/// Export statements for every variable, in key order.
pub fn render_exports(env: &Environment) -> Result<String> {
    env.iter()
        .map(|(key, value)| export_statement(key, value))
        .collect()
}

/// The exports followed by `command`, ready to hand to a shell.
pub fn render_script(env: &Environment, command: &str) -> Result<String> {
    Ok(format!("{}{}", render_exports(env)?, command))
}
