//! Path parsing and value extraction
//!
//! Paths select a value either from the observed composite or from one entry
//! of the context document.
//!
//! # Path Syntax
//!
//! - Primary document: `spec.database.host`
//! - Context document: `context[apiextensions.crossplane.io/environment].region`
//! - Array indexing: `spec.items[0].name` or `spec.items.0.name`
//! - Bracketed keys: `metadata.labels[app.kubernetes.io/name]`
//!
//! # Examples
//!
//! ```
//! use shellenv_core::path::{PathExpression, get};
//! use serde_json::json;
//!
//! let expr = PathExpression::parse("context[apiextensions.crossplane.io/foo].bar.baz").unwrap();
//! assert_eq!(expr.context_key(), Some("apiextensions.crossplane.io/foo"));
//! assert_eq!(expr.subpath(), "bar.baz");
//!
//! let doc = json!({"spec": {"replicas": 3}});
//! assert_eq!(get(&doc, "spec.replicas"), Some("3".to_string()));
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Number, Value};

use crate::error::{Error, Result};

static CONTEXT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^context\[(.+?)\]\.(.+)$").unwrap());

/// A parsed path, targeting either the primary document or a context entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathExpression {
    context_key: Option<String>,
    subpath: String,
}

impl PathExpression {
    /// Parse a raw path string.
    ///
    /// `context[<key>].<subpath>` targets the context entry `<key>`; anything
    /// else is a subpath into the primary document. Only emptiness is
    /// rejected here, malformed subpaths simply fail to match anything.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(Error::EmptyPath);
        }

        if let Some(caps) = CONTEXT_PATH.captures(raw) {
            return Ok(Self::context(&caps[1], &caps[2]));
        }

        Ok(Self::primary(raw))
    }

    /// A path into the primary document
    pub fn primary(subpath: impl Into<String>) -> Self {
        Self {
            context_key: None,
            subpath: subpath.into(),
        }
    }

    /// A path into the context entry `key`, which must not be empty
    pub(crate) fn context(key: impl Into<String>, subpath: impl Into<String>) -> Self {
        Self {
            context_key: Some(key.into()),
            subpath: subpath.into(),
        }
    }

    pub fn context_key(&self) -> Option<&str> {
        self.context_key.as_deref()
    }

    pub fn subpath(&self) -> &str {
        &self.subpath
    }
}

impl FromStr for PathExpression {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for PathExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context_key {
            Some(key) => write!(f, "context[{}].{}", key, self.subpath),
            None => write!(f, "{}", self.subpath),
        }
    }
}

/// A segment of a subpath - either a key or an array index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// A key in a mapping (e.g., "database" in "config.database")
    Key(String),
    /// An index in a sequence (e.g., 0 in `items[0]`)
    Index(usize),
}

/// Split a subpath into segments.
///
/// Returns `None` for malformed input: empty segments (`a..b`, `.a`, `a.`),
/// unterminated or empty brackets, and text directly after a closing bracket.
///
/// ```
/// use shellenv_core::path::{parse_segments, PathSegment};
///
/// assert_eq!(
///     parse_segments("items[0].name"),
///     Some(vec![
///         PathSegment::Key("items".to_string()),
///         PathSegment::Index(0),
///         PathSegment::Key("name".to_string()),
///     ])
/// );
/// assert_eq!(parse_segments("a..b"), None);
/// ```
pub fn parse_segments(subpath: &str) -> Option<Vec<PathSegment>> {
    let mut segments = Vec::new();
    let mut current_key = String::new();
    let mut after_bracket = false;
    let mut chars = subpath.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '.' => {
                if current_key.is_empty() && !after_bracket {
                    return None;
                }
                if !current_key.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut current_key)));
                }
                after_bracket = false;
                chars.peek()?;
            }
            '[' => {
                if !current_key.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut current_key)));
                }
                let mut inner = String::new();
                let mut closed = false;
                for ch in chars.by_ref() {
                    if ch == ']' {
                        closed = true;
                        break;
                    }
                    inner.push(ch);
                }
                if !closed || inner.is_empty() {
                    return None;
                }
                segments.push(match inner.parse::<usize>() {
                    Ok(index) => PathSegment::Index(index),
                    Err(_) => PathSegment::Key(inner),
                });
                after_bracket = true;
                if !matches!(chars.peek(), None | Some('.') | Some('[')) {
                    return None;
                }
            }
            ']' => return None,
            _ => current_key.push(ch),
        }
    }

    if !current_key.is_empty() {
        segments.push(PathSegment::Key(current_key));
    }

    if segments.is_empty() {
        None
    } else {
        Some(segments)
    }
}

/// Walk `segments` through `value`.
///
/// A key segment that is a number also indexes into sequences, so
/// `items.0` and `items[0]` are equivalent.
pub fn get_at_path<'a>(value: &'a Value, segments: &[PathSegment]) -> Option<&'a Value> {
    let Some((first, rest)) = segments.split_first() else {
        return Some(value);
    };

    let next_value = match (first, value) {
        (PathSegment::Key(key), Value::Object(map)) => map.get(key)?,
        (PathSegment::Key(key), Value::Array(arr)) => arr.get(key.parse::<usize>().ok()?)?,
        (PathSegment::Index(idx), Value::Array(arr)) => arr.get(*idx)?,
        _ => return None,
    };

    get_at_path(next_value, rest)
}

/// Render a document value as an environment string.
///
/// Strings are returned verbatim, numbers and booleans in their natural
/// textual form, null as the empty string, and mappings or sequences as
/// compact JSON. A float with no fractional part renders like an integer,
/// so `1.0` becomes `1`.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => render_number(n),
        other => other.to_string(),
    }
}

// Integral floats up to 2^53, where f64 still counts exactly, drop the `.0`.
fn render_number(n: &Number) -> String {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() <= MAX_EXACT => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

/// Get the value at `subpath` in `doc`, rendered as a string.
///
/// Returns `None` when any segment is absent, of the wrong shape, or the
/// subpath is malformed. Never fails.
pub fn get(doc: &Value, subpath: &str) -> Option<String> {
    let segments = parse_segments(subpath)?;
    get_at_path(doc, &segments).map(render_value)
}
