//! Fallback policy for path lookups

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::document::DocumentStore;
use crate::error::{Error, PathTarget, Result};
use crate::path::{self, PathExpression};

/// What to do when a referenced path has no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResolutionPolicy {
    /// A missing path is an error
    #[default]
    Required,
    /// A missing path yields the default value
    Optional,
}

impl fmt::Display for ResolutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionPolicy::Required => write!(f, "Required"),
            ResolutionPolicy::Optional => write!(f, "Optional"),
        }
    }
}

/// Resolve `expr` against `docs`, applying `policy` when nothing is found.
///
/// A context key that is absent from the context document counts as
/// "not found" rather than as a malformed path.
pub fn resolve(
    docs: &dyn DocumentStore,
    expr: &PathExpression,
    policy: ResolutionPolicy,
    default_value: &str,
) -> Result<String> {
    if expr.subpath().is_empty() {
        return Err(Error::EmptyPath);
    }

    let (target, found) = match expr.context_key() {
        Some(key) => (
            PathTarget::Context(key.to_string()),
            docs.context(key).and_then(|doc| path::get(doc, expr.subpath())),
        ),
        None => (
            PathTarget::Observed,
            path::get(docs.primary(), expr.subpath()),
        ),
    };

    match (found, policy) {
        (Some(value), _) => Ok(value),
        (None, ResolutionPolicy::Optional) => {
            tracing::debug!(path = %expr, "Path not found, using default value");
            Ok(default_value.to_string())
        }
        (None, ResolutionPolicy::Required) => Err(Error::PathNotFound {
            target,
            path: expr.subpath().to_string(),
        }),
    }
}
