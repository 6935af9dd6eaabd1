//! Error types for shellenv-core

use std::fmt;

/// Result type for shellenv-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// The document a path was resolved against
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathTarget {
    /// The observed composite (primary document)
    Observed,
    /// An entry of the context document
    Context(String),
}

impl fmt::Display for PathTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathTarget::Observed => write!(f, "observed composite"),
            PathTarget::Context(key) => write!(f, "context[{key}]"),
        }
    }
}

/// The kind of external store an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Secret,
    ConfigMap,
    Credential,
    Environment,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Secret => write!(f, "secret"),
            StoreKind::ConfigMap => write!(f, "config map"),
            StoreKind::Credential => write!(f, "credential bundle"),
            StoreKind::Environment => write!(f, "environment variable"),
        }
    }
}

/// Errors that can occur while resolving references and composing environments
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A path string or subpath was empty
    #[error("path must be set")]
    EmptyPath,

    /// A `Required` path had no value
    #[error("cannot get {target} value at {path}: no such field")]
    PathNotFound { target: PathTarget, path: String },

    /// A reference entry's type did not match its populated fields
    #[error("cannot resolve reference {key}: {reason}")]
    UnresolvableReference { key: String, reason: String },

    /// The external backend could not be reached
    #[error("{store} store unavailable: {message}")]
    StoreUnavailable { store: StoreKind, message: String },

    /// The named external resource does not exist
    #[error("{store} {name} not found")]
    StoreNotFound { store: StoreKind, name: String },

    /// Stored bytes were not the expected structured data
    #[error("cannot decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// A variable name that is not a shell identifier
    #[error("invalid environment variable name {name:?}")]
    InvalidVariableName { name: String },

    /// Function input failed validation
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// A per-entry failure, decorated with the entry's key
    #[error("cannot process reference {key}: {source}")]
    Reference {
        key: String,
        #[source]
        source: Box<Error>,
    },

    /// A bulk reference failure, decorated with the reference's name
    #[error("cannot process {name}: {source}")]
    BulkReference {
        name: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn unresolvable(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnresolvableReference {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn unavailable(store: StoreKind, message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            store,
            message: message.into(),
        }
    }

    /// Build a `StoreNotFound` for a namespaced resource (`namespace/name`).
    pub fn not_found(store: StoreKind, name: &str, namespace: Option<&str>) -> Self {
        let name = match namespace {
            Some(ns) if !ns.is_empty() => format!("{ns}/{name}"),
            _ => name.to_string(),
        };
        Self::StoreNotFound { store, name }
    }

    pub fn decode(what: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            what: what.into(),
            source,
        }
    }

    /// The underlying error with any key/name decoration removed.
    pub fn root(&self) -> &Error {
        match self {
            Error::Reference { source, .. } | Error::BulkReference { source, .. } => source.root(),
            other => other,
        }
    }

    /// The key of the reference entry this error was raised for, if any.
    pub fn reference_key(&self) -> Option<&str> {
        match self {
            Error::Reference { key, .. } => Some(key),
            Error::UnresolvableReference { key, .. } => Some(key),
            _ => None,
        }
    }
}
