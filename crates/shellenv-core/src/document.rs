//! Read-only access to the observed composite and the context document

use serde_json::{Map, Value};

/// Source of the two documents a resolution session reads from.
pub trait DocumentStore: Send + Sync {
    /// The primary (observed composite) document
    fn primary(&self) -> &Value;

    /// The context entry stored under `key`, if any
    fn context(&self, key: &str) -> Option<&Value>;
}

/// Documents supplied with a single request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Documents {
    observed: Value,
    context: Map<String, Value>,
}

impl Documents {
    /// Create a document set with an observed composite and no context.
    pub fn new(observed: Value) -> Self {
        Self {
            observed,
            context: Map::new(),
        }
    }

    /// Attach a context document.
    ///
    /// Anything other than a mapping is treated as an empty context.
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = match context {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self
    }

    /// Add or replace a single context entry.
    pub fn insert_context(&mut self, key: impl Into<String>, value: Value) {
        self.context.insert(key.into(), value);
    }

    pub fn observed(&self) -> &Value {
        &self.observed
    }
}

impl DocumentStore for Documents {
    fn primary(&self) -> &Value {
        &self.observed
    }

    fn context(&self, key: &str) -> Option<&Value> {
        self.context.get(key)
    }
}
