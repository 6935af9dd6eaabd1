//! Reference resolution and environment composition for shell invocations
//!
//! Resolves named values from literals, paths into the observed composite,
//! paths into the context document, and external stores (secrets, config
//! maps, credential bundles, environment blobs), then merges them into one
//! [`Environment`].
//!
//! # Example
//!
//! ```
//! use shellenv_core::{Documents, FieldRef, MemoryStore, ReferenceEntry, ResolutionPolicy, Stores, compose};
//! use serde_json::json;
//!
//! let docs = Documents::new(json!({"spec": {"foo": "bar"}}));
//! let store = MemoryStore::new();
//! let entries = [
//!     ReferenceEntry::value_ref("X", "spec.foo"),
//!     ReferenceEntry::field_ref("Y", FieldRef {
//!         path: "spec.bad".into(),
//!         policy: Some(ResolutionPolicy::Optional),
//!         default_value: Some("d".into()),
//!     }),
//! ];
//!
//! let env = compose(&entries, &[], &docs, &Stores::from_backend(&store)).unwrap();
//! assert_eq!(env.get("X"), Some("bar"));
//! assert_eq!(env.get("Y"), Some("d"));
//! ```

pub mod compose;
pub mod document;
pub mod error;
pub mod export;
pub mod parameters;
pub mod path;
pub mod policy;
pub mod reference;
pub mod stores;

pub use compose::{Environment, compose, resolve_entry};
pub use document::{DocumentStore, Documents};
pub use error::{Error, PathTarget, Result, StoreKind};
pub use export::{export_statement, is_valid_name, render_exports, render_script};
pub use parameters::ShellParameters;
pub use path::{PathExpression, PathSegment};
pub use policy::{ResolutionPolicy, resolve};
pub use reference::{
    FieldRef, FieldSelector, ReferenceEntry, ReferenceType, ResolvedSource, classify,
};
pub use stores::{
    BulkReference, ConfigMapRef, ConfigMapStore, CredentialRef, CredentialStore, EnvSource,
    EnvVarsRef, LazyStore, MemoryStore, ProcessEnv, ScriptsConfigMapRef, SecretRef, SecretStore,
    Stores, load_scripts,
};
