//! Create-once store handle

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use super::{ConfigMapStore, CredentialStore, SecretStore};
use crate::error::Result;

type Connect<S> = Box<dyn Fn() -> Result<S> + Send + Sync>;

/// A backend handle that is connected on first use and reused afterwards.
///
/// The host creates one `LazyStore` at startup and passes it to every
/// session. Only the handle is cached, never looked-up values. A failed
/// connection is not cached, so the next call tries again; `connect` should
/// report such failures as `StoreUnavailable`.
pub struct LazyStore<S> {
    connect: Connect<S>,
    handle: OnceLock<S>,
}

impl<S> LazyStore<S> {
    pub fn new(connect: impl Fn() -> Result<S> + Send + Sync + 'static) -> Self {
        Self {
            connect: Box::new(connect),
            handle: OnceLock::new(),
        }
    }

    /// The connected backend, connecting first if needed.
    pub fn handle(&self) -> Result<&S> {
        if let Some(store) = self.handle.get() {
            return Ok(store);
        }
        let store = (self.connect)()?;
        tracing::debug!("Store backend connected");
        Ok(self.handle.get_or_init(|| store))
    }

    pub fn is_connected(&self) -> bool {
        self.handle.get().is_some()
    }
}

impl<S> fmt::Debug for LazyStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LazyStore")
            .field("connected", &self.is_connected())
            .finish()
    }
}

impl<S: SecretStore> SecretStore for LazyStore<S> {
    fn get_secret(&self, name: &str, namespace: &str, key: &str) -> Result<Option<Vec<u8>>> {
        self.handle()?.get_secret(name, namespace, key)
    }
}

impl<S: ConfigMapStore> ConfigMapStore for LazyStore<S> {
    fn get_config_map(&self, name: &str, namespace: &str) -> Result<BTreeMap<String, String>> {
        self.handle()?.get_config_map(name, namespace)
    }
}

impl<S: CredentialStore> CredentialStore for LazyStore<S> {
    fn credential_data(&self, name: &str) -> BTreeMap<String, Vec<u8>> {
        match self.handle() {
            Ok(store) => store.credential_data(name),
            Err(e) => {
                tracing::warn!(error = %e, "Credential backend unavailable");
                BTreeMap::new()
            }
        }
    }
}
