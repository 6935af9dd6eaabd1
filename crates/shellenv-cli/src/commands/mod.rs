//! Command implementations

mod env;
mod get;
mod script;
mod scripts;

pub use env::run_env;
pub use get::run_get;
pub use script::run_script;
pub use scripts::run_scripts;

use shellenv_core::{Environment, MemoryStore, ProcessEnv, Stores, compose};

use crate::error::Result;
use crate::request::Request;

/// Compose the environment described by `request`.
pub(crate) fn compose_request(request: &Request) -> Result<Environment> {
    let store = request.store();
    let stores = session_stores(request, &store);
    let params = &request.parameters;
    let env = compose(
        &params.shell_env_vars,
        &params.bulk_references(),
        &request.documents(),
        &stores,
    )?;
    Ok(env)
}

pub(crate) fn session_stores<'a>(request: &Request, store: &'a MemoryStore) -> Stores<'a> {
    let stores = Stores::from_backend(store);
    if request.has_environment() {
        stores
    } else {
        stores.with_environment(&ProcessEnv)
    }
}
