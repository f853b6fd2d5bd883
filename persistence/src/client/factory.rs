use crate::client::{DocumentStoreClient, InMemoryClient};
use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Builds the client a repository uses when none was configured.
pub type ClientFactory = Arc<dyn Fn() -> DocumentStoreClient + Send + Sync>;

static DEFAULT_CLIENT_FACTORY: Lazy<Atomic<ClientFactory>> =
    Lazy::new(|| atomic(builtin_factory()));

fn builtin_factory() -> ClientFactory {
    Arc::new(|| DocumentStoreClient::new(InMemoryClient::shared()))
}

/// Returns a new client from the process-wide factory.
///
/// Unless replaced with [set_default_client_factory], every call hands out a
/// fresh handle onto the shared in-memory store.
pub fn default_client() -> DocumentStoreClient {
    let factory = DEFAULT_CLIENT_FACTORY.read_with(|it| it.clone());
    factory()
}

/// Replaces the process-wide factory.
///
/// Repositories that already resolved their client keep it; the new factory
/// applies to later defaults only.
pub fn set_default_client_factory<F>(factory: F)
where
    F: Fn() -> DocumentStoreClient + Send + Sync + 'static,
{
    log::debug!("Replacing the default client factory");
    DEFAULT_CLIENT_FACTORY.write_with(|it| *it = Arc::new(factory));
}

/// Restores the built-in factory.
pub fn reset_default_client_factory() {
    log::debug!("Restoring the built-in default client factory");
    DEFAULT_CLIENT_FACTORY.write_with(|it| *it = builtin_factory());
}
