use crate::client::{DocumentId, RequestTarget, StoredEnvelope, WriteResult};
use crate::collection::Document;
use crate::errors::PersistenceResult;
use std::fmt::{Debug, Formatter};
use std::ops::Deref;
use std::sync::Arc;

/// Contract of a document store client.
///
/// Implementations perform the actual I/O against a store. The repository
/// never retries, never imposes timeouts and never rewrites errors coming
/// from a provider: whatever a provider returns reaches the caller as is.
///
/// Absence is part of the happy path: `get`, `update` and `delete` answer
/// `Ok(None)` for a missing document, and `multi_get` pairs each id with
/// `None` when it does not exist. A missing collection is an error for every
/// operation except `exists` and `collection_exists`.
pub trait DocumentStoreClientProvider: Send + Sync {
    /// Fetches one document.
    fn get(&self, target: &RequestTarget, id: &DocumentId)
        -> PersistenceResult<Option<StoredEnvelope>>;

    /// Fetches many documents in one round-trip.
    ///
    /// The result pairs every requested id with its envelope. The order of
    /// the pairs is not significant.
    fn multi_get(
        &self,
        target: &RequestTarget,
        ids: &[DocumentId],
    ) -> PersistenceResult<Vec<(DocumentId, Option<StoredEnvelope>)>>;

    fn exists(&self, target: &RequestTarget, id: &DocumentId) -> PersistenceResult<bool>;

    /// Stores `source`, generating an id when `id` is `None`.
    fn index(
        &self,
        target: &RequestTarget,
        id: Option<&DocumentId>,
        source: Document,
    ) -> PersistenceResult<WriteResult>;

    /// Merges `partial` into the stored source.
    fn update(
        &self,
        target: &RequestTarget,
        id: &DocumentId,
        partial: &Document,
    ) -> PersistenceResult<Option<WriteResult>>;

    fn delete(&self, target: &RequestTarget, id: &DocumentId)
        -> PersistenceResult<Option<WriteResult>>;

    fn create_collection(&self, collection: &str) -> PersistenceResult<()>;

    fn delete_collection(&self, collection: &str) -> PersistenceResult<()>;

    fn collection_exists(&self, collection: &str) -> PersistenceResult<bool>;

    /// Makes recent writes visible to lookups.
    fn refresh(&self, collection: &str) -> PersistenceResult<()>;
}

/// Shared handle to a [DocumentStoreClientProvider].
///
/// Cloning is cheap and clones share the provider. Two handles are the
/// "same client" when [DocumentStoreClient::ptr_eq] holds.
#[derive(Clone)]
pub struct DocumentStoreClient {
    inner: Arc<dyn DocumentStoreClientProvider>,
}

impl DocumentStoreClient {
    pub fn new<T: DocumentStoreClientProvider + 'static>(inner: T) -> Self {
        DocumentStoreClient {
            inner: Arc::new(inner),
        }
    }

    /// Returns `true` when both handles point at the same provider instance.
    pub fn ptr_eq(&self, other: &DocumentStoreClient) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Deref for DocumentStoreClient {
    type Target = Arc<dyn DocumentStoreClientProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Debug for DocumentStoreClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentStoreClient({:p})", Arc::as_ptr(&self.inner))
    }
}
