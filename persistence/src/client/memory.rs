use crate::client::{
    DocumentId, DocumentStoreClientProvider, RequestTarget, StoredEnvelope, WriteOutcome,
    WriteResult,
};
use crate::collection::Document;
use crate::errors::{ErrorKind, PersistenceError, PersistenceResult};
use crossbeam_skiplist::SkipMap;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::sync::Arc;

static SHARED_STORE: Lazy<InMemoryClient> = Lazy::new(InMemoryClient::new);

/// Document store kept entirely in process memory.
///
/// Collections are created on first write. Documents are keyed by
/// `(document_kind, id)` inside their collection and carry a version that
/// starts at 1 and grows with every write. Routing values are accepted and
/// ignored.
///
/// Clones share the same data. [InMemoryClient::shared] returns a handle onto
/// the process-wide store used by the default client.
///
/// ```text
/// let client = DocumentStoreClient::new(InMemoryClient::new());
/// let target = RequestTarget::new("notes", "_doc");
/// client.index(&target, Some(&"1".into()), doc! { title: "hello" })?;
/// ```
#[derive(Clone, Default)]
pub struct InMemoryClient {
    inner: Arc<InMemoryClientInner>,
}

impl InMemoryClient {
    pub fn new() -> Self {
        InMemoryClient::default()
    }

    /// Handle onto the process-wide store.
    pub fn shared() -> Self {
        SHARED_STORE.clone()
    }

    /// Number of documents in `collection`, 0 when it does not exist.
    pub fn document_count(&self, collection: &str) -> usize {
        self.inner
            .collections
            .get(collection)
            .map(|it| it.documents.len())
            .unwrap_or(0)
    }
}

impl DocumentStoreClientProvider for InMemoryClient {
    fn get(
        &self,
        target: &RequestTarget,
        id: &DocumentId,
    ) -> PersistenceResult<Option<StoredEnvelope>> {
        let collection = self.inner.existing(&target.collection)?;
        Ok(collection.envelope(target, id))
    }

    fn multi_get(
        &self,
        target: &RequestTarget,
        ids: &[DocumentId],
    ) -> PersistenceResult<Vec<(DocumentId, Option<StoredEnvelope>)>> {
        let collection = self.inner.existing(&target.collection)?;
        Ok(ids
            .iter()
            .map(|id| (id.clone(), collection.envelope(target, id)))
            .collect())
    }

    fn exists(&self, target: &RequestTarget, id: &DocumentId) -> PersistenceResult<bool> {
        match self.inner.collections.get(&target.collection) {
            Some(collection) => Ok(collection.documents.contains_key(&key(target, id))),
            None => Ok(false),
        }
    }

    fn index(
        &self,
        target: &RequestTarget,
        id: Option<&DocumentId>,
        source: Document,
    ) -> PersistenceResult<WriteResult> {
        let collection = self.inner.get_or_create(&target.collection);
        let id = id.cloned().unwrap_or_else(DocumentId::generate);
        let _guard = collection.write_lock.lock();

        let key = key(target, &id);
        let (version, outcome) = match collection.documents.get(&key) {
            Some(entry) => (entry.value().version + 1, WriteOutcome::Updated),
            None => (1, WriteOutcome::Created),
        };
        collection
            .documents
            .insert(key, StoredDocument { version, source });

        Ok(write_result(target, id, version, outcome))
    }

    fn update(
        &self,
        target: &RequestTarget,
        id: &DocumentId,
        partial: &Document,
    ) -> PersistenceResult<Option<WriteResult>> {
        let collection = self.inner.existing(&target.collection)?;
        let _guard = collection.write_lock.lock();

        let key = key(target, id);
        let current = match collection.documents.get(&key) {
            Some(entry) => entry.value().clone(),
            None => return Ok(None),
        };

        let mut source = current.source;
        source.merge(partial);
        let version = current.version + 1;
        collection
            .documents
            .insert(key, StoredDocument { version, source });

        Ok(Some(write_result(
            target,
            id.clone(),
            version,
            WriteOutcome::Updated,
        )))
    }

    fn delete(
        &self,
        target: &RequestTarget,
        id: &DocumentId,
    ) -> PersistenceResult<Option<WriteResult>> {
        let collection = self.inner.existing(&target.collection)?;
        let _guard = collection.write_lock.lock();

        Ok(collection.documents.remove(&key(target, id)).map(|entry| {
            write_result(
                target,
                id.clone(),
                entry.value().version + 1,
                WriteOutcome::Deleted,
            )
        }))
    }

    fn create_collection(&self, collection: &str) -> PersistenceResult<()> {
        let mut created = false;
        self.inner
            .collections
            .entry(collection.to_string())
            .or_insert_with(|| {
                created = true;
                Arc::new(InMemoryCollection::default())
            });

        if created {
            Ok(())
        } else {
            log::error!("Collection {} already exists", collection);
            Err(PersistenceError::new(
                &format!("Collection '{}' already exists", collection),
                ErrorKind::CollectionAlreadyExists,
            ))
        }
    }

    fn delete_collection(&self, collection: &str) -> PersistenceResult<()> {
        match self.inner.collections.remove(collection) {
            Some(_) => Ok(()),
            None => Err(collection_not_found(collection)),
        }
    }

    fn collection_exists(&self, collection: &str) -> PersistenceResult<bool> {
        Ok(self.inner.collections.contains_key(collection))
    }

    fn refresh(&self, collection: &str) -> PersistenceResult<()> {
        // writes are visible immediately
        self.inner.existing(collection).map(|_| ())
    }
}

#[derive(Default)]
struct InMemoryClientInner {
    collections: DashMap<String, Arc<InMemoryCollection>>,
}

impl InMemoryClientInner {
    fn existing(&self, name: &str) -> PersistenceResult<Arc<InMemoryCollection>> {
        self.collections
            .get(name)
            .map(|it| it.value().clone())
            .ok_or_else(|| collection_not_found(name))
    }

    fn get_or_create(&self, name: &str) -> Arc<InMemoryCollection> {
        self.collections
            .entry(name.to_string())
            .or_insert_with(|| {
                log::debug!("Creating collection {} on first write", name);
                Arc::new(InMemoryCollection::default())
            })
            .value()
            .clone()
    }
}

#[derive(Default)]
struct InMemoryCollection {
    documents: SkipMap<(String, String), StoredDocument>,
    write_lock: Mutex<()>,
}

impl InMemoryCollection {
    fn envelope(&self, target: &RequestTarget, id: &DocumentId) -> Option<StoredEnvelope> {
        self.documents.get(&key(target, id)).map(|entry| {
            let stored = entry.value();
            StoredEnvelope::new(
                id.clone(),
                &target.collection,
                &target.document_kind,
                stored.version,
                stored.source.clone(),
            )
        })
    }
}

#[derive(Clone)]
struct StoredDocument {
    version: u64,
    source: Document,
}

fn key(target: &RequestTarget, id: &DocumentId) -> (String, String) {
    (target.document_kind.clone(), id.as_str().to_string())
}

fn write_result(
    target: &RequestTarget,
    id: DocumentId,
    version: u64,
    outcome: WriteOutcome,
) -> WriteResult {
    WriteResult {
        id,
        collection: target.collection.clone(),
        document_kind: target.document_kind.clone(),
        version,
        outcome,
    }
}

fn collection_not_found(name: &str) -> PersistenceError {
    log::error!("Collection {} does not exist", name);
    PersistenceError::new(
        &format!("Collection '{}' does not exist", name),
        ErrorKind::CollectionNotFound,
    )
}
