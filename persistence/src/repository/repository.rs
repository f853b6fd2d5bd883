use crate::client::{DocumentId, DocumentStoreClient, RequestOptions, StoredEnvelope, WriteResult};
use crate::collection::Document;
use crate::common::Convertible;
use crate::errors::{PersistenceError, PersistenceResult};
use crate::repository::lookup::{self, Found, LookupRequest};
use crate::repository::{serialization, store, ObjectClass, Record, RepositoryConfig};
use std::sync::Arc;

/// A repository definition: one shared configuration plus the lookup,
/// mapping and write operations built on it.
///
/// # Purpose
///
/// A definition is a unit struct implementing `Repository`, normally through
/// `#[derive(Repository)]`. The struct carries no data; everything lives in
/// the [RepositoryConfig] returned by [Repository::config], created on first
/// access and kept for the life of the process.
///
/// # Two access paths
///
/// Every operation takes `&self`, so it can be called on the type-level value
/// (`NoteRepository.find(..)`) or on the shared instance
/// (`NoteRepository::instance().find(..)`). Both resolve to the same
/// configuration. Methods an application adds in its own `impl` block work
/// the same way.
///
/// # Examples
///
/// ```rust,ignore
/// use persistence::repository::Repository;
/// use persistence_derive::Repository;
///
/// #[derive(Repository)]
/// #[repository(collection = "notes")]
/// pub struct NoteRepository;
///
/// impl NoteRepository {
///     pub fn titles(&self, ids: &[&str]) -> PersistenceResult<Vec<Option<Record>>> {
///         self.find_many(ids.iter().copied())
///     }
/// }
///
/// let saved = NoteRepository.save(&doc! { title: "first" })?;
/// assert!(NoteRepository::instance().exists(&saved.id)?);
/// NoteRepository::instance().set_collection_name(Some("archive"));
/// assert_eq!(&*NoteRepository.collection_name(), "archive");
/// ```
pub trait Repository: Sized + Send + Sync + 'static {
    /// Name of the definition; the default collection name is derived from it.
    fn definition_name() -> &'static str;

    /// The definition's configuration, created on first access.
    fn config() -> &'static RepositoryConfig;

    /// The shared instance.
    fn instance() -> &'static Self;

    /// Always fails: definitions are used through [Repository::instance].
    ///
    /// # Errors
    ///
    /// [ErrorKind::InstantiationNotAllowed](crate::errors::ErrorKind::InstantiationNotAllowed).
    fn new() -> PersistenceResult<Self> {
        let err = PersistenceError::instantiation_not_allowed(Self::definition_name());
        log::error!("{}", err);
        Err(err)
    }

    fn client(&self) -> DocumentStoreClient {
        Self::config().client()
    }

    fn use_client(&self, client: Option<DocumentStoreClient>) -> DocumentStoreClient {
        Self::config().use_client(client)
    }

    fn set_client(&self, client: Option<DocumentStoreClient>) {
        Self::config().set_client(client)
    }

    fn collection_name(&self) -> Arc<str> {
        Self::config().collection_name()
    }

    fn use_collection_name(&self, name: Option<&str>) -> Arc<str> {
        Self::config().use_collection_name(name)
    }

    fn set_collection_name(&self, name: Option<&str>) {
        Self::config().set_collection_name(name)
    }

    fn document_kind(&self) -> Arc<str> {
        Self::config().document_kind()
    }

    fn use_document_kind(&self, kind: Option<&str>) -> Arc<str> {
        Self::config().use_document_kind(kind)
    }

    fn set_document_kind(&self, kind: Option<&str>) {
        Self::config().set_document_kind(kind)
    }

    fn object_class(&self) -> Option<ObjectClass> {
        Self::config().object_class()
    }

    fn use_object_class(&self, object_class: Option<ObjectClass>) -> Option<ObjectClass> {
        Self::config().use_object_class(object_class)
    }

    fn set_object_class(&self, object_class: Option<ObjectClass>) {
        Self::config().set_object_class(object_class)
    }

    /// Checks whether a document with `id` exists.
    ///
    /// A missing document, or a missing collection, is `Ok(false)`. Client
    /// failures are returned as they are.
    fn exists(&self, id: impl Into<DocumentId>) -> PersistenceResult<bool> {
        self.exists_with(id, &RequestOptions::default())
    }

    fn exists_with(
        &self,
        id: impl Into<DocumentId>,
        options: &RequestOptions,
    ) -> PersistenceResult<bool> {
        lookup::exists(Self::config(), &id.into(), options)
    }

    /// Finds one or many documents.
    ///
    /// # Arguments
    ///
    /// * `request` - a single id, or a `Vec`, array, slice or tuple of ids
    ///
    /// # Behavior
    ///
    /// - A single id yields [Found::One], or fails with
    ///   `ErrorKind::DocumentNotFound` naming the id, collection and kind.
    /// - Many ids are fetched with one multi-get and yield [Found::Many]:
    ///   one slot per requested id, in request order, `None` where the
    ///   document does not exist. Partial misses never fail.
    /// - A missing collection fails with the client's error.
    fn find(&self, request: impl Into<LookupRequest>) -> PersistenceResult<Found> {
        self.find_with(request, &RequestOptions::default())
    }

    /// [Repository::find] with per-call overrides. The overrides apply to
    /// every id of the request and are not stored.
    fn find_with(
        &self,
        request: impl Into<LookupRequest>,
        options: &RequestOptions,
    ) -> PersistenceResult<Found> {
        lookup::find(Self::config(), request.into(), options)
    }

    fn find_one(&self, id: impl Into<DocumentId>) -> PersistenceResult<Record> {
        lookup::find_one(Self::config(), &id.into(), &RequestOptions::default())
    }

    fn find_many<I, T>(&self, ids: I) -> PersistenceResult<Vec<Option<Record>>>
    where
        I: IntoIterator<Item = T>,
        T: Into<DocumentId>,
    {
        let ids: Vec<DocumentId> = ids.into_iter().map(Into::into).collect();
        lookup::find_many(Self::config(), &ids, &RequestOptions::default())
    }

    /// The field mapping stored for `object`.
    fn serialize<T: Convertible>(&self, object: &T) -> PersistenceResult<Document> {
        serialization::serialize(object)
    }

    /// Materializes `envelope` with the configured object class, or returns
    /// its source mapping when there is none.
    fn deserialize(&self, envelope: &StoredEnvelope) -> PersistenceResult<Record> {
        serialization::deserialize(Self::config().object_class().as_ref(), envelope)
    }

    /// [Repository::deserialize] for an envelope in its raw document form.
    fn deserialize_raw(&self, raw: Document) -> PersistenceResult<Record> {
        let envelope = StoredEnvelope::try_from(raw)?;
        self.deserialize(&envelope)
    }

    /// Serializes and stores `object`.
    ///
    /// The id is taken from the object's `id` or `_id` field when present,
    /// otherwise the store generates one.
    fn save<T: Convertible>(&self, object: &T) -> PersistenceResult<WriteResult> {
        self.save_with(object, &RequestOptions::default())
    }

    /// [Repository::save] with per-call overrides; `options.id()` wins over
    /// the object's own id.
    fn save_with<T: Convertible>(
        &self,
        object: &T,
        options: &RequestOptions,
    ) -> PersistenceResult<WriteResult> {
        store::save(Self::config(), object, options)
    }

    /// Merges `partial` into the stored document.
    fn update(&self, id: impl Into<DocumentId>, partial: &Document) -> PersistenceResult<WriteResult> {
        self.update_with(id, partial, &RequestOptions::default())
    }

    fn update_with(
        &self,
        id: impl Into<DocumentId>,
        partial: &Document,
        options: &RequestOptions,
    ) -> PersistenceResult<WriteResult> {
        store::update(Self::config(), &id.into(), partial, options)
    }

    fn delete(&self, id: impl Into<DocumentId>) -> PersistenceResult<WriteResult> {
        self.delete_with(id, &RequestOptions::default())
    }

    fn delete_with(
        &self,
        id: impl Into<DocumentId>,
        options: &RequestOptions,
    ) -> PersistenceResult<WriteResult> {
        store::delete(Self::config(), &id.into(), options)
    }

    fn create_collection(&self) -> PersistenceResult<()> {
        let config = Self::config();
        config.client().create_collection(&config.collection_name())
    }

    fn delete_collection(&self) -> PersistenceResult<()> {
        let config = Self::config();
        config.client().delete_collection(&config.collection_name())
    }

    fn collection_exists(&self) -> PersistenceResult<bool> {
        let config = Self::config();
        config.client().collection_exists(&config.collection_name())
    }

    fn refresh_collection(&self) -> PersistenceResult<()> {
        let config = Self::config();
        config.client().refresh(&config.collection_name())
    }
}
