//! Configuration state of a repository definition.

use crate::client::{default_client, DocumentStoreClient};
use crate::common::{atomic, get_or_init, Atomic, WriteExecutor, DEFAULT_DOCUMENT_KIND};
use crate::repository::ObjectClass;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Client, collection, document kind and object class of one repository
/// definition.
///
/// Every attribute comes with three accessors:
///
/// * a read (`client()`) that lazily stores the default on first use, so
///   repeated reads return the same value;
/// * a read-or-set (`use_client(..)`) that stores a non-empty argument and
///   ignores an empty one;
/// * a plain setter (`set_client(..)`) where empty means "back to default".
///
/// The object class is the exception: it has no default, `use_object_class`
/// and `set_object_class` both store `None` as given.
///
/// Clones share the same state.
///
/// # Examples
///
/// ```rust,ignore
/// let config = RepositoryConfig::new("NoteRepository");
/// assert_eq!(&*config.collection_name(), "noterepository");
///
/// config.use_collection_name(Some("notes"));
/// config.use_collection_name(None);
/// assert_eq!(&*config.collection_name(), "notes");
///
/// config.set_collection_name(None);
/// assert_eq!(&*config.collection_name(), "noterepository");
/// ```
#[derive(Clone)]
pub struct RepositoryConfig {
    inner: Arc<RepositoryConfigInner>,
}

impl RepositoryConfig {
    /// Creates the configuration of the definition called `definition_name`.
    pub fn new(definition_name: &str) -> Self {
        RepositoryConfig {
            inner: Arc::new(RepositoryConfigInner::new(definition_name)),
        }
    }

    pub fn definition_name(&self) -> &str {
        &self.inner.definition_name
    }

    /// The configured client, [default_client] if none was set.
    pub fn client(&self) -> DocumentStoreClient {
        self.inner.client()
    }

    /// Stores `client` if given and returns the current client.
    pub fn use_client(&self, client: Option<DocumentStoreClient>) -> DocumentStoreClient {
        if let Some(client) = client {
            self.inner.store_client(client);
        }
        self.inner.client()
    }

    /// Stores `client`, or a freshly built default client when `None`.
    pub fn set_client(&self, client: Option<DocumentStoreClient>) {
        let client = client.unwrap_or_else(default_client);
        self.inner.store_client(client);
    }

    /// The collection name; defaults to the lower-cased definition name.
    pub fn collection_name(&self) -> Arc<str> {
        self.inner.collection_name()
    }

    pub fn use_collection_name(&self, name: Option<&str>) -> Arc<str> {
        if let Some(name) = name.filter(|it| !it.is_empty()) {
            self.inner.store_collection_name(Arc::from(name));
        }
        self.inner.collection_name()
    }

    pub fn set_collection_name(&self, name: Option<&str>) {
        let name = match name.filter(|it| !it.is_empty()) {
            Some(name) => Arc::from(name),
            None => self.inner.default_collection_name(),
        };
        self.inner.store_collection_name(name);
    }

    /// The document kind; defaults to `"_doc"`.
    pub fn document_kind(&self) -> Arc<str> {
        self.inner.document_kind()
    }

    pub fn use_document_kind(&self, kind: Option<&str>) -> Arc<str> {
        if let Some(kind) = kind.filter(|it| !it.is_empty()) {
            self.inner.store_document_kind(Arc::from(kind));
        }
        self.inner.document_kind()
    }

    pub fn set_document_kind(&self, kind: Option<&str>) {
        let kind = match kind.filter(|it| !it.is_empty()) {
            Some(kind) => Arc::from(kind),
            None => Arc::from(DEFAULT_DOCUMENT_KIND),
        };
        self.inner.store_document_kind(kind);
    }

    /// The object class documents are materialized into, if any.
    pub fn object_class(&self) -> Option<ObjectClass> {
        self.inner.object_class()
    }

    /// Stores `object_class`, including `None`, and returns it.
    pub fn use_object_class(&self, object_class: Option<ObjectClass>) -> Option<ObjectClass> {
        self.inner.store_object_class(object_class);
        self.inner.object_class()
    }

    pub fn set_object_class(&self, object_class: Option<ObjectClass>) {
        self.inner.store_object_class(object_class);
    }
}

impl Debug for RepositoryConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryConfig")
            .field("definition_name", &self.inner.definition_name)
            .field("collection_name", &self.inner.collection_name.read().as_deref())
            .field("document_kind", &self.inner.document_kind.read().as_deref())
            .field("object_class", &*self.inner.object_class.read())
            .finish()
    }
}

struct RepositoryConfigInner {
    definition_name: String,
    client: Atomic<Option<DocumentStoreClient>>,
    collection_name: Atomic<Option<Arc<str>>>,
    document_kind: Atomic<Option<Arc<str>>>,
    object_class: Atomic<Option<ObjectClass>>,
}

impl RepositoryConfigInner {
    fn new(definition_name: &str) -> Self {
        RepositoryConfigInner {
            definition_name: definition_name.to_string(),
            client: atomic(None),
            collection_name: atomic(None),
            document_kind: atomic(None),
            object_class: atomic(None),
        }
    }

    fn default_collection_name(&self) -> Arc<str> {
        Arc::from(self.definition_name.to_lowercase())
    }

    fn client(&self) -> DocumentStoreClient {
        get_or_init(&self.client, default_client)
    }

    fn store_client(&self, client: DocumentStoreClient) {
        log::debug!("{}: client set to {:?}", self.definition_name, client);
        self.client.write_with(|it| *it = Some(client));
    }

    fn collection_name(&self) -> Arc<str> {
        get_or_init(&self.collection_name, || self.default_collection_name())
    }

    fn store_collection_name(&self, name: Arc<str>) {
        log::debug!("{}: collection name set to {}", self.definition_name, name);
        self.collection_name.write_with(|it| *it = Some(name));
    }

    fn document_kind(&self) -> Arc<str> {
        get_or_init(&self.document_kind, || Arc::from(DEFAULT_DOCUMENT_KIND))
    }

    fn store_document_kind(&self, kind: Arc<str>) {
        log::debug!("{}: document kind set to {}", self.definition_name, kind);
        self.document_kind.write_with(|it| *it = Some(kind));
    }

    fn object_class(&self) -> Option<ObjectClass> {
        self.object_class.read().clone()
    }

    fn store_object_class(&self, object_class: Option<ObjectClass>) {
        log::debug!(
            "{}: object class set to {:?}",
            self.definition_name,
            object_class
        );
        self.object_class.write_with(|it| *it = object_class);
    }
}
