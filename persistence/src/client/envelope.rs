use crate::client::DocumentId;
use crate::collection::Document;
use crate::common::{
    Value, DEFAULT_DOCUMENT_KIND, DOC_COLLECTION, DOC_ID, DOC_KIND, DOC_SOURCE, DOC_VERSION,
};
use crate::errors::{ErrorKind, PersistenceError, PersistenceResult};

/// A stored document as returned by a lookup: id, store metadata and the
/// source mapping.
///
/// Only [StoredEnvelope::source] matters to the repository. The id is absent
/// for raw envelopes that carry nothing but a `_source` mapping; collection,
/// kind and version are informational.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredEnvelope {
    id: Option<DocumentId>,
    collection: String,
    document_kind: String,
    version: u64,
    source: Document,
}

impl StoredEnvelope {
    pub fn new(
        id: DocumentId,
        collection: &str,
        document_kind: &str,
        version: u64,
        source: Document,
    ) -> Self {
        StoredEnvelope {
            id: Some(id),
            collection: collection.to_string(),
            document_kind: document_kind.to_string(),
            version,
            source,
        }
    }

    /// Envelope holding only a source mapping.
    pub fn from_source(source: Document) -> Self {
        StoredEnvelope {
            id: None,
            collection: String::new(),
            document_kind: DEFAULT_DOCUMENT_KIND.to_string(),
            version: 0,
            source,
        }
    }

    pub fn id(&self) -> Option<&DocumentId> {
        self.id.as_ref()
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn document_kind(&self) -> &str {
        &self.document_kind
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn source(&self) -> &Document {
        &self.source
    }

    pub fn into_source(self) -> Document {
        self.source
    }

    /// Renders the envelope in its raw form (`_id`, `_index`, `_type`,
    /// `_version`, `_source`). `_id` is left out when the envelope has none.
    pub fn to_document(&self) -> PersistenceResult<Document> {
        let mut document = Document::new();
        if let Some(id) = &self.id {
            document.put(DOC_ID, Value::from(id.as_str()))?;
        }
        document.put(DOC_COLLECTION, Value::from(self.collection.as_str()))?;
        document.put(DOC_KIND, Value::from(self.document_kind.as_str()))?;
        document.put(DOC_VERSION, Value::from(self.version))?;
        document.put(DOC_SOURCE, Value::from(self.source.clone()))?;
        Ok(document)
    }
}

impl TryFrom<Document> for StoredEnvelope {
    type Error = PersistenceError;

    /// Reads a raw envelope. Only `_source` is required and must be a
    /// document; an `_id` that is present must be a non-empty string or an
    /// integer.
    fn try_from(raw: Document) -> PersistenceResult<Self> {
        let id = match raw.get(DOC_ID) {
            None | Some(Value::Null) => None,
            Some(value) => match DocumentId::from_value(value) {
                Some(id) => Some(id),
                None => {
                    log::error!("Raw envelope has an unusable {} {}", DOC_ID, value);
                    return Err(PersistenceError::new(
                        &format!("Raw envelope has an unusable '{}' value {}", DOC_ID, value),
                        ErrorKind::InvalidId,
                    ));
                }
            },
        };

        let source = match raw.get(DOC_SOURCE) {
            Some(Value::Document(source)) => source.clone(),
            _ => {
                log::error!("Raw envelope {:?} has no {} mapping", raw, DOC_SOURCE);
                return Err(PersistenceError::new(
                    &format!("Raw envelope has no '{}' mapping", DOC_SOURCE),
                    ErrorKind::ObjectMappingError,
                ));
            }
        };

        Ok(StoredEnvelope {
            id,
            collection: raw
                .get(DOC_COLLECTION)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            document_kind: raw
                .get(DOC_KIND)
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_DOCUMENT_KIND)
                .to_string(),
            version: raw.get(DOC_VERSION).and_then(Value::as_u64).unwrap_or(0),
            source,
        })
    }
}

/// What a write did to the stored document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Updated,
    Deleted,
}

/// Acknowledgement of a write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteResult {
    pub id: DocumentId,
    pub collection: String,
    pub document_kind: String,
    pub version: u64,
    pub outcome: WriteOutcome,
}
