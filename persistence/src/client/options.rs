use crate::common::Value;
use std::fmt::{Display, Formatter};

/// Identifier of a stored document.
///
/// Ids are kept as strings; integer ids are rendered in decimal, so `7`,
/// `7u64` and `"7"` address the same document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        DocumentId(id.into())
    }

    /// Generates a random id, as the store does for documents saved without one.
    pub fn generate() -> Self {
        DocumentId(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reads an id out of a field value. Strings and integers qualify.
    pub fn from_value(value: &Value) -> Option<DocumentId> {
        match value {
            Value::String(s) if !s.is_empty() => Some(DocumentId(s.clone())),
            Value::I64(v) => Some(DocumentId(v.to_string())),
            Value::U64(v) => Some(DocumentId(v.to_string())),
            _ => None,
        }
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        DocumentId(value.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        DocumentId(value)
    }
}

impl From<&String> for DocumentId {
    fn from(value: &String) -> Self {
        DocumentId(value.clone())
    }
}

impl From<&DocumentId> for DocumentId {
    fn from(value: &DocumentId) -> Self {
        value.clone()
    }
}

macro_rules! integer_document_id {
    ($($t:ty),*) => {
        $(impl From<$t> for DocumentId {
            fn from(value: $t) -> Self {
                DocumentId(value.to_string())
            }
        })*
    };
}

integer_document_id!(i32, i64, u32, u64, usize);

/// Fully resolved location of a request: where the client must look.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestTarget {
    pub collection: String,
    pub document_kind: String,
    pub routing: Option<String>,
}

impl RequestTarget {
    pub fn new(collection: &str, document_kind: &str) -> Self {
        RequestTarget {
            collection: collection.to_string(),
            document_kind: document_kind.to_string(),
            routing: None,
        }
    }
}

/// Per-call overrides for a repository operation.
///
/// Options apply to one call only and are never written back to the
/// repository configuration. Empty strings are treated as "no override".
///
/// ```rust,ignore
/// let options = RequestOptions::new()
///     .with_collection("notes-archive")
///     .with_routing("tenant-1");
/// let notes = NoteRepository.find_with(vec!["1", "2"], &options)?;
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestOptions {
    collection: Option<String>,
    document_kind: Option<String>,
    routing: Option<String>,
    id: Option<DocumentId>,
}

impl RequestOptions {
    pub fn new() -> Self {
        RequestOptions::default()
    }

    pub fn with_collection(mut self, collection: &str) -> Self {
        self.collection = non_empty(collection);
        self
    }

    pub fn with_document_kind(mut self, document_kind: &str) -> Self {
        self.document_kind = non_empty(document_kind);
        self
    }

    pub fn with_routing(mut self, routing: &str) -> Self {
        self.routing = non_empty(routing);
        self
    }

    /// Id to store a document under; only used by `save`.
    pub fn with_id(mut self, id: impl Into<DocumentId>) -> Self {
        let id = id.into();
        self.id = if id.is_empty() { None } else { Some(id) };
        self
    }

    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    pub fn document_kind(&self) -> Option<&str> {
        self.document_kind.as_deref()
    }

    pub fn routing(&self) -> Option<&str> {
        self.routing.as_deref()
    }

    pub fn id(&self) -> Option<&DocumentId> {
        self.id.as_ref()
    }

    /// Applies the overrides on top of the configured collection and kind.
    pub fn resolve(&self, collection: &str, document_kind: &str) -> RequestTarget {
        RequestTarget {
            collection: self.collection.as_deref().unwrap_or(collection).to_string(),
            document_kind: self
                .document_kind
                .as_deref()
                .unwrap_or(document_kind)
                .to_string(),
            routing: self.routing.clone(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
