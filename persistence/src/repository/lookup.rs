use crate::client::{DocumentId, RequestOptions, RequestTarget, StoredEnvelope};
use crate::errors::{PersistenceError, PersistenceResult};
use crate::repository::serialization::deserialize;
use crate::repository::{Record, RepositoryConfig};
use std::collections::{HashMap, HashSet};

/// Ids asked for by a `find`.
///
/// A single id converts into [LookupRequest::One]; vectors, arrays, slices
/// and tuples of ids convert into [LookupRequest::Many].
///
/// ```rust,ignore
/// NoteRepository.find("1")?;               // One
/// NoteRepository.find(vec!["1", "2"])?;    // Many
/// NoteRepository.find(("1", "2", "3"))?;   // Many
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LookupRequest {
    One(DocumentId),
    Many(Vec<DocumentId>),
}

macro_rules! single_lookup {
    ($($t:ty),*) => {
        $(impl From<$t> for LookupRequest {
            fn from(value: $t) -> Self {
                LookupRequest::One(DocumentId::from(value))
            }
        })*
    };
}

single_lookup!(&str, String, &String, DocumentId, &DocumentId, i32, i64, u32, u64, usize);

impl<T: Into<DocumentId>> From<Vec<T>> for LookupRequest {
    fn from(ids: Vec<T>) -> Self {
        LookupRequest::Many(ids.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<DocumentId>, const N: usize> From<[T; N]> for LookupRequest {
    fn from(ids: [T; N]) -> Self {
        LookupRequest::Many(ids.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<DocumentId> + Clone> From<&[T]> for LookupRequest {
    fn from(ids: &[T]) -> Self {
        LookupRequest::Many(ids.iter().cloned().map(Into::into).collect())
    }
}

macro_rules! tuple_lookup {
    ($(($($name:ident),+)),*) => {
        $(impl<$($name: Into<DocumentId>),+> From<($($name,)+)> for LookupRequest {
            #[allow(non_snake_case)]
            fn from(($($name,)+): ($($name,)+)) -> Self {
                LookupRequest::Many(vec![$($name.into()),+])
            }
        })*
    };
}

tuple_lookup!((A, B), (A, B, C), (A, B, C, D), (A, B, C, D, E));

/// Result of a `find`, shaped like the request.
#[derive(Debug)]
pub enum Found {
    One(Record),
    Many(Vec<Option<Record>>),
}

impl Found {
    pub fn into_one(self) -> Option<Record> {
        match self {
            Found::One(record) => Some(record),
            Found::Many(_) => None,
        }
    }

    pub fn into_many(self) -> Option<Vec<Option<Record>>> {
        match self {
            Found::Many(records) => Some(records),
            Found::One(_) => None,
        }
    }
}

pub(crate) fn target(config: &RepositoryConfig, options: &RequestOptions) -> RequestTarget {
    options.resolve(&config.collection_name(), &config.document_kind())
}

pub(crate) fn exists(
    config: &RepositoryConfig,
    id: &DocumentId,
    options: &RequestOptions,
) -> PersistenceResult<bool> {
    let target = target(config, options);
    log::trace!("exists {} in {}/{}", id, target.collection, target.document_kind);
    config.client().exists(&target, id)
}

pub(crate) fn find(
    config: &RepositoryConfig,
    request: LookupRequest,
    options: &RequestOptions,
) -> PersistenceResult<Found> {
    match request {
        LookupRequest::One(id) => find_one(config, &id, options).map(Found::One),
        LookupRequest::Many(ids) => find_many(config, &ids, options).map(Found::Many),
    }
}

pub(crate) fn find_one(
    config: &RepositoryConfig,
    id: &DocumentId,
    options: &RequestOptions,
) -> PersistenceResult<Record> {
    let target = target(config, options);
    log::trace!("get {} from {}/{}", id, target.collection, target.document_kind);

    match config.client().get(&target, id)? {
        Some(envelope) => deserialize(config.object_class().as_ref(), &envelope),
        None => {
            log::error!(
                "Document {} not found in {}/{}",
                id,
                target.collection,
                target.document_kind
            );
            Err(PersistenceError::document_not_found(
                id.as_str(),
                &target.collection,
                &target.document_kind,
            ))
        }
    }
}

/// One multi-get for all ids; slots follow the order of `ids`.
pub(crate) fn find_many(
    config: &RepositoryConfig,
    ids: &[DocumentId],
    options: &RequestOptions,
) -> PersistenceResult<Vec<Option<Record>>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let target = target(config, options);
    log::trace!(
        "multi-get {} ids from {}/{}",
        ids.len(),
        target.collection,
        target.document_kind
    );

    let requested: HashSet<&DocumentId> = ids.iter().collect();
    let mut found: HashMap<DocumentId, StoredEnvelope> = HashMap::with_capacity(requested.len());
    for (id, envelope) in config.client().multi_get(&target, ids)? {
        if let Some(envelope) = envelope {
            if !requested.contains(&id) {
                log::warn!("multi-get returned unrequested document {}", id);
                continue;
            }
            found.insert(id, envelope);
        }
    }

    let object_class = config.object_class();
    ids.iter()
        .map(|id| {
            found
                .get(id)
                .map(|envelope| deserialize(object_class.as_ref(), envelope))
                .transpose()
        })
        .collect()
}
