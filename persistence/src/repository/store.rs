use crate::client::{DocumentId, RequestOptions, WriteResult};
use crate::collection::Document;
use crate::common::{Convertible, ID_FIELDS};
use crate::errors::{PersistenceError, PersistenceResult};
use crate::repository::lookup::target;
use crate::repository::serialization::serialize;
use crate::repository::RepositoryConfig;

/// Id a serialized document asks to be stored under, if any.
fn source_id(source: &Document) -> Option<DocumentId> {
    ID_FIELDS
        .iter()
        .find_map(|field| source.get(field).and_then(DocumentId::from_value))
}

pub(crate) fn save<T: Convertible>(
    config: &RepositoryConfig,
    object: &T,
    options: &RequestOptions,
) -> PersistenceResult<WriteResult> {
    let source = serialize(object)?;
    let id = options.id().cloned().or_else(|| source_id(&source));
    let target = target(config, options);

    let result = config.client().index(&target, id.as_ref(), source)?;
    log::debug!(
        "Saved document {} in {}/{} ({:?}, version {})",
        result.id,
        result.collection,
        result.document_kind,
        result.outcome,
        result.version
    );
    Ok(result)
}

pub(crate) fn update(
    config: &RepositoryConfig,
    id: &DocumentId,
    partial: &Document,
    options: &RequestOptions,
) -> PersistenceResult<WriteResult> {
    let target = target(config, options);
    match config.client().update(&target, id, partial)? {
        Some(result) => {
            log::debug!(
                "Updated document {} in {}/{} to version {}",
                id,
                target.collection,
                target.document_kind,
                result.version
            );
            Ok(result)
        }
        None => {
            log::error!("Cannot update missing document {} in {}", id, target.collection);
            Err(PersistenceError::document_not_found(
                id.as_str(),
                &target.collection,
                &target.document_kind,
            ))
        }
    }
}

pub(crate) fn delete(
    config: &RepositoryConfig,
    id: &DocumentId,
    options: &RequestOptions,
) -> PersistenceResult<WriteResult> {
    let target = target(config, options);
    match config.client().delete(&target, id)? {
        Some(result) => {
            log::debug!("Deleted document {} from {}", id, target.collection);
            Ok(result)
        }
        None => {
            log::error!("Cannot delete missing document {} in {}", id, target.collection);
            Err(PersistenceError::document_not_found(
                id.as_str(),
                &target.collection,
                &target.document_kind,
            ))
        }
    }
}
