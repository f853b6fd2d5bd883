use crate::client::{DocumentId, StoredEnvelope};
use crate::collection::Document;
use crate::common::{Convertible, Value};
use crate::errors::{ErrorKind, PersistenceError, PersistenceResult};
use crate::repository::{ObjectClass, Record};

/// Produces the field mapping stored for `object`.
///
/// The mapping is the object's own `to_value` output, untouched. A
/// [Document] maps to itself.
pub fn serialize<T: Convertible>(object: &T) -> PersistenceResult<Document> {
    match object.to_value()? {
        Value::Document(document) => Ok(document),
        other => {
            log::error!(
                "Serializing {} produced a {} instead of a document",
                std::any::type_name::<T>(),
                other.type_name()
            );
            Err(PersistenceError::new(
                &format!(
                    "{} does not map to a document, got a {}",
                    std::any::type_name::<T>(),
                    other.type_name()
                ),
                ErrorKind::ObjectMappingError,
            ))
        }
    }
}

/// Turns an envelope into a [Record].
///
/// With an object class, the source mapping is handed to its factory. Without
/// one, the source mapping itself is returned.
pub fn deserialize(
    object_class: Option<&ObjectClass>,
    envelope: &StoredEnvelope,
) -> PersistenceResult<Record> {
    match object_class {
        Some(object_class) => {
            log::trace!(
                "Materializing document {} as {}",
                envelope.id().map(DocumentId::as_str).unwrap_or("<no id>"),
                object_class.type_name()
            );
            object_class
                .instantiate(envelope.source())
                .map(Record::Object)
        }
        None => Ok(Record::Source(envelope.source().clone())),
    }
}
