use crate::repository::{Note, Status};
use persistence::client::{DocumentId, StoredEnvelope};
use persistence::collection::Document;
use persistence::common::{Convertible, Value};
use persistence::doc;
use persistence::errors::{ErrorKind, PersistenceError, PersistenceResult};
use persistence::repository::{ObjectClass, Repository};
use persistence_derive::Repository;

#[derive(Repository)]
struct MappingRepository;

#[derive(Repository)]
struct RawSourceRepository;

#[derive(Repository)]
struct TypedSourceRepository;

#[derive(Repository)]
struct FactoryRepository;

#[derive(Repository)]
struct SourceOnlyRepository;

/// Produces its own mapping, different from its fields.
struct Summary {
    words: Vec<String>,
}

impl Convertible for Summary {
    fn to_value(&self) -> PersistenceResult<Value> {
        Ok(Value::from(doc! {
            text: (self.words.join(" ")),
            count: (self.words.len()),
        }))
    }

    fn from_value(value: &Value) -> PersistenceResult<Self> {
        let text = value
            .as_document()
            .and_then(|doc| doc.get("text"))
            .and_then(Value::as_str)
            .ok_or_else(|| PersistenceError::new("missing text", ErrorKind::ObjectMappingError))?;
        Ok(Summary {
            words: text.split(' ').map(String::from).collect(),
        })
    }
}

fn envelope(source: Document) -> StoredEnvelope {
    StoredEnvelope::new(DocumentId::from("1"), "notes", "_doc", 1, source)
}

#[test]
fn test_serialize_uses_the_object_mapping_verbatim() -> PersistenceResult<()> {
    let summary = Summary {
        words: vec!["hello".to_string(), "world".to_string()],
    };
    let mapping = MappingRepository.serialize(&summary)?;
    assert_eq!(mapping, doc! { text: "hello world", count: 2u64 });
    Ok(())
}

#[test]
fn test_serialize_passes_mappings_through() -> PersistenceResult<()> {
    let mapping = doc! { title: "as is", nested: { deep: [1, 2] } };
    assert_eq!(MappingRepository::instance().serialize(&mapping)?, mapping);
    Ok(())
}

#[test]
fn test_serialize_derived_struct() -> PersistenceResult<()> {
    let mut note = Note::new("7", "derived");
    note.rating = Some(5);
    note.status = Status::Published;
    let mapping = MappingRepository.serialize(&note)?;
    assert_eq!(
        mapping,
        doc! {
            id: "7",
            title: "derived",
            tags: (Value::Array(vec![])),
            status: "Published",
            rating: 5,
        }
    );
    Ok(())
}

#[test]
fn test_serialize_rejects_scalars() {
    let err = MappingRepository.serialize(&"just a string".to_string()).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);
}

#[test]
fn test_deserialize_without_object_class_returns_source() -> PersistenceResult<()> {
    let source = doc! { id: "1", title: "raw" };
    let record = RawSourceRepository.deserialize(&envelope(source.clone()))?;
    assert_eq!(record.into_source(), Some(source));
    Ok(())
}

#[test]
fn test_deserialize_with_object_class_builds_instances() -> PersistenceResult<()> {
    TypedSourceRepository.set_object_class(Some(ObjectClass::of::<Note>()));
    let source = doc! { id: "1", title: "typed", tags: ["x"], status: "Draft" };

    let note: Note = TypedSourceRepository::instance()
        .deserialize(&envelope(source))?
        .into_object()
        .expect("a Note");
    assert_eq!(note.title, "typed");
    assert_eq!(note.tags, vec!["x".to_string()]);
    assert_eq!(note.rating, None);
    Ok(())
}

#[test]
fn test_deserialize_with_factory() -> PersistenceResult<()> {
    FactoryRepository.set_object_class(Some(ObjectClass::of::<Summary>()));
    let record = FactoryRepository.deserialize(&envelope(doc! { text: "a b c" }))?;
    let summary = record.downcast_ref::<Summary>().expect("a Summary");
    assert_eq!(summary.words.len(), 3);

    let err = FactoryRepository.deserialize(&envelope(doc! { other: 1 })).unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);
    Ok(())
}

#[test]
fn test_deserialize_raw_envelope() -> PersistenceResult<()> {
    let raw = envelope(doc! { title: "raw" }).to_document()?;
    let record = RawSourceRepository.deserialize_raw(raw)?;
    assert_eq!(record.into_source(), Some(doc! { title: "raw" }));

    let err = RawSourceRepository
        .deserialize_raw(doc! { "_id": "1" })
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);
    Ok(())
}

#[test]
fn test_deserialize_raw_source_only_envelope() -> PersistenceResult<()> {
    SourceOnlyRepository.set_object_class(None);
    let record = SourceOnlyRepository.deserialize_raw(doc! { "_source": { a: 1 } })?;
    assert_eq!(record.into_source(), Some(doc! { a: 1 }));

    SourceOnlyRepository::instance().set_object_class(Some(ObjectClass::of::<Summary>()));
    let record = SourceOnlyRepository.deserialize_raw(doc! { "_source": { text: "one two" } })?;
    let summary = record.downcast_ref::<Summary>().expect("a Summary");
    assert_eq!(summary.words, vec!["one".to_string(), "two".to_string()]);

    let err = SourceOnlyRepository
        .deserialize_raw(doc! { "_source": "not a mapping" })
        .unwrap_err();
    assert_eq!(err.kind(), &ErrorKind::ObjectMappingError);
    Ok(())
}
