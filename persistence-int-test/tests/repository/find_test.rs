use crate::repository::{Note, Status};
use persistence::client::{DocumentId, RequestOptions};
use persistence::collection::Document;
use persistence::doc;
use persistence::errors::ErrorKind;
use persistence::repository::{ObjectClass, Record, Repository};
use persistence_derive::Repository;
use persistence_int_test::test_util::{cleanup, create_test_context, run_test};

fn sources(records: Vec<Option<Record>>) -> Vec<Option<Document>> {
    records
        .into_iter()
        .map(|record| record.and_then(Record::into_source))
        .collect()
}

#[derive(Repository)]
struct SingleFindRepository;

#[test]
fn test_find_single_id() {
    run_test(
        || create_test_context(),
        |ctx| {
            SingleFindRepository.set_client(Some(ctx.client()));
            let saved = SingleFindRepository.save(&doc! { title: "first" })?;

            let record = SingleFindRepository.find_one(&saved.id)?;
            assert_eq!(record.into_source(), Some(doc! { title: "first" }));

            let found = SingleFindRepository::instance().find(saved.id.as_str())?;
            assert!(found.into_one().is_some_and(|it| it.is_source()));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[derive(Repository)]
struct MissingFindRepository;

#[test]
fn test_find_single_missing_id_fails() {
    run_test(
        || create_test_context(),
        |ctx| {
            MissingFindRepository.set_client(Some(ctx.client()));
            MissingFindRepository.save(&doc! { id: "present" })?;

            let err = MissingFindRepository.find("absent").unwrap_err();
            assert_eq!(
                err.kind(),
                &ErrorKind::DocumentNotFound {
                    id: "absent".to_string(),
                    collection: "missingfindrepository".to_string(),
                    document_kind: "_doc".to_string(),
                }
            );
            assert!(err.message().contains("absent"));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[derive(Repository)]
struct BatchFindRepository;

#[test]
fn test_find_batch_keeps_order_and_marks_misses() {
    run_test(
        || create_test_context(),
        |ctx| {
            BatchFindRepository.set_client(Some(ctx.client()));
            let ids: Vec<DocumentId> = [1, 2, 3]
                .into_iter()
                .map(|a| BatchFindRepository.save(&doc! { a: a }).map(|it| it.id))
                .collect::<Result<_, _>>()?;

            let records = BatchFindRepository.find_many(&ids)?;
            assert_eq!(
                sources(records),
                vec![Some(doc! { a: 1 }), Some(doc! { a: 2 }), Some(doc! { a: 3 })]
            );

            let requested = vec![ids[0].clone(), DocumentId::from("missing"), ids[2].clone()];
            let records = BatchFindRepository::instance()
                .find(requested)?
                .into_many()
                .expect("many ids give many slots");
            assert_eq!(
                sources(records),
                vec![Some(doc! { a: 1 }), None, Some(doc! { a: 3 })]
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[derive(Repository)]
struct VariadicFindRepository;

#[test]
fn test_find_tuple_equals_find_vec() {
    run_test(
        || create_test_context(),
        |ctx| {
            VariadicFindRepository.set_client(Some(ctx.client()));
            VariadicFindRepository.save(&doc! { id: "1", a: 1 })?;
            VariadicFindRepository.save(&doc! { id: "3", a: 3 })?;

            let from_tuple = VariadicFindRepository.find(("1", "2", "3"))?.into_many();
            let from_vec = VariadicFindRepository.find(vec!["1", "2", "3"])?.into_many();
            let from_array = VariadicFindRepository.find(["1", "2", "3"])?.into_many();

            let expected = vec![Some(doc! { id: "1", a: 1 }), None, Some(doc! { id: "3", a: 3 })];
            assert_eq!(from_tuple.map(sources), Some(expected.clone()));
            assert_eq!(from_vec.map(sources), Some(expected.clone()));
            assert_eq!(from_array.map(sources), Some(expected));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[derive(Repository)]
struct RoundTripRepository;

#[test]
fn test_batch_is_one_round_trip_in_input_order() {
    run_test(
        || create_test_context(),
        |ctx| {
            RoundTripRepository.set_client(Some(ctx.client()));
            for id in ["a", "b", "c", "d"] {
                RoundTripRepository.save(&doc! { id: id })?;
            }
            ctx.recorder().clear();

            // the recording client answers multi-gets in reverse order
            let records = RoundTripRepository.find_many(["d", "a", "x", "c", "a"])?;
            let ids: Vec<Option<String>> = sources(records)
                .into_iter()
                .map(|doc| {
                    doc.and_then(|it| it.get("id").and_then(|v| v.as_str()).map(String::from))
                })
                .collect();
            assert_eq!(
                ids,
                vec![
                    Some("d".to_string()),
                    Some("a".to_string()),
                    None,
                    Some("c".to_string()),
                    Some("a".to_string()),
                ]
            );
            assert_eq!(ctx.recorder().calls(), vec!["multi_get".to_string()]);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[derive(Repository)]
struct EmptyBatchRepository;

#[test]
fn test_empty_batch_makes_no_request() {
    run_test(
        || create_test_context(),
        |ctx| {
            EmptyBatchRepository.set_client(Some(ctx.client()));
            let records = EmptyBatchRepository.find_many(Vec::<DocumentId>::new())?;
            assert!(records.is_empty());
            assert!(ctx.recorder().calls().is_empty());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[derive(Repository)]
struct ExistsRepository;

#[test]
fn test_exists() {
    run_test(
        || create_test_context(),
        |ctx| {
            ExistsRepository.set_client(Some(ctx.client()));
            // no collection yet: still a plain false
            assert!(!ExistsRepository.exists("never-saved")?);

            let saved = ExistsRepository.save(&doc! { title: "x" })?;
            assert!(ExistsRepository.exists(&saved.id)?);
            assert!(ExistsRepository::instance().exists(saved.id.clone())?);
            assert!(!ExistsRepository.exists("never-saved")?);

            let elsewhere = RequestOptions::new().with_collection("exists_elsewhere");
            assert!(!ExistsRepository.exists_with(&saved.id, &elsewhere)?);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[derive(Repository)]
struct OptionsRepository;

#[test]
fn test_options_apply_to_one_call_only() {
    run_test(
        || create_test_context(),
        |ctx| {
            OptionsRepository.set_client(Some(ctx.client()));
            let archive = RequestOptions::new()
                .with_collection("options_archive")
                .with_document_kind("archived");
            OptionsRepository.save_with(&doc! { id: "1", a: 1 }, &archive)?;
            OptionsRepository.save_with(&doc! { id: "2", a: 2 }, &archive)?;

            let records = OptionsRepository
                .find_with(vec!["2", "1"], &archive)?
                .into_many()
                .map(sources);
            assert_eq!(
                records,
                Some(vec![Some(doc! { id: "2", a: 2 }), Some(doc! { id: "1", a: 1 })])
            );

            assert_eq!(&*OptionsRepository.collection_name(), "optionsrepository");
            assert_eq!(&*OptionsRepository.document_kind(), "_doc");

            // the configured collection was never written
            let err = OptionsRepository.find("1").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CollectionNotFound);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[derive(Repository)]
struct NoCollectionRepository;

#[test]
fn test_missing_collection_is_propagated() {
    run_test(
        || create_test_context(),
        |ctx| {
            NoCollectionRepository.set_client(Some(ctx.client()));

            let err = NoCollectionRepository.find("1").unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CollectionNotFound);
            assert!(!err.is_document_not_found());

            let err = NoCollectionRepository.find(vec!["1", "2"]).unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CollectionNotFound);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[derive(Repository)]
#[repository(collection = "typed_notes", object_type = "Note")]
struct TypedFindRepository;

#[test]
fn test_find_materializes_the_object_class() {
    run_test(
        || create_test_context(),
        |ctx| {
            TypedFindRepository.set_client(Some(ctx.client()));
            let mut note = Note::new("n1", "typed");
            note.tags = vec!["a".to_string(), "b".to_string()];
            note.status = Status::Published;
            TypedFindRepository.save(&note)?;

            let found: Note = TypedFindRepository
                .find_one("n1")?
                .into_object()
                .expect("a Note");
            assert_eq!(found, note);

            let slots = TypedFindRepository::instance().find_many(["n1", "n2"])?;
            assert_eq!(slots.len(), 2);
            assert_eq!(
                slots[0].as_ref().and_then(|it| it.downcast_ref::<Note>()),
                Some(&note)
            );
            assert!(slots[1].is_none());

            TypedFindRepository.set_object_class(None);
            let raw = TypedFindRepository.find_one("n1")?;
            assert_eq!(
                raw.as_source().and_then(|it| it.get("status")).and_then(|v| v.as_str()),
                Some("Published")
            );
            TypedFindRepository.set_object_class(Some(ObjectClass::of::<Note>()));
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
