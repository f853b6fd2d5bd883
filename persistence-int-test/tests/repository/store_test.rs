use crate::repository::Note;
use persistence::client::{RequestOptions, WriteOutcome};
use persistence::collection::Document;
use persistence::doc;
use persistence::errors::ErrorKind;
use persistence::repository::{Record, Repository};
use persistence_derive::Repository;
use persistence_int_test::test_util::{cleanup, create_test_context, run_test};

fn sources(records: Vec<Option<Record>>) -> Vec<Option<Document>> {
    records
        .into_iter()
        .map(|record| record.and_then(Record::into_source))
        .collect()
}

#[derive(Repository)]
struct SaveThenFindRepository;

#[test]
fn test_save_three_then_find_them() {
    run_test(
        || create_test_context(),
        |ctx| {
            SaveThenFindRepository.set_client(Some(ctx.client()));
            let i1 = SaveThenFindRepository.save(&doc! { a: 1 })?.id;
            let i2 = SaveThenFindRepository.save(&doc! { a: 2 })?.id;
            let i3 = SaveThenFindRepository.save(&doc! { a: 3 })?.id;

            let all = SaveThenFindRepository.find_many([&i1, &i2, &i3])?;
            assert_eq!(
                sources(all),
                vec![Some(doc! { a: 1 }), Some(doc! { a: 2 }), Some(doc! { a: 3 })]
            );

            let partial = SaveThenFindRepository::instance()
                .find((i1.clone(), "missing", i3.clone()))?
                .into_many()
                .map(sources);
            assert_eq!(
                partial,
                Some(vec![Some(doc! { a: 1 }), None, Some(doc! { a: 3 })])
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[derive(Repository)]
struct SaveIdRepository;

#[test]
fn test_save_resolves_ids() {
    run_test(
        || create_test_context(),
        |ctx| {
            SaveIdRepository.set_client(Some(ctx.client()));

            let from_field = SaveIdRepository.save(&Note::new("note-1", "with id"))?;
            assert_eq!(from_field.id.as_str(), "note-1");
            assert_eq!(from_field.outcome, WriteOutcome::Created);

            let from_numeric = SaveIdRepository.save(&doc! { "_id": 99, a: 1 })?;
            assert_eq!(from_numeric.id.as_str(), "99");

            let explicit_id = format!("note_{}", uuid::Uuid::new_v4());
            let explicit = RequestOptions::new().with_id(&explicit_id);
            let from_options = SaveIdRepository.save_with(&Note::new("ignored", "x"), &explicit)?;
            assert_eq!(from_options.id.as_str(), explicit_id);

            let generated = SaveIdRepository.save(&doc! { a: 1 })?;
            assert!(!generated.id.is_empty());
            assert!(SaveIdRepository.exists(&generated.id)?);

            let again = SaveIdRepository.save(&Note::new("note-1", "renamed"))?;
            assert_eq!(again.outcome, WriteOutcome::Updated);
            assert_eq!(again.version, 2);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[derive(Repository)]
struct UpdateRepository;

#[test]
fn test_update_merges_partial_documents() {
    run_test(
        || create_test_context(),
        |ctx| {
            UpdateRepository.set_client(Some(ctx.client()));
            UpdateRepository.save(&doc! { id: "1", title: "old", meta: { views: 1 } })?;

            let result = UpdateRepository.update("1", &doc! { title: "new", meta: { likes: 2 } })?;
            assert_eq!(result.outcome, WriteOutcome::Updated);

            let stored = UpdateRepository.find_one("1")?.into_source();
            assert_eq!(
                stored,
                Some(doc! { id: "1", title: "new", meta: { views: 1, likes: 2 } })
            );

            let err = UpdateRepository::instance()
                .update("2", &doc! { title: "x" })
                .unwrap_err();
            assert!(err.is_document_not_found());
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[derive(Repository)]
struct DeleteRepository;

#[test]
fn test_delete() {
    run_test(
        || create_test_context(),
        |ctx| {
            DeleteRepository.set_client(Some(ctx.client()));
            DeleteRepository.save(&doc! { id: "1" })?;

            let result = DeleteRepository.delete("1")?;
            assert_eq!(result.outcome, WriteOutcome::Deleted);
            assert!(!DeleteRepository.exists("1")?);

            let err = DeleteRepository.delete("1").unwrap_err();
            assert_eq!(
                err.kind(),
                &ErrorKind::DocumentNotFound {
                    id: "1".to_string(),
                    collection: "deleterepository".to_string(),
                    document_kind: "_doc".to_string(),
                }
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}

#[derive(Repository)]
#[repository(collection = "managed_collection")]
struct CollectionRepository;

#[test]
fn test_collection_management() {
    run_test(
        || create_test_context(),
        |ctx| {
            CollectionRepository.set_client(Some(ctx.client()));
            assert!(!CollectionRepository.collection_exists()?);

            CollectionRepository.create_collection()?;
            assert!(CollectionRepository::instance().collection_exists()?);
            CollectionRepository.refresh_collection()?;

            let err = CollectionRepository.create_collection().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CollectionAlreadyExists);

            CollectionRepository.delete_collection()?;
            let err = CollectionRepository.delete_collection().unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CollectionNotFound);

            assert_eq!(
                ctx.recorder().count("create_collection"),
                2
            );
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
