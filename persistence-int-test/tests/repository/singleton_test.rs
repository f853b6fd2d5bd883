use persistence::client::RequestOptions;
use persistence::doc;
use persistence::errors::{ErrorKind, PersistenceResult};
use persistence::repository::{ObjectClass, Record, Repository};
use persistence_derive::Repository;
use persistence_int_test::test_util::{cleanup, create_test_context, run_test};

#[derive(Repository)]
struct SharedStateRepository;

#[derive(Repository)]
struct GuardedRepository;

#[derive(Repository)]
struct TenantRepository;

impl TenantRepository {
    fn tenant_options(&self, tenant: &str) -> RequestOptions {
        RequestOptions::new()
            .with_collection(&format!("{}_{}", self.collection_name(), tenant))
            .with_routing(tenant)
    }

    fn find_for_tenant(&self, tenant: &str, id: &str) -> PersistenceResult<Record> {
        self.find_with(id, &self.tenant_options(tenant))?
            .into_one()
            .ok_or_else(|| "expected a single record".into())
    }
}

#[test]
fn test_new_is_not_allowed() {
    let err = GuardedRepository::new().err().expect("construction must fail");
    assert_eq!(err.kind(), &ErrorKind::InstantiationNotAllowed);
    assert!(err.message().contains("GuardedRepository::instance()"));
}

#[test]
fn test_type_and_instance_paths_share_state() {
    SharedStateRepository.set_collection_name(Some("shared"));
    assert_eq!(&*SharedStateRepository::instance().collection_name(), "shared");

    SharedStateRepository::instance().set_document_kind(Some("entry"));
    assert_eq!(&*SharedStateRepository.document_kind(), "entry");

    let class = ObjectClass::from_fn(|source: &persistence::collection::Document| {
        Ok(source.size())
    });
    SharedStateRepository::instance().set_object_class(Some(class.clone()));
    assert!(SharedStateRepository
        .object_class()
        .is_some_and(|it| it.ptr_eq(&class)));

    let client = SharedStateRepository.client();
    assert!(client.ptr_eq(&SharedStateRepository::instance().client()));

    assert!(std::ptr::eq(
        SharedStateRepository::config(),
        SharedStateRepository::config()
    ));
}

#[test]
fn test_instance_is_the_same_across_threads() {
    let here = SharedStateRepository::instance() as *const SharedStateRepository as usize;
    let there = std::thread::spawn(|| {
        SharedStateRepository::instance() as *const SharedStateRepository as usize
    })
    .join()
    .expect("thread panicked");
    assert_eq!(here, there);

    let config_here = SharedStateRepository::config() as *const _ as usize;
    let config_there = std::thread::spawn(|| SharedStateRepository::config() as *const _ as usize)
        .join()
        .expect("thread panicked");
    assert_eq!(config_here, config_there);
}

#[test]
fn test_application_methods_on_both_paths() {
    run_test(
        || create_test_context(),
        |ctx| {
            TenantRepository.set_client(Some(ctx.client()));
            let options = TenantRepository.tenant_options("acme");
            TenantRepository.save_with(&doc! { id: "1", name: "widget" }, &options)?;

            let from_type = TenantRepository.find_for_tenant("acme", "1")?;
            let from_instance = TenantRepository::instance().find_for_tenant("acme", "1")?;
            assert_eq!(from_type.as_source(), from_instance.as_source());
            assert_eq!(
                ctx.recorder().delegate().document_count("tenantrepository_acme"),
                1
            );

            let err = TenantRepository::instance()
                .find_for_tenant("other", "1")
                .unwrap_err();
            assert_eq!(err.kind(), &ErrorKind::CollectionNotFound);
            Ok(())
        },
        |ctx| cleanup(ctx),
    )
}
