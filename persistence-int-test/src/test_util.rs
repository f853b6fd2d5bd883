use parking_lot::Mutex;
use persistence::client::{
    DocumentId, DocumentStoreClient, DocumentStoreClientProvider, InMemoryClient, RequestTarget,
    StoredEnvelope, WriteResult,
};
use persistence::collection::Document;
use persistence::errors::{PersistenceError, PersistenceResult};
use std::backtrace::Backtrace;
use std::sync::Arc;
use std::time::Instant;

/// Runs `test` between `before` and `after`.
///
/// `after` runs even when the test fails. Panics and errors are reported
/// with the elapsed time and fail the calling test.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: Fn(TestContext) -> PersistenceResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    B: Fn() -> PersistenceResult<TestContext> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
    A: Fn(TestContext) -> PersistenceResult<()> + std::panic::UnwindSafe + std::panic::RefUnwindSafe,
{
    let start_time = Instant::now();

    let result = std::panic::catch_unwind(|| {
        let backtrace = Backtrace::capture();
        match before() {
            Ok(ctx) => match test(ctx.clone()) {
                Ok(_) => match after(ctx) {
                    Ok(_) => Ok(()),
                    Err(e) => Err((format!("After run failed: {:?}", e), backtrace.to_string())),
                },
                Err(e) => {
                    let _ = after(ctx);
                    Err((format!("Test failed: {:?}", e), backtrace.to_string()))
                }
            },
            Err(e) => Err((format!("Before run failed: {:?}", e), backtrace.to_string())),
        }
    });

    let elapsed = start_time.elapsed();
    let (error, backtrace) = match result {
        Ok(Ok(_)) => return,
        Ok(Err((e, bt))) => (e, bt),
        Err(panic_err) => {
            let err_msg = if let Some(s) = panic_err.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic_err.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            (format!("Panic: {}", err_msg), Backtrace::capture().to_string())
        }
    };

    eprintln!("\n==================== TEST FAILED ====================");
    eprintln!("Failed after {:?}", elapsed);
    eprintln!("Error: {}", error);
    if !backtrace.is_empty() && !backtrace.contains("disabled") {
        eprintln!("\nBacktrace:\n{}", backtrace);
    }
    eprintln!("=====================================================\n");

    panic!("Test failed: {}", error);
}

/// Per-test client state: a private in-memory store behind a recorder.
#[derive(Clone)]
pub struct TestContext {
    recorder: RecordingClient,
    client: DocumentStoreClient,
}

impl TestContext {
    pub fn new(recorder: RecordingClient) -> Self {
        let client = DocumentStoreClient::new(recorder.clone());
        TestContext { recorder, client }
    }

    /// Handle to hand to a repository under test.
    pub fn client(&self) -> DocumentStoreClient {
        self.client.clone()
    }

    pub fn recorder(&self) -> &RecordingClient {
        &self.recorder
    }
}

pub fn create_test_context() -> PersistenceResult<TestContext> {
    Ok(TestContext::new(RecordingClient::new(InMemoryClient::new())))
}

pub fn cleanup(ctx: TestContext) -> PersistenceResult<()> {
    log::debug!("Cleaning up test context after {} calls", ctx.recorder().calls().len());
    ctx.recorder().fail_with(None);
    ctx.recorder().clear();
    Ok(())
}

/// Client wrapper that records every call and can inject failures.
///
/// `multi_get` answers are handed back in reverse order, so callers that
/// rely on the store's ordering show up in tests.
#[derive(Clone)]
pub struct RecordingClient {
    inner: Arc<RecordingClientInner>,
}

struct RecordingClientInner {
    delegate: InMemoryClient,
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<PersistenceError>>,
}

impl RecordingClient {
    pub fn new(delegate: InMemoryClient) -> Self {
        RecordingClient {
            inner: Arc::new(RecordingClientInner {
                delegate,
                calls: Mutex::new(Vec::new()),
                failure: Mutex::new(None),
            }),
        }
    }

    /// Names of the calls made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.inner.calls.lock().clone()
    }

    pub fn count(&self, operation: &str) -> usize {
        self.inner
            .calls
            .lock()
            .iter()
            .filter(|call| call.as_str() == operation)
            .count()
    }

    pub fn clear(&self) {
        self.inner.calls.lock().clear();
    }

    /// Makes every later call fail with `failure`, or stop failing on `None`.
    pub fn fail_with(&self, failure: Option<PersistenceError>) {
        *self.inner.failure.lock() = failure;
    }

    pub fn delegate(&self) -> &InMemoryClient {
        &self.inner.delegate
    }

    fn record(&self, operation: &str) -> PersistenceResult<()> {
        self.inner.calls.lock().push(operation.to_string());
        match self.inner.failure.lock().as_ref() {
            Some(failure) => Err(failure.clone()),
            None => Ok(()),
        }
    }
}

impl DocumentStoreClientProvider for RecordingClient {
    fn get(
        &self,
        target: &RequestTarget,
        id: &DocumentId,
    ) -> PersistenceResult<Option<StoredEnvelope>> {
        self.record("get")?;
        self.inner.delegate.get(target, id)
    }

    fn multi_get(
        &self,
        target: &RequestTarget,
        ids: &[DocumentId],
    ) -> PersistenceResult<Vec<(DocumentId, Option<StoredEnvelope>)>> {
        self.record("multi_get")?;
        let mut result = self.inner.delegate.multi_get(target, ids)?;
        result.reverse();
        Ok(result)
    }

    fn exists(&self, target: &RequestTarget, id: &DocumentId) -> PersistenceResult<bool> {
        self.record("exists")?;
        self.inner.delegate.exists(target, id)
    }

    fn index(
        &self,
        target: &RequestTarget,
        id: Option<&DocumentId>,
        source: Document,
    ) -> PersistenceResult<WriteResult> {
        self.record("index")?;
        self.inner.delegate.index(target, id, source)
    }

    fn update(
        &self,
        target: &RequestTarget,
        id: &DocumentId,
        partial: &Document,
    ) -> PersistenceResult<Option<WriteResult>> {
        self.record("update")?;
        self.inner.delegate.update(target, id, partial)
    }

    fn delete(
        &self,
        target: &RequestTarget,
        id: &DocumentId,
    ) -> PersistenceResult<Option<WriteResult>> {
        self.record("delete")?;
        self.inner.delegate.delete(target, id)
    }

    fn create_collection(&self, collection: &str) -> PersistenceResult<()> {
        self.record("create_collection")?;
        self.inner.delegate.create_collection(collection)
    }

    fn delete_collection(&self, collection: &str) -> PersistenceResult<()> {
        self.record("delete_collection")?;
        self.inner.delegate.delete_collection(collection)
    }

    fn collection_exists(&self, collection: &str) -> PersistenceResult<bool> {
        self.record("collection_exists")?;
        self.inner.delegate.collection_exists(collection)
    }

    fn refresh(&self, collection: &str) -> PersistenceResult<()> {
        self.record("refresh")?;
        self.inner.delegate.refresh(collection)
    }
}
