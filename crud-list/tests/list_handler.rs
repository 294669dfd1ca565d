use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use crud_list::context::RequestContext;
use crud_list::handlers::{
    EmitError, JsonResponder, ListError, ListOperation, ListQuery, Pagination, ResponseEmitter,
};
use crud_list::repository::{AccessorError, AccessorOperation, AccessorResult, DataAccessor};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tower::ServiceExt;
use validator::Validate;

// ===== Test Fixtures =====

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    List { offset: u64, limit: u64 },
    Count,
}

/// Where the fake store should fail, if anywhere
#[derive(Debug, Clone, Copy, Default)]
enum Failure {
    #[default]
    None,
    List,
    Count,
}

/// In-memory accessor that records every call it receives
#[derive(Default)]
struct Store {
    items: Vec<String>,
    failure: Failure,
    calls: Mutex<Vec<Call>>,
}

impl Store {
    fn with_items(items: &[&str]) -> Self {
        Self {
            items: items.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    fn failing(failure: Failure) -> Self {
        Self {
            items: vec!["item1".to_string()],
            failure,
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn matching<'a>(&'a self, name: Option<&'a str>) -> impl Iterator<Item = &'a String> + 'a {
        self.items
            .iter()
            .filter(move |item| name.map_or(true, |name| item.contains(name)))
    }

    fn window(&self, name: Option<&str>, offset: u64, limit: u64) -> AccessorResult<Vec<String>> {
        self.calls.lock().unwrap().push(Call::List { offset, limit });
        if let Failure::List = self.failure {
            return Err(AccessorError::connection_failed(
                AccessorOperation::List,
                "connection refused by db.internal:5432",
            ));
        }
        let take = if limit == 0 { usize::MAX } else { limit as usize };
        Ok(self
            .matching(name)
            .skip(offset as usize)
            .take(take)
            .cloned()
            .collect())
    }

    fn total(&self, name: Option<&str>) -> AccessorResult<i64> {
        self.calls.lock().unwrap().push(Call::Count);
        if let Failure::Count = self.failure {
            return Err(AccessorError::backend(
                AccessorOperation::Count,
                "relation \"items\" does not exist",
            ));
        }
        Ok(self.matching(name).count() as i64)
    }
}

impl DataAccessor<String, Pagination> for Store {
    async fn list(
        &self,
        _ctx: &RequestContext,
        _query: &Pagination,
        offset: u64,
        limit: u64,
    ) -> AccessorResult<Vec<String>> {
        self.window(None, offset, limit)
    }

    async fn count(&self, _ctx: &RequestContext, _query: &Pagination) -> AccessorResult<i64> {
        self.total(None)
    }
}

/// Query with a filter and embedded pagination
#[derive(Debug, Deserialize, Validate)]
struct NameQuery {
    #[serde(flatten)]
    #[validate(nested)]
    pagination: Pagination,
    #[validate(length(min = 1, max = 32))]
    name: Option<String>,
}

impl ListQuery for NameQuery {
    fn pagination(&self) -> Option<Pagination> {
        Some(self.pagination)
    }
}

impl DataAccessor<String, NameQuery> for Store {
    async fn list(
        &self,
        _ctx: &RequestContext,
        query: &NameQuery,
        offset: u64,
        limit: u64,
    ) -> AccessorResult<Vec<String>> {
        self.window(query.name.as_deref(), offset, limit)
    }

    async fn count(&self, _ctx: &RequestContext, query: &NameQuery) -> AccessorResult<i64> {
        self.total(query.name.as_deref())
    }
}

/// Query type without paging support
#[derive(Debug, Deserialize, Validate)]
struct TagQuery {
    tag: Option<String>,
}

impl ListQuery for TagQuery {}

impl DataAccessor<String, TagQuery> for Store {
    async fn list(
        &self,
        _ctx: &RequestContext,
        query: &TagQuery,
        offset: u64,
        limit: u64,
    ) -> AccessorResult<Vec<String>> {
        self.window(query.tag.as_deref(), offset, limit)
    }

    async fn count(&self, _ctx: &RequestContext, query: &TagQuery) -> AccessorResult<i64> {
        self.total(query.tag.as_deref())
    }
}

/// Accessor that never finishes unless the context ends it
struct Stalled;

impl DataAccessor<String, Pagination> for Stalled {
    async fn list(
        &self,
        ctx: &RequestContext,
        _query: &Pagination,
        _offset: u64,
        _limit: u64,
    ) -> AccessorResult<Vec<String>> {
        ctx.observe(AccessorOperation::List, std::future::pending()).await
    }

    async fn count(&self, _ctx: &RequestContext, _query: &Pagination) -> AccessorResult<i64> {
        Ok(0)
    }
}

/// Accessor that hands its context out and then waits for cancellation
struct Parked {
    entered: Mutex<Option<oneshot::Sender<RequestContext>>>,
}

impl Parked {
    fn new() -> (Self, oneshot::Receiver<RequestContext>) {
        let (tx, rx) = oneshot::channel();
        let parked = Self {
            entered: Mutex::new(Some(tx)),
        };
        (parked, rx)
    }
}

impl DataAccessor<String, Pagination> for Parked {
    async fn list(
        &self,
        ctx: &RequestContext,
        _query: &Pagination,
        _offset: u64,
        _limit: u64,
    ) -> AccessorResult<Vec<String>> {
        let entered = self.entered.lock().unwrap().take();
        if let Some(tx) = entered {
            let _ = tx.send(ctx.clone());
        }
        ctx.cancelled().await;
        Err(AccessorError::cancelled(AccessorOperation::List))
    }

    async fn count(&self, _ctx: &RequestContext, _query: &Pagination) -> AccessorResult<i64> {
        Ok(0)
    }
}

/// Emitter that cannot write success bodies
struct RejectingEmitter;

impl ResponseEmitter for RejectingEmitter {
    fn respond<P>(&self, payload: Option<&P>, status: StatusCode) -> Result<Response, EmitError>
    where
        P: Serialize + ?Sized,
    {
        if status == StatusCode::OK {
            let err = serde_json::from_str::<Value>("{").expect_err("truncated json");
            return Err(EmitError::Serialize(err));
        }
        JsonResponder.respond(payload, status)
    }
}

// ===== Test Helper Functions =====

fn router<Q, A, E>(operation: ListOperation<String, Q, A, E>) -> Router
where
    Q: ListQuery + 'static,
    A: DataAccessor<String, Q> + 'static,
    E: ResponseEmitter + 'static,
{
    let operation = Arc::new(operation);
    Router::new().route(
        "/items",
        get(move |request: Request| {
            let operation = operation.clone();
            async move { operation.handle(request).await }
        }),
    )
}

fn get_request(uri: &str) -> Request {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app.oneshot(get_request(uri)).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

const BAD_REQUEST_BODY: &str = r#"{"status":400,"message":"bad request","details":null}"#;
const INTERNAL_BODY: &str = r#"{"status":500,"message":"internal server error","details":null}"#;

// ===== Success Path =====

#[tokio::test]
async fn test_list_single_item() {
    let store = Arc::new(Store::with_items(&["item1"]));
    let app = router(ListOperation::<String, Pagination, _>::json(store.clone()));

    let (status, body) = send(app, "/items?page=1&page_size=10").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"items":["item1"],"pagination":{"total":1,"page":1,"page_size":10}}"#
    );
    assert_eq!(
        store.calls(),
        vec![Call::List { offset: 0, limit: 10 }, Call::Count]
    );
}

#[tokio::test]
async fn test_list_sets_json_content_type() {
    let app = router(ListOperation::<String, Pagination, _>::json(Store::with_items(
        &["item1"],
    )));

    let response = app
        .oneshot(get_request("/items?page=1&page_size=10"))
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn test_list_later_page_window() {
    let items: Vec<String> = (1..=25).map(|i| format!("item{i}")).collect();
    let names: Vec<&str> = items.iter().map(String::as_str).collect();
    let store = Arc::new(Store::with_items(&names));
    let app = router(ListOperation::<String, Pagination, _>::json(store.clone()));

    let (status, body) = send(app, "/items?page=3&page_size=10").await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["items"].as_array().unwrap().len(), 5);
    assert_eq!(body["items"][0], "item21");
    assert_eq!(
        body["pagination"],
        json!({ "total": 25, "page": 3, "page_size": 10 })
    );
    assert_eq!(store.calls()[0], Call::List { offset: 20, limit: 10 });
}

#[tokio::test]
async fn test_list_empty_result_is_not_an_error() {
    let app = router(ListOperation::<String, Pagination, _>::json(Store::default()));

    let (status, body) = send(app, "/items?page=4&page_size=5").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"items":[],"pagination":{"total":0,"page":4,"page_size":5}}"#
    );
}

#[tokio::test]
async fn test_list_with_filter_and_flattened_pagination() {
    let store = Arc::new(Store::with_items(&["apple", "banana", "pineapple"]));
    let app = router(ListOperation::<String, NameQuery, _>::json(store.clone()));

    let (status, body) = send(app, "/items?page=1&page_size=10&name=apple").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"items":["apple","pineapple"],"pagination":{"total":2,"page":1,"page_size":10}}"#
    );
}

#[tokio::test]
async fn test_unpaginated_query_uses_zero_window() {
    let store = Arc::new(Store::with_items(&["a", "b", "c"]));
    let app = router(ListOperation::<String, TagQuery, _>::json(store.clone()));

    let (status, body) = send(app, "/items").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"items":["a","b","c"],"pagination":{"total":3,"page":1,"page_size":0}}"#
    );
    assert_eq!(
        store.calls(),
        vec![Call::List { offset: 0, limit: 0 }, Call::Count]
    );
}

#[tokio::test]
async fn test_identical_requests_are_byte_identical() {
    let operation = ListOperation::<String, Pagination, _>::json(Store::with_items(&[
        "item1", "item2", "item3",
    ]));
    let app = router(operation);

    let (_, first) = send(app.clone(), "/items?page=1&page_size=2").await;
    let (_, second) = send(app, "/items?page=1&page_size=2").await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_shared_operation_serves_concurrent_requests() {
    let store = Arc::new(Store::with_items(&["item1", "item2"]));
    let operation = Arc::new(ListOperation::<String, Pagination, _>::json(store.clone()));

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let operation = operation.clone();
            tokio::spawn(async move {
                operation
                    .handle(get_request("/items?page=1&page_size=10"))
                    .await
                    .status()
            })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }
    assert_eq!(store.calls().len(), 32);
}

// ===== Bad Requests =====

#[tokio::test]
async fn test_bad_requests_skip_accessor() {
    let cases = [
        "/items?page=0&page_size=0",
        "/items?page=0&page_size=10",
        "/items?page=1&page_size=0",
        "/items?page=1&page_size=101",
        "/items?page=abc&page_size=10",
        "/items?page=1&page_size=-5",
        "/items?page=1",
        "/items",
    ];

    for uri in cases {
        let store = Arc::new(Store::with_items(&["item1"]));
        let app = router(ListOperation::<String, Pagination, _>::json(store.clone()));

        let (status, body) = send(app, uri).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "uri: {uri}");
        assert_eq!(body, BAD_REQUEST_BODY, "uri: {uri}");
        assert!(store.calls().is_empty(), "uri: {uri}");
    }
}

#[tokio::test]
async fn test_repeated_pagination_key_is_bad_request() {
    let store = Arc::new(Store::with_items(&["item1"]));
    let app = router(ListOperation::<String, Pagination, _>::json(store.clone()));

    let (status, body) = send(app, "/items?page=1&page=2&page_size=10").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, BAD_REQUEST_BODY);
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_filter_validation_failure_is_bad_request() {
    let store = Arc::new(Store::with_items(&["item1"]));
    let app = router(ListOperation::<String, NameQuery, _>::json(store.clone()));

    let (status, body) = send(app, "/items?page=1&page_size=10&name=").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, BAD_REQUEST_BODY);
    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn test_max_page_size_is_accepted() {
    let app = router(ListOperation::<String, Pagination, _>::json(Store::default()));

    let (status, _) = send(app, "/items?page=1&page_size=100").await;

    assert_eq!(status, StatusCode::OK);
}

// ===== Accessor Failures =====

#[tokio::test]
async fn test_list_failure_skips_count() {
    let store = Arc::new(Store::failing(Failure::List));
    let app = router(ListOperation::<String, Pagination, _>::json(store.clone()));

    let (status, body) = send(app, "/items?page=1&page_size=10").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, INTERNAL_BODY);
    assert!(!body.contains("db.internal"));
    assert_eq!(store.calls(), vec![Call::List { offset: 0, limit: 10 }]);
}

#[tokio::test]
async fn test_count_failure_returns_single_error() {
    let store = Arc::new(Store::failing(Failure::Count));
    let app = router(ListOperation::<String, Pagination, _>::json(store.clone()));

    let (status, body) = send(app, "/items?page=1&page_size=10").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, INTERNAL_BODY);
    assert!(!body.contains("item1"));
    assert_eq!(store.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_ends_stalled_accessor() {
    let operation = ListOperation::<String, Pagination, _>::json(Stalled)
        .with_timeout(Duration::from_millis(50));
    let app = router(operation);

    let (status, body) = send(app, "/items?page=1&page_size=10").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, INTERNAL_BODY);
}

#[tokio::test]
async fn test_abandoned_request_cancels_accessor_context() {
    let (parked, entered) = Parked::new();
    let operation = Arc::new(ListOperation::<String, Pagination, _>::json(parked));

    let task = tokio::spawn({
        let operation = operation.clone();
        async move {
            operation
                .handle(get_request("/items?page=1&page_size=10"))
                .await
        }
    });

    let ctx = entered.await.expect("accessor should be reached");
    assert!(!ctx.is_cancelled());

    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    assert!(ctx.cancellation_token().is_cancelled());
    assert!(!ctx.is_expired());
    ctx.cancelled().await;
}

// ===== Response Emission =====

#[tokio::test]
async fn test_emission_failure_keeps_success_status() {
    let store = Arc::new(Store::with_items(&["item1"]));
    let app = router(ListOperation::<String, Pagination, _, _>::new(
        store.clone(),
        RejectingEmitter,
    ));

    let (status, body) = send(app, "/items?page=1&page_size=10").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
    assert_eq!(store.calls().len(), 2);
}

#[tokio::test]
async fn test_custom_emitter_still_writes_error_envelopes() {
    let store = Arc::new(Store::default());
    let app = router(ListOperation::<String, Pagination, _, _>::new(
        store.clone(),
        RejectingEmitter,
    ));

    let (status, body) = send(app, "/items?page=0&page_size=10").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, BAD_REQUEST_BODY);
}

#[tokio::test]
async fn test_error_details_pass_through() {
    let app: Router = Router::new().route(
        "/items",
        get(|| async {
            Err::<(), _>(
                ListError::bad_request().with_details(json!({ "page": ["must be at least 1"] })),
            )
        }),
    );

    let (status, body) = send(app, "/items").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        r#"{"status":400,"message":"bad request","details":{"page":["must be at least 1"]}}"#
    );
}
