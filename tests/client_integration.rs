use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::{Duration, Instant},
};

use axum::{
    extract::{Request as AxumRequest, State},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value as JsonValue};
use wave_http::{
    models::{DataFilter, DataRowCreate, ExperimentTagSearchRequest, TagCreate},
    ClientOptions, NoLocation, Request, WaveClient, WaveError, API_KEY_ENV, CLIENT_VERSION,
};

#[derive(Clone)]
enum MockBody {
    Json(JsonValue),
    Text(String),
}

#[derive(Clone)]
struct MockResponse {
    status: StatusCode,
    body: MockBody,
    headers: Vec<(&'static str, String)>,
    delay: Duration,
}

impl MockResponse {
    fn json(status: StatusCode, body: JsonValue) -> Self {
        Self {
            status,
            body: MockBody::Json(body),
            headers: Vec::new(),
            delay: Duration::from_millis(0),
        }
    }

    fn text(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: MockBody::Text(body.to_owned()),
            headers: Vec::new(),
            delay: Duration::from_millis(0),
        }
    }

    fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone, Debug)]
struct RecordedRequest {
    method: String,
    path: String,
    authorization: Option<String>,
    client_version: Option<String>,
}

#[derive(Clone)]
struct MockState {
    responses: Arc<Mutex<VecDeque<MockResponse>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    hits: Arc<AtomicUsize>,
}

async fn mock_handler(State(state): State<MockState>, request: AxumRequest) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let recorded = {
        let header = |name: &str| {
            request
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned)
        };
        RecordedRequest {
            method: request.method().to_string(),
            path: request
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_owned())
                .unwrap_or_else(|| request.uri().path().to_owned()),
            authorization: header("authorization"),
            client_version: header("x-wave-client-version"),
        }
    };
    state
        .requests
        .lock()
        .expect("request log mutex must not be poisoned")
        .push(recorded);

    let response = {
        let mut queue = state
            .responses
            .lock()
            .expect("response queue mutex must not be poisoned");
        queue.pop_front().unwrap_or_else(|| {
            MockResponse::json(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"message": "no mock response available"}),
            )
        })
    };

    if !response.delay.is_zero() {
        tokio::time::sleep(response.delay).await;
    }

    let mut headers = HeaderMap::new();
    for (name, value) in &response.headers {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::try_from(value.as_str()).expect("mock header value must be valid"),
        );
    }

    match response.body {
        MockBody::Json(body) => (response.status, headers, Json(body)).into_response(),
        MockBody::Text(body) => (response.status, headers, body).into_response(),
    }
}

struct TestServer {
    base_url: String,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl TestServer {
    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("request log mutex must not be poisoned")
            .clone()
    }
}

async fn spawn_server(responses: Vec<MockResponse>) -> TestServer {
    let state = MockState {
        responses: Arc::new(Mutex::new(responses.into())),
        requests: Arc::new(Mutex::new(Vec::new())),
        hits: Arc::new(AtomicUsize::new(0)),
    };

    let app = Router::new().fallback(mock_handler).with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("must bind test listener");
    let address = listener.local_addr().expect("must have local addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("mock server must run");
    });

    TestServer {
        base_url: format!("http://{address}"),
        hits: state.hits,
        requests: state.requests,
        task,
    }
}

fn fast_options() -> ClientOptions {
    ClientOptions {
        timeout: Duration::from_secs(1),
        max_retries: 2,
        base_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(50),
    }
}

fn client(server: &TestServer) -> WaveClient {
    WaveClient::new(server.base_url.clone(), "test-key")
        .expect("must construct client")
        .with_options(fast_options())
}

fn tag_body(id: i64, name: &str) -> JsonValue {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "created_at": "2026-02-11T14:00:00Z",
        "updated_at": "2026-02-11T14:00:00Z",
    })
}

fn data_row_body(id: i64, participant: &str, extra: JsonValue) -> JsonValue {
    let mut body = json!({
        "id": id,
        "experiment_uuid": "4f6c0b5e-0000-0000-0000-000000000000",
        "participant_id": participant,
        "created_at": "2026-02-11T14:00:00Z",
        "updated_at": "2026-02-11T14:00:00Z",
    });
    if let (Some(target), Some(source)) = (body.as_object_mut(), extra.as_object()) {
        for (key, value) in source {
            target.insert(key.clone(), value.clone());
        }
    }
    body
}

#[tokio::test]
async fn fatal_statuses_fail_on_the_first_attempt() {
    for status in [400u16, 401, 403, 404] {
        let server = spawn_server(vec![MockResponse::json(
            StatusCode::from_u16(status).expect("status must be valid"),
            json!({"message": "denied"}),
        )])
        .await;

        let err = client(&server)
            .execute(Request::get("/api/v1/tags/9"))
            .await
            .expect_err("request must fail");

        assert_eq!(err.status_code(), Some(status), "status {status}");
        assert!(!err.is_retryable(), "status {status}");
        match status {
            400 => assert!(matches!(err, WaveError::Validation { .. })),
            401 => assert!(matches!(err, WaveError::Authentication { .. })),
            403 => assert!(matches!(err, WaveError::Authorization { .. })),
            404 => assert!(matches!(err, WaveError::NotFound { .. })),
            _ => unreachable!(),
        }
        assert_eq!(server.hits.load(Ordering::SeqCst), 1, "status {status}");
    }
}

#[tokio::test]
async fn unknown_client_status_is_fatal() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::IM_A_TEAPOT,
        json!({"message": "short and stout"}),
    )])
    .await;

    let err = client(&server)
        .execute(Request::get("/health"))
        .await
        .expect_err("request must fail");

    assert!(matches!(err, WaveError::Unclassified { status: 418, .. }));
    assert_eq!(server.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn validation_error_carries_server_detail() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::BAD_REQUEST,
        json!({"message": "invalid data", "detail": "bad field"}),
    )])
    .await;

    let err = client(&server)
        .execute(Request::post("/api/v1/tags/", json!({"name": ""})))
        .await
        .expect_err("request must fail");

    assert!(matches!(err, WaveError::Validation { .. }));
    assert_eq!(err.detail(), Some("bad field"));
    assert!(err.to_string().contains("invalid data"));
}

#[tokio::test]
async fn retryable_statuses_exhaust_the_budget() {
    for status in [429u16, 500, 502, 503, 504] {
        let response = MockResponse::json(
            StatusCode::from_u16(status).expect("status must be valid"),
            json!({"message": "try later"}),
        );
        let server = spawn_server(vec![response.clone(), response.clone(), response]).await;

        let err = client(&server)
            .execute(Request::get("/health"))
            .await
            .expect_err("request must fail");

        assert!(err.is_retryable(), "status {status}");
        assert_eq!(err.status_code(), Some(status), "status {status}");
        // max_retries = 2 means one initial attempt plus two retries.
        assert_eq!(server.hits.load(Ordering::SeqCst), 3, "status {status}");
    }
}

#[tokio::test]
async fn server_fault_then_success_recovers() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::INTERNAL_SERVER_ERROR, json!({"message": "boom"})),
        MockResponse::json(StatusCode::OK, tag_body(3, "pilot")),
    ])
    .await;

    let tag = client(&server)
        .tags()
        .get(3)
        .await
        .expect("request must succeed after retry");

    assert_eq!(tag.name, "pilot");
    assert_eq!(server.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn retry_after_hint_overrides_the_schedule() {
    let server = spawn_server(vec![
        MockResponse::json(StatusCode::TOO_MANY_REQUESTS, json!({"message": "slow down"}))
            .with_header("retry-after", "1"),
        MockResponse::json(StatusCode::OK, tag_body(1, "pilot")),
    ])
    .await;

    // The configured schedule would wait ten seconds; the hint says one.
    let client = WaveClient::new(server.base_url.clone(), "test-key")
        .expect("must construct client")
        .with_options(ClientOptions {
            timeout: Duration::from_secs(1),
            max_retries: 1,
            base_backoff: Duration::from_secs(10),
            max_backoff: Duration::from_secs(30),
        });

    let started = Instant::now();
    let tag = client.tags().get(1).await.expect("must succeed after wait");
    let elapsed = started.elapsed();

    assert_eq!(tag.id, 1);
    assert!(elapsed >= Duration::from_secs(1), "waited {elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "waited {elapsed:?}");
    assert_eq!(server.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn exhausted_rate_limit_keeps_the_hint() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"message": "slow down"}),
    )
    .with_header("retry-after", "7")])
    .await;

    let client = client(&server).with_options(ClientOptions {
        max_retries: 0,
        ..fast_options()
    });
    let err = client
        .execute(Request::get("/health"))
        .await
        .expect_err("request must fail");

    match err {
        WaveError::RateLimited { retry_after, .. } => {
            assert_eq!(retry_after, Some(Duration::from_secs(7)));
        }
        other => panic!("expected rate limit error, got {other:?}"),
    }
    assert_eq!(server.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn timeouts_are_retried_then_surface() {
    let slow = MockResponse::json(StatusCode::OK, tag_body(1, "pilot"))
        .with_delay(Duration::from_millis(150));
    let server = spawn_server(vec![slow.clone(), slow]).await;

    let client = client(&server).with_options(ClientOptions {
        timeout: Duration::from_millis(20),
        max_retries: 1,
        ..fast_options()
    });
    let err = client.tags().get(1).await.expect_err("request must time out");

    assert!(matches!(err, WaveError::Timeout { .. }));
    assert!(err.is_retryable());
    assert_eq!(server.hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn standard_headers_ride_every_request() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        json!({"status": "healthy"}),
    )])
    .await;

    client(&server).health().await.expect("must succeed");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/health");
    assert_eq!(
        requests[0].authorization.as_deref(),
        Some("Bearer test-key")
    );
    assert_eq!(requests[0].client_version.as_deref(), Some(CLIENT_VERSION));
}

#[tokio::test]
async fn non_json_success_bodies_are_wrapped() {
    let server = spawn_server(vec![MockResponse::text(StatusCode::OK, "pong")]).await;

    let body = client(&server)
        .execute(Request::get("/health"))
        .await
        .expect("must succeed");

    assert_eq!(body, json!({"message": "pong"}));
}

#[tokio::test]
async fn incompatible_api_version_header_is_tolerated() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        json!({"status": "healthy"}),
    )
    .with_header("x-wave-api-version", "99.0.0")])
    .await;

    let status = client(&server).health().await.expect("must succeed");
    assert!(status.is_healthy());
}

#[tokio::test]
async fn version_report_round_trips() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        json!({
            "api_version": "1.4.2",
            "compatibility_rule": "same major version",
            "compatible": true,
        }),
    )])
    .await;

    let info = client(&server).version().await.expect("must succeed");

    assert_eq!(info.api_version, "1.4.2");
    assert_eq!(info.compatible, Some(true));
    assert_eq!(server.requests()[0].path, "/version");
}

#[tokio::test]
async fn tag_create_posts_to_the_collection() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        tag_body(12, "stroop-2026"),
    )])
    .await;

    let tag = client(&server)
        .tags()
        .create(TagCreate::new("stroop-2026"))
        .await
        .expect("must succeed");

    assert_eq!(tag.id, 12);
    let requests = server.requests();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/v1/tags/");
}

#[tokio::test]
async fn invalid_request_models_never_reach_the_wire() {
    let server = spawn_server(Vec::new()).await;

    let err = client(&server)
        .tags()
        .create(TagCreate::new(""))
        .await
        .expect_err("must fail validation");

    assert!(matches!(err, WaveError::Validation { .. }));
    assert_eq!(server.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn data_rows_decode_and_reshape() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        json!([
            data_row_body(1, "p-001", json!({"reaction_ms": 412, "correct": true})),
            data_row_body(2, "p-001", json!({"reaction_ms": 388, "correct": false})),
        ]),
    )])
    .await;

    let table = client(&server)
        .data()
        .table(
            "4f6c0b5e-0000-0000-0000-000000000000",
            &DataFilter::default(),
        )
        .await
        .expect("must succeed");

    assert_eq!(table.len(), 2);
    assert!(table.columns().iter().any(|column| column == "reaction_ms"));
    let first = table.row(0).expect("must have first row");
    assert_eq!(first.get_i64("reaction_ms"), Some(412));
    assert_eq!(first.get_bool("correct"), Some(true));

    let path = &server.requests()[0].path;
    assert!(
        path.starts_with("/api/v1/experiment-data/4f6c0b5e-0000-0000-0000-000000000000/data/"),
        "path was {path}"
    );
    assert!(path.contains("limit=100"), "path was {path}");
}

#[tokio::test]
async fn all_rows_pages_until_a_short_batch() {
    let server = spawn_server(vec![
        MockResponse::json(
            StatusCode::OK,
            json!([
                data_row_body(1, "p-001", json!({"reaction_ms": 412})),
                data_row_body(2, "p-002", json!({"reaction_ms": 388})),
            ]),
        ),
        MockResponse::json(
            StatusCode::OK,
            json!([data_row_body(3, "p-003", json!({"reaction_ms": 301}))]),
        ),
    ])
    .await;

    let rows = client(&server)
        .data()
        .all_rows("4f6c0b5e-0000-0000-0000-000000000000", 2)
        .await
        .expect("must succeed");

    assert_eq!(rows.len(), 3);
    assert_eq!(server.hits.load(Ordering::SeqCst), 2);

    let requests = server.requests();
    assert!(requests[0].path.contains("offset=0"));
    assert!(requests[1].path.contains("offset=2"));
}

#[tokio::test]
async fn create_batch_posts_each_row() {
    let server = spawn_server(vec![
        MockResponse::json(
            StatusCode::OK,
            data_row_body(1, "p-001", json!({"reaction_ms": 412})),
        ),
        MockResponse::json(
            StatusCode::OK,
            data_row_body(2, "p-001", json!({"reaction_ms": 388})),
        ),
    ])
    .await;

    let created = client(&server)
        .data()
        .create_batch(
            "4f6c0b5e-0000-0000-0000-000000000000",
            vec![
                DataRowCreate::new("p-001").field("reaction_ms", 412),
                DataRowCreate::new("p-001").field("reaction_ms", 388),
            ],
        )
        .await
        .expect("must succeed");

    assert_eq!(created.len(), 2);
    assert_eq!(server.hits.load(Ordering::SeqCst), 2);
    for request in server.requests() {
        assert_eq!(request.method, "POST");
    }
}

#[tokio::test]
async fn tag_search_decodes_the_response_envelope() {
    let server = spawn_server(vec![MockResponse::json(
        StatusCode::OK,
        json!({
            "experiments": [],
            "total": 0,
            "pagination": {"skip": 0, "limit": 100, "total": 0},
        }),
    )])
    .await;

    let response = client(&server)
        .search()
        .experiments_by_tags(&ExperimentTagSearchRequest::new(["pilot"]))
        .await
        .expect("must succeed");

    assert_eq!(response.total, 0);
    assert_eq!(response.pagination.limit, 100);
    let requests = server.requests();
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/v1/search/experiments/by-tags");
}

#[tokio::test]
async fn missing_credential_fails_before_any_request() {
    let server = spawn_server(Vec::new()).await;

    // Only this test touches the key variable in this binary.
    std::env::remove_var(API_KEY_ENV);
    let err = WaveClient::with_source(server.base_url.clone(), None, &NoLocation)
        .expect_err("construction must fail without a key");

    assert!(matches!(err, WaveError::Authentication { .. }));
    assert!(err.to_string().contains(API_KEY_ENV));
    assert_eq!(server.hits.load(Ordering::SeqCst), 0);
}
