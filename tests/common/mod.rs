//! In-process mock of the APS endpoints used by the integration tests

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Form, Json, Router};
use serde_json::{json, Value};

use da_runner::adapter::aps::client::{build_http_client, parse_base_url, ApsClient};
use da_runner::adapter::auth::{ApsTokenRepository, TokenProvider};
use da_runner::adapter::config::Config;
use da_runner::adapter::repositories::da_work_item_repository::DaWorkItemRepository;
use da_runner::adapter::repositories::oss_storage_repository::OssStorageRepository;
use da_runner::domain::entities::credentials::Credentials;

pub const BUCKET: &str = "da-runner-test";

#[derive(Default)]
pub struct MockState {
    pub base_url: Mutex<String>,
    pub events: Mutex<Vec<String>>,

    pub reject_credentials: AtomicBool,
    pub token_requests: AtomicUsize,
    pub valid_tokens: Mutex<HashSet<String>>,

    pub buckets: Mutex<HashSet<String>>,
    pub details_failure: Mutex<Option<StatusCode>>,
    pub create_requests: AtomicUsize,

    pub upload_counter: AtomicUsize,
    pub sessions: Mutex<HashMap<String, (String, usize)>>,
    pub parts: Mutex<HashMap<String, BTreeMap<usize, Vec<u8>>>>,
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
    pub authorized_puts: AtomicUsize,
    pub put_delay_ms: AtomicU64,

    pub submitted: Mutex<Vec<Value>>,
    pub statuses: Mutex<VecDeque<String>>,
    pub status_requests: AtomicUsize,
    pub transient_status_failures: AtomicUsize,
    pub download_minutes: Mutex<Vec<u32>>,
}

impl MockState {
    fn record(&self, event: impl Into<String>) {
        self.events.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn position(&self, event: &str) -> usize {
        self.events()
            .iter()
            .position(|e| e == event)
            .unwrap_or_else(|| panic!("event {} not recorded: {:?}", event, self.events()))
    }

    /// Every token issued so far is rejected with 401 from now on
    pub fn revoke_tokens(&self) {
        self.valid_tokens.lock().unwrap().clear();
    }

    /// Statuses returned by successive polls; the last one repeats
    pub fn script_statuses(&self, statuses: &[&str]) {
        *self.statuses.lock().unwrap() = statuses.iter().map(|s| s.to_string()).collect();
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(&format!("{}/{}", bucket, key))
            .cloned()
    }

    fn base_url(&self) -> String {
        self.base_url.lock().unwrap().clone()
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), StatusCode> {
        let token = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or(StatusCode::UNAUTHORIZED)?;

        if self.valid_tokens.lock().unwrap().contains(token) {
            Ok(())
        } else {
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

pub struct MockAps {
    pub state: Arc<MockState>,
    pub base_url: String,
}

impl MockAps {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        *state.base_url.lock().unwrap() = base_url.clone();

        let router = Router::new()
            .route("/authentication/v2/token", post(token))
            .route("/oss/v2/buckets", post(create_bucket))
            .route("/oss/v2/buckets/:bucket/details", get(bucket_details))
            .route(
                "/oss/v2/buckets/:bucket/objects/:key/signeds3upload",
                get(upload_session).post(finalize_upload),
            )
            .route(
                "/oss/v2/buckets/:bucket/objects/:key/signeds3download",
                get(signed_download),
            )
            .route("/s3/:upload_key/:part", put(put_part))
            .route("/download/:bucket/:key", get(download))
            .route("/da/:region/v3/workitems", post(submit_work_item))
            .route("/da/:region/v3/workitems/:id", get(work_item_status))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { state, base_url }
    }

    pub fn config(&self) -> Config {
        Config {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            bucket_name: BUCKET.to_string(),
            base_url: self.base_url.clone(),
            poll_interval_secs: 1,
            http_timeout_secs: 10,
            ..Config::default()
        }
    }

    pub fn tokens(&self) -> Arc<TokenProvider> {
        let http = build_http_client(std::time::Duration::from_secs(10)).unwrap();
        let base = parse_base_url(&self.base_url).unwrap();
        let repository = ApsTokenRepository::new(http, &base).unwrap();
        Arc::new(TokenProvider::new(
            Arc::new(repository),
            Credentials::new("test-client", "test-secret"),
        ))
    }

    pub fn client(&self, tokens: Arc<TokenProvider>) -> Arc<ApsClient> {
        self.client_with_timeout(tokens, Duration::from_secs(10))
    }

    pub fn client_with_timeout(
        &self,
        tokens: Arc<TokenProvider>,
        timeout: Duration,
    ) -> Arc<ApsClient> {
        let http = build_http_client(timeout).unwrap();
        let base = parse_base_url(&self.base_url).unwrap();
        Arc::new(ApsClient::new(http, base, tokens).with_request_timeout(timeout))
    }

    pub fn storage(&self, client: Arc<ApsClient>) -> Arc<OssStorageRepository> {
        Arc::new(OssStorageRepository::new(client))
    }

    pub fn work_items(&self, client: Arc<ApsClient>) -> Arc<DaWorkItemRepository> {
        Arc::new(DaWorkItemRepository::new(client, "us-east"))
    }
}

// -- Handlers --

async fn token(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.record("token");
    let n = state.token_requests.fetch_add(1, Ordering::SeqCst) + 1;

    let basic = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("Basic "));
    if !basic || state.reject_credentials.load(Ordering::SeqCst) {
        return (StatusCode::UNAUTHORIZED, "invalid client").into_response();
    }
    if form.get("grant_type").map(String::as_str) != Some("client_credentials") {
        return (StatusCode::BAD_REQUEST, "unsupported grant").into_response();
    }

    let access_token = format!("token-{}", n);
    state
        .valid_tokens
        .lock()
        .unwrap()
        .insert(access_token.clone());

    Json(json!({
        "access_token": access_token,
        "token_type": "Bearer",
        "expires_in": 3599
    }))
    .into_response()
}

async fn bucket_details(
    State(state): State<Arc<MockState>>,
    Path(bucket): Path<String>,
    headers: HeaderMap,
) -> Response {
    if let Err(status) = state.authorize(&headers) {
        return status.into_response();
    }
    state.record(format!("details:{}", bucket));

    if let Some(status) = *state.details_failure.lock().unwrap() {
        return (status, "details unavailable").into_response();
    }
    if state.buckets.lock().unwrap().contains(&bucket) {
        Json(json!({"bucketKey": bucket, "policyKey": "transient"})).into_response()
    } else {
        (StatusCode::NOT_FOUND, "Bucket not found").into_response()
    }
}

async fn create_bucket(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(status) = state.authorize(&headers) {
        return status.into_response();
    }
    state.create_requests.fetch_add(1, Ordering::SeqCst);

    let bucket = body["bucketKey"].as_str().unwrap_or_default().to_string();
    state.record(format!("create:{}", bucket));
    if body["policyKey"] != "transient" {
        return (StatusCode::BAD_REQUEST, "unexpected policy").into_response();
    }

    if !state.buckets.lock().unwrap().insert(bucket.clone()) {
        return (StatusCode::CONFLICT, "Bucket already exists").into_response();
    }
    Json(json!({"bucketKey": bucket, "policyKey": "transient"})).into_response()
}

async fn upload_session(
    State(state): State<Arc<MockState>>,
    Path((bucket, key)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if let Err(status) = state.authorize(&headers) {
        return status.into_response();
    }
    state.record(format!("upload-session:{}", key));

    let parts: usize = query
        .get("parts")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1);
    let upload_key = format!(
        "upload-{}",
        state.upload_counter.fetch_add(1, Ordering::SeqCst) + 1
    );
    state
        .sessions
        .lock()
        .unwrap()
        .insert(upload_key.clone(), (format!("{}/{}", bucket, key), parts));

    let base = state.base_url();
    let urls: Vec<String> = (1..=parts)
        .map(|part| format!("{}/s3/{}/{}", base, upload_key, part))
        .collect();

    Json(json!({"uploadKey": upload_key, "urls": urls})).into_response()
}

async fn put_part(
    State(state): State<Arc<MockState>>,
    Path((upload_key, part)): Path<(String, usize)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // Signed URLs reject requests carrying an Authorization header
    if headers.contains_key("authorization") {
        state.authorized_puts.fetch_add(1, Ordering::SeqCst);
        return (StatusCode::BAD_REQUEST, "unexpected Authorization header").into_response();
    }
    if !state.sessions.lock().unwrap().contains_key(&upload_key) {
        return (StatusCode::FORBIDDEN, "unknown upload").into_response();
    }

    // Slow uplink
    let delay = state.put_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    state
        .parts
        .lock()
        .unwrap()
        .entry(upload_key)
        .or_default()
        .insert(part, body.to_vec());
    StatusCode::OK.into_response()
}

async fn finalize_upload(
    State(state): State<Arc<MockState>>,
    Path((bucket, key)): Path<(String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(status) = state.authorize(&headers) {
        return status.into_response();
    }

    let Some(upload_key) = body["uploadKey"].as_str() else {
        return (StatusCode::BAD_REQUEST, "missing uploadKey").into_response();
    };
    let Some((object, parts)) = state.sessions.lock().unwrap().remove(upload_key) else {
        return (StatusCode::BAD_REQUEST, "unknown uploadKey").into_response();
    };
    if object != format!("{}/{}", bucket, key) {
        return (StatusCode::BAD_REQUEST, "uploadKey belongs to another object").into_response();
    }

    let uploaded = state
        .parts
        .lock()
        .unwrap()
        .remove(upload_key)
        .unwrap_or_default();
    if uploaded.len() != parts {
        return (StatusCode::BAD_REQUEST, "missing parts").into_response();
    }

    let content: Vec<u8> = uploaded.into_values().flatten().collect();
    let size = content.len();
    state.objects.lock().unwrap().insert(object, content);
    state.record(format!("finalize:{}", key));

    Json(json!({"bucketKey": bucket, "objectKey": key, "size": size})).into_response()
}

async fn signed_download(
    State(state): State<Arc<MockState>>,
    Path((bucket, key)): Path<(String, String)>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    if let Err(status) = state.authorize(&headers) {
        return status.into_response();
    }
    state.record(format!("download:{}", key));

    let Some(minutes) = query
        .get("minutesExpiration")
        .and_then(|m| m.parse::<u32>().ok())
    else {
        return (StatusCode::BAD_REQUEST, "minutesExpiration required").into_response();
    };
    state.download_minutes.lock().unwrap().push(minutes);

    let mut url = reqwest::Url::parse(&state.base_url()).unwrap();
    url.path_segments_mut()
        .unwrap()
        .pop_if_empty()
        .extend(["download", bucket.as_str(), key.as_str()]);

    Json(json!({"signedUrl": url.to_string(), "status": "complete"})).into_response()
}

async fn download(
    State(state): State<Arc<MockState>>,
    Path((bucket, key)): Path<(String, String)>,
) -> Response {
    match state.object(&bucket, &key) {
        Some(content) => content.into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn submit_work_item(
    State(state): State<Arc<MockState>>,
    Path(_region): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(status) = state.authorize(&headers) {
        return status.into_response();
    }
    state.record("submit");

    if body.get("activityId").and_then(Value::as_str).is_none() {
        return (StatusCode::BAD_REQUEST, "activityId is required").into_response();
    }
    state.submitted.lock().unwrap().push(body);

    Json(json!({"id": "wi-0001", "status": "pending"})).into_response()
}

async fn work_item_status(
    State(state): State<Arc<MockState>>,
    Path((_region, id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(status) = state.authorize(&headers) {
        return status.into_response();
    }
    state.status_requests.fetch_add(1, Ordering::SeqCst);

    let remaining = state.transient_status_failures.load(Ordering::SeqCst);
    if remaining > 0 {
        state
            .transient_status_failures
            .store(remaining - 1, Ordering::SeqCst);
        return (StatusCode::SERVICE_UNAVAILABLE, "try again").into_response();
    }
    state.record("status");

    let status = {
        let mut statuses = state.statuses.lock().unwrap();
        if statuses.len() > 1 {
            statuses.pop_front().unwrap_or_default()
        } else {
            statuses.front().cloned().unwrap_or_else(|| "success".to_string())
        }
    };

    Json(json!({
        "id": id,
        "status": status,
        "reportUrl": format!("{}/reports/{}.txt", state.base_url(), id),
        "stats": {"timeQueued": "2026-01-01T00:00:00Z"}
    }))
    .into_response()
}
