//! Full request path: REST router, dataset service and the real HTTP clients talking to stub
//! Metax and workflow servers.

use api_rest::{router, AppState};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{Method, Request, StatusCode},
    routing::{get, post},
    Json, Router,
};
use http_body_util::BodyExt;
use research_core::{ConfigFile, DatasetService, ResearchConfig};
use research_metax::MetaxClient;
use research_workflow::WorkflowClient;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Debug, Clone)]
struct MetaxCall {
    method: &'static str,
    dataset_id: String,
    body: Option<Value>,
}

type MetaxLog = Arc<Mutex<Vec<MetaxCall>>>;

async fn read_dataset(State(log): State<MetaxLog>, Path(id): Path<String>) -> (StatusCode, String) {
    log.lock().unwrap().push(MetaxCall {
        method: "GET",
        dataset_id: id.clone(),
        body: None,
    });
    match id.as_str() {
        "1" => (
            StatusCode::OK,
            json!({"identifier": "1", "preservation_state": 10}).to_string(),
        ),
        "crash" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "psycopg2.OperationalError: could not connect".into(),
        ),
        _ => (StatusCode::NOT_FOUND, String::new()),
    }
}

async fn patch_dataset(
    State(log): State<MetaxLog>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> StatusCode {
    log.lock().unwrap().push(MetaxCall {
        method: "PATCH",
        dataset_id: id,
        body: Some(body),
    });
    StatusCode::OK
}

async fn engine_accepts() -> StatusCode {
    StatusCode::OK
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
}

async fn app() -> (Router, MetaxLog) {
    let log: MetaxLog = Arc::default();
    let metax = spawn(
        Router::new()
            .route("/rest/v1/datasets/:id", get(read_dataset).patch(patch_dataset))
            .with_state(log.clone()),
    )
    .await;
    let engine = spawn(
        Router::new()
            .route("/datasets/:id/validate/metadata", post(engine_accepts))
            .route("/datasets/:id/validate/files", post(engine_accepts))
            .route("/datasets/:id/generate-metadata", post(engine_accepts))
            .route("/datasets/:id/preserve", post(engine_accepts)),
    )
    .await;

    let cfg = Arc::new(
        ResearchConfig::new(ConfigFile {
            metax_url: metax,
            workflow_url: engine,
            ..ConfigFile::default()
        })
        .unwrap(),
    );
    let datasets = DatasetService::new(
        cfg.clone(),
        Arc::new(MetaxClient::new(&cfg).unwrap()),
        Arc::new(WorkflowClient::new(&cfg).unwrap()),
    );
    (router(AppState::new(datasets)), log)
}

async fn send_post(app: Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

/// Log sink shared with the test body.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

#[tokio::test]
async fn valid_metadata_is_written_back() {
    let (app, log) = app().await;

    let (status, body) = send_post(app, "/dataset/1/validate/metadata").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        r#"{"dataset_id":"1","is_valid":true,"error":"","detailed_error":""}"#
    );
    let log = log.lock().unwrap();
    let last = log.last().unwrap();
    assert_eq!(last.method, "PATCH");
    assert_eq!(
        last.body,
        Some(json!({
            "preservation_state": 70,
            "preservation_description": "Metadata passed validation"
        }))
    );
}

#[tokio::test]
async fn unknown_dataset_is_only_read() {
    for action in ["validate/metadata", "validate/files", "genmetadata", "preserve"] {
        let (app, log) = app().await;

        let (status, body) = send_post(app, &format!("/dataset/not_available_id/{action}")).await;

        assert_eq!(status, StatusCode::NOT_FOUND, "{action}");
        assert_eq!(body, r#"{"code":404,"error":"Dataset not found"}"#);
        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1, "{action}");
        assert_eq!(log[0].method, "GET");
        assert_eq!(log[0].dataset_id, "not_available_id");
    }
}

#[tokio::test]
async fn preserve_is_accepted_and_recorded() {
    let (app, log) = app().await;

    let (status, body) = send_post(app, "/dataset/1/preserve").await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body, r#"{"dataset_id":"1","status":"packaging"}"#);
    let log = log.lock().unwrap();
    assert_eq!(
        log.last().unwrap().body,
        Some(json!({
            "preservation_state": 90,
            "preservation_description": "In packaging service"
        }))
    );
}

#[tokio::test]
async fn catalog_crash_is_logged_not_leaked() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let (app, _log) = app().await;
    let (status, body) = send_post(app, "/dataset/crash/validate/metadata").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, r#"{"code":500,"error":"Internal server error"}"#);

    let logs = captured.text();
    assert!(logs.contains("/rest/v1/datasets/crash"), "{logs}");
    assert!(logs.contains("psycopg2.OperationalError"), "{logs}");
}
