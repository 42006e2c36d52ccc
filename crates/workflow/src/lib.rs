//! # Research Workflow
//!
//! HTTP client for the preservation workflow engine.
//!
//! Every workflow operation is a `POST {workflow_url}/datasets/{id}/<action>` carrying the
//! dataset identifier and the workspace paths from the startup configuration. The engine answers
//! 2xx on success; failures come back as a JSON envelope
//! `{"kind": "...", "message": "...", "files": [...]}` which is decoded into the canonical
//! [`CollaboratorError`]. Anything else is treated as an upstream failure.
//!
//! `preserve_dataset` only enqueues packaging in the engine; this client never waits for the
//! workflow to finish.

#![warn(rust_2018_idioms)]

use research_core::{
    CollaboratorError, CollaboratorResult, DatasetId, ErrorKind, ResearchConfig, Workflow,
};
use reqwest::Client;
use std::path::Path;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowClientError {
    #[error("failed to build workflow HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// The workflow actions exposed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    ValidateMetadata,
    ValidateFiles,
    GenerateMetadata,
    Preserve,
}

impl Action {
    fn path(self) -> &'static [&'static str] {
        match self {
            Self::ValidateMetadata => &["validate", "metadata"],
            Self::ValidateFiles => &["validate", "files"],
            Self::GenerateMetadata => &["generate-metadata"],
            Self::Preserve => &["preserve"],
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct WorkflowRequest<'a> {
    dataset_id: &'a DatasetId,
    workspace_root: &'a Path,
    packaging_root: &'a Path,
}

#[derive(Debug, serde::Deserialize)]
struct WorkflowFailure {
    kind: ErrorKind,
    message: String,
    #[serde(default)]
    files: Vec<String>,
}

/// Workflow engine client. The engine location is taken from the configuration passed to each
/// call.
#[derive(Clone, Debug)]
pub struct WorkflowClient {
    client: Client,
}

impl WorkflowClient {
    pub fn new(cfg: &ResearchConfig) -> Result<Self, WorkflowClientError> {
        let client = Client::builder().timeout(cfg.request_timeout()).build()?;
        Ok(Self { client })
    }

    fn action_url(
        base_url: &Url,
        dataset_id: &DatasetId,
        action: Action,
    ) -> CollaboratorResult<Url> {
        let mut url = base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                CollaboratorError::new(
                    ErrorKind::Upstream,
                    format!("workflow URL cannot be a base: {base_url}"),
                )
            })?
            .pop_if_empty()
            .extend(["datasets", dataset_id.as_str()])
            .extend(action.path());
        Ok(url)
    }

    async fn dispatch(
        &self,
        dataset_id: &DatasetId,
        config: &ResearchConfig,
        action: Action,
    ) -> CollaboratorResult<()> {
        let url = Self::action_url(config.workflow_url(), dataset_id, action)?;
        let request = WorkflowRequest {
            dataset_id,
            workspace_root: config.workspace_root(),
            packaging_root: config.packaging_root(),
        };

        tracing::debug!(%url, ?action, "dispatching workflow action");
        let response = self
            .client
            .post(url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| CollaboratorError::unavailable(&url, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(decode_failure(&url, status.as_u16(), body))
    }
}

/// Turn a non-success engine response into the canonical error payload.
fn decode_failure(url: &Url, status: u16, body: String) -> CollaboratorError {
    match serde_json::from_str::<WorkflowFailure>(&body) {
        Ok(failure) => CollaboratorError {
            kind: failure.kind,
            message: failure.message,
            detail: None,
            related_ids: failure.files,
            upstream_status: Some(status),
        },
        Err(_) => CollaboratorError::upstream("POST", url, status, body),
    }
}

#[async_trait::async_trait]
impl Workflow for WorkflowClient {
    #[tracing::instrument(level = "debug", name = "WorkflowClient::validate_metadata", skip_all, fields(%dataset_id))]
    async fn validate_metadata(
        &self,
        dataset_id: &DatasetId,
        config: &ResearchConfig,
    ) -> CollaboratorResult<()> {
        self.dispatch(dataset_id, config, Action::ValidateMetadata)
            .await
    }

    #[tracing::instrument(level = "debug", name = "WorkflowClient::validate_files", skip_all, fields(%dataset_id))]
    async fn validate_files(
        &self,
        dataset_id: &DatasetId,
        config: &ResearchConfig,
    ) -> CollaboratorResult<()> {
        self.dispatch(dataset_id, config, Action::ValidateFiles)
            .await
    }

    #[tracing::instrument(level = "debug", name = "WorkflowClient::generate_metadata", skip_all, fields(%dataset_id))]
    async fn generate_metadata(
        &self,
        dataset_id: &DatasetId,
        config: &ResearchConfig,
    ) -> CollaboratorResult<()> {
        self.dispatch(dataset_id, config, Action::GenerateMetadata)
            .await
    }

    #[tracing::instrument(level = "debug", name = "WorkflowClient::preserve_dataset", skip_all, fields(%dataset_id))]
    async fn preserve_dataset(
        &self,
        dataset_id: &DatasetId,
        config: &ResearchConfig,
    ) -> CollaboratorResult<()> {
        self.dispatch(dataset_id, config, Action::Preserve).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Path as AxumPath, State},
        http::StatusCode,
        routing::post,
        Json, Router,
    };
    use research_core::ConfigFile;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<(String, Value)>>>;

    async fn validate_metadata(
        State(log): State<Log>,
        AxumPath(id): AxumPath<String>,
        Json(body): Json<Value>,
    ) -> (StatusCode, String) {
        log.lock().unwrap().push((format!("{id}/validate/metadata"), body));
        match id.as_str() {
            "1" => (StatusCode::OK, String::new()),
            "invalid" => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({"kind": "invalid_dataset", "message": "'title' is a required property"})
                    .to_string(),
            ),
            "gone" => (
                StatusCode::NOT_FOUND,
                json!({"kind": "dataset_not_available", "message": "Dataset not found"})
                    .to_string(),
            ),
            _ => (StatusCode::BAD_GATEWAY, "<html>proxy error</html>".into()),
        }
    }

    async fn validate_files(
        State(log): State<Log>,
        AxumPath(id): AxumPath<String>,
        Json(body): Json<Value>,
    ) -> (StatusCode, String) {
        log.lock().unwrap().push((format!("{id}/validate/files"), body));
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "kind": "missing_files",
                "message": "2 files are missing",
                "files": ["pid:urn:1", "pid:urn:2"]
            })
            .to_string(),
        )
    }

    async fn accept(
        State(log): State<Log>,
        AxumPath(id): AxumPath<String>,
        Json(body): Json<Value>,
    ) -> StatusCode {
        log.lock().unwrap().push((format!("{id}/accepted"), body));
        StatusCode::ACCEPTED
    }

    async fn spawn_engine() -> (WorkflowClient, ResearchConfig, Log) {
        let log: Log = Arc::default();
        let app = Router::new()
            .route(
                "/engine/datasets/:id/validate/metadata",
                post(validate_metadata),
            )
            .route("/engine/datasets/:id/validate/files", post(validate_files))
            .route("/engine/datasets/:id/generate-metadata", post(accept))
            .route("/engine/datasets/:id/preserve", post(accept))
            .with_state(log.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let cfg = ResearchConfig::new(ConfigFile {
            workflow_url: format!("http://{addr}/engine/"),
            workspace_root: "/srv/workspace".into(),
            ..ConfigFile::default()
        })
        .unwrap();
        (WorkflowClient::new(&cfg).unwrap(), cfg, log)
    }

    #[tokio::test]
    async fn success_forwards_configuration() {
        let (client, cfg, log) = spawn_engine().await;

        client
            .validate_metadata(&DatasetId::new("1"), &cfg)
            .await
            .unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log[0].0, "1/validate/metadata");
        assert_eq!(log[0].1["dataset_id"], "1");
        assert_eq!(log[0].1["workspace_root"], "/srv/workspace");
    }

    #[tokio::test]
    async fn failure_envelope_is_decoded() {
        let (client, cfg, _log) = spawn_engine().await;

        let err = client
            .validate_metadata(&DatasetId::new("invalid"), &cfg)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidDataset);
        assert_eq!(err.message, "'title' is a required property");

        let err = client
            .validate_metadata(&DatasetId::new("gone"), &cfg)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::DatasetNotFound);
    }

    #[tokio::test]
    async fn file_lists_are_carried_over() {
        let (client, cfg, _log) = spawn_engine().await;

        let err = client
            .validate_files(&DatasetId::new("1"), &cfg)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingFiles);
        assert_eq!(err.related_ids, vec!["pid:urn:1", "pid:urn:2"]);
    }

    #[tokio::test]
    async fn unrecognised_failure_is_upstream() {
        let (client, cfg, _log) = spawn_engine().await;

        let err = client
            .validate_metadata(&DatasetId::new("other"), &cfg)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Upstream);
        assert_eq!(err.upstream_status, Some(502));
        assert_eq!(err.detail.as_deref(), Some("<html>proxy error</html>"));
    }

    #[tokio::test]
    async fn preserve_is_accepted() {
        let (client, cfg, log) = spawn_engine().await;

        client
            .preserve_dataset(&DatasetId::new("1"), &cfg)
            .await
            .unwrap();
        client
            .generate_metadata(&DatasetId::new("1"), &cfg)
            .await
            .unwrap();

        assert_eq!(log.lock().unwrap().len(), 2);
    }

    #[test]
    fn action_urls_are_nested_under_base() {
        let base = Url::parse("http://engine.internal/api/").unwrap();
        let url =
            WorkflowClient::action_url(&base, &DatasetId::new("urn:1"), Action::ValidateFiles)
                .unwrap();
        assert_eq!(
            url.as_str(),
            "http://engine.internal/api/datasets/urn:1/validate/files"
        );
    }
}
