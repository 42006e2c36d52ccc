//! Error classifier for the REST API.
//!
//! Every failure leaving a handler goes through [`ApiError`], which picks the status code, the
//! `{code, error}` envelope and the log line. Upstream diagnostics (URLs, response bodies) are
//! written to the log only; clients get fixed texts.

use api_shared::ErrorRes;
use axum::{
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use research_core::{CollaboratorError, ErrorKind};

/// Werkzeug-compatible description used for façade-level bad requests.
pub const BAD_REQUEST_MESSAGE: &str =
    "The browser (or proxy) sent a request that this server could not understand.";

/// Werkzeug-compatible description used when a route exists but not for the request method.
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "The method is not allowed for the requested URL.";

pub const DATASET_NOT_FOUND: &str = "Dataset not found";
pub const INTERNAL_SERVER_ERROR: &str = "Internal server error";
pub const SERVICE_UNAVAILABLE: &str = "Service unavailable";

#[derive(Debug)]
pub enum ApiError {
    /// A collaborator call failed in a way that is not a domain result.
    Collaborator(CollaboratorError),
    /// The façade itself rejected the request.
    Abort { status: StatusCode, message: String },
}

impl ApiError {
    pub fn abort(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Abort {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request() -> Self {
        Self::abort(StatusCode::BAD_REQUEST, BAD_REQUEST_MESSAGE)
    }

    pub fn method_not_allowed() -> Self {
        Self::abort(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE)
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Collaborator(err) => match err.kind {
                ErrorKind::DatasetNotFound => StatusCode::NOT_FOUND,
                ErrorKind::Upstream if err.upstream_status == Some(404) => StatusCode::NOT_FOUND,
                ErrorKind::Upstream => StatusCode::INTERNAL_SERVER_ERROR,
                ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::InvalidDataset
                | ErrorKind::InvalidFiles
                | ErrorKind::MissingFiles
                | ErrorKind::MetadataGeneration => StatusCode::BAD_REQUEST,
            },
            Self::Abort { status, .. } => *status,
        }
    }

    /// Client-visible error text.
    fn client_message(&self) -> String {
        match self {
            Self::Collaborator(err) => match err.kind {
                ErrorKind::DatasetNotFound => DATASET_NOT_FOUND.into(),
                ErrorKind::Upstream if err.upstream_status == Some(404) => {
                    DATASET_NOT_FOUND.into()
                }
                ErrorKind::Upstream => INTERNAL_SERVER_ERROR.into(),
                ErrorKind::Unavailable => SERVICE_UNAVAILABLE.into(),
                ErrorKind::InvalidDataset
                | ErrorKind::InvalidFiles
                | ErrorKind::MissingFiles
                | ErrorKind::MetadataGeneration => {
                    status_line(StatusCode::BAD_REQUEST, &err.message)
                }
            },
            Self::Abort { status, message } => status_line(*status, message),
        }
    }

    fn log(&self) {
        match self {
            Self::Collaborator(err) => match err.kind {
                ErrorKind::DatasetNotFound => {
                    tracing::error!(message = %err.message, "dataset not found");
                }
                ErrorKind::Upstream | ErrorKind::Unavailable => {
                    tracing::error!(
                        kind = ?err.kind,
                        message = %err.message,
                        status = ?err.upstream_status,
                        detail = err.detail.as_deref().unwrap_or_default(),
                        "upstream request failed"
                    );
                }
                ErrorKind::InvalidDataset
                | ErrorKind::InvalidFiles
                | ErrorKind::MissingFiles
                | ErrorKind::MetadataGeneration => {
                    tracing::warn!(
                        kind = ?err.kind,
                        message = %err.message,
                        files = ?err.related_ids,
                        "unexpected domain failure"
                    );
                }
            },
            Self::Abort { status, message } if status.is_server_error() => {
                tracing::error!(status = status.as_u16(), %message, "request aborted");
            }
            Self::Abort { status, message } => {
                tracing::warn!(status = status.as_u16(), %message, "request rejected");
            }
        }
    }
}

impl From<CollaboratorError> for ApiError {
    fn from(err: CollaboratorError) -> Self {
        Self::Collaborator(err)
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::abort(rejection.status(), rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        let body = ErrorRes {
            code: status.as_u16(),
            error: self.client_message(),
        };
        (status, Json(body)).into_response()
    }
}

/// `"<code> <reason>: <message>"`, the format used by façade-level errors.
fn status_line(status: StatusCode, message: &str) -> String {
    format!(
        "{} {}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown"),
        message
    )
}
