use std::path::PathBuf;

/// Kind of failure reported by a collaborator (catalog or workflow engine).
///
/// The REST layer matches on this exhaustively to pick a status code and response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The dataset does not exist in (or is not available from) the catalog.
    #[serde(alias = "dataset_not_available")]
    DatasetNotFound,
    /// Dataset metadata failed schema validation.
    InvalidDataset,
    /// One or more files are not well-formed.
    InvalidFiles,
    /// One or more files could not be retrieved from storage.
    MissingFiles,
    /// Technical metadata could not be generated.
    MetadataGeneration,
    /// An upstream service answered with a non-success status.
    Upstream,
    /// An upstream service could not be reached.
    Unavailable,
}

/// Canonical failure payload returned by every collaborator call.
///
/// `message` is safe to show to clients for domain failures. `detail` holds diagnostics (for
/// example an upstream response body) that must only ever be logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind:?}: {message}")]
pub struct CollaboratorError {
    pub kind: ErrorKind,
    pub message: String,
    pub detail: Option<String>,
    pub related_ids: Vec<String>,
    pub upstream_status: Option<u16>,
}

impl CollaboratorError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
            related_ids: Vec::new(),
            upstream_status: None,
        }
    }

    pub fn dataset_not_found(dataset_id: impl std::fmt::Display) -> Self {
        Self::new(
            ErrorKind::DatasetNotFound,
            format!("Could not find metadata for dataset: {dataset_id}"),
        )
    }

    pub fn invalid_dataset(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidDataset, message)
    }

    pub fn invalid_files(files: Vec<String>) -> Self {
        Self {
            related_ids: files,
            ..Self::new(ErrorKind::InvalidFiles, "Some files are not well-formed")
        }
    }

    pub fn missing_files(files: Vec<String>) -> Self {
        Self {
            related_ids: files,
            ..Self::new(ErrorKind::MissingFiles, "Some files are missing")
        }
    }

    pub fn metadata_generation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MetadataGeneration, message)
    }

    /// An upstream call answered with `status`. The body goes to `detail` so it is only logged.
    pub fn upstream(method: &str, url: impl std::fmt::Display, status: u16, body: String) -> Self {
        Self {
            detail: Some(body),
            upstream_status: Some(status),
            ..Self::new(
                ErrorKind::Upstream,
                format!("{method} {url} returned HTTP {status}"),
            )
        }
    }

    /// An upstream call never produced a response.
    pub fn unavailable(url: impl std::fmt::Display, cause: impl std::fmt::Display) -> Self {
        Self {
            detail: Some(cause.to_string()),
            ..Self::new(ErrorKind::Unavailable, format!("Could not reach {url}"))
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

pub type CollaboratorResult<T> = std::result::Result<T, CollaboratorError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}", path = path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}", path = path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
