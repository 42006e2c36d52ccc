//! Per-request action outcomes.
//!
//! Domain-level failures (invalid metadata, malformed or missing files, failed metadata
//! generation) are *results*, not errors: they are folded into these values and reported with
//! `is_valid: false` / `success: false`. Anything else stays a [`CollaboratorError`].

use crate::constants::{DATASET_INVALID_ERROR, MAX_DESCRIPTION_CHARS, PACKAGING_STATUS};
use crate::error::{CollaboratorError, CollaboratorResult, ErrorKind};
use research_types::DatasetId;

/// Result of validating a dataset's metadata or files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub dataset_id: DatasetId,
    pub is_valid: bool,
    pub error: String,
    pub detailed_error: String,
    pub missing_files: Vec<String>,
    pub invalid_files: Vec<String>,
}

impl ValidationOutcome {
    pub fn valid(dataset_id: &DatasetId) -> Self {
        Self {
            dataset_id: dataset_id.clone(),
            is_valid: true,
            error: String::new(),
            detailed_error: String::new(),
            missing_files: Vec::new(),
            invalid_files: Vec::new(),
        }
    }

    /// Fold a collaborator result into a validation outcome.
    ///
    /// Invalid metadata and invalid/missing files become an invalid outcome; every other error
    /// kind is handed back unchanged.
    pub fn from_result(
        dataset_id: &DatasetId,
        result: CollaboratorResult<()>,
    ) -> CollaboratorResult<Self> {
        let err = match result {
            Ok(()) => return Ok(Self::valid(dataset_id)),
            Err(err) => err,
        };

        match err.kind {
            ErrorKind::InvalidDataset => Ok(Self {
                error: first_line(&err.message).to_owned(),
                detailed_error: err.message,
                ..Self::invalid(dataset_id)
            }),
            ErrorKind::InvalidFiles => {
                let (error, detailed_error) = file_errors(&err.related_ids, "are not well-formed");
                Ok(Self {
                    error,
                    detailed_error,
                    invalid_files: err.related_ids,
                    ..Self::invalid(dataset_id)
                })
            }
            ErrorKind::MissingFiles => {
                let (error, detailed_error) = file_errors(&err.related_ids, "are missing");
                Ok(Self {
                    error,
                    detailed_error,
                    missing_files: err.related_ids,
                    ..Self::invalid(dataset_id)
                })
            }
            ErrorKind::DatasetNotFound
            | ErrorKind::MetadataGeneration
            | ErrorKind::Upstream
            | ErrorKind::Unavailable => Err(err),
        }
    }

    fn invalid(dataset_id: &DatasetId) -> Self {
        Self {
            is_valid: false,
            ..Self::valid(dataset_id)
        }
    }
}

/// Result of generating technical metadata for a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub dataset_id: DatasetId,
    pub success: bool,
    pub error: String,
    pub detailed_error: String,
}

impl GenerationOutcome {
    pub fn succeeded(dataset_id: &DatasetId) -> Self {
        Self {
            dataset_id: dataset_id.clone(),
            success: true,
            error: String::new(),
            detailed_error: String::new(),
        }
    }

    pub fn failed(dataset_id: &DatasetId, message: impl Into<String>) -> Self {
        Self {
            dataset_id: dataset_id.clone(),
            success: false,
            error: DATASET_INVALID_ERROR.into(),
            detailed_error: message.into(),
        }
    }
}

/// Acknowledgement that a dataset was handed to the workflow engine for packaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreservationOutcome {
    pub dataset_id: DatasetId,
    pub status: &'static str,
}

impl PreservationOutcome {
    pub fn packaging(dataset_id: &DatasetId) -> Self {
        Self {
            dataset_id: dataset_id.clone(),
            status: PACKAGING_STATUS,
        }
    }
}

/// Cap a preservation description to the catalog's field length.
pub fn truncate_description(description: &str) -> String {
    description.chars().take(MAX_DESCRIPTION_CHARS).collect()
}

fn first_line(message: &str) -> &str {
    message.lines().next().unwrap_or_default()
}

fn file_errors(files: &[String], phrase: &str) -> (String, String) {
    let error = format!("{} files {phrase}", files.len());
    let mut detailed = format!("{error}:");
    for file in files {
        detailed.push('\n');
        detailed.push_str(file);
    }
    (error, detailed)
}
