//! JSON response bodies.
//!
//! Field order is the serialisation order, so identical outcomes always produce identical bytes.

use research_core::{GenerationOutcome, PreservationOutcome, ValidationOutcome};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidateMetadataRes {
    pub dataset_id: String,
    pub is_valid: bool,
    /// First line of the validation error, empty when valid.
    pub error: String,
    /// Full validation error, empty when valid.
    pub detailed_error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ValidateFilesRes {
    pub dataset_id: String,
    pub is_valid: bool,
    pub error: String,
    pub detailed_error: String,
    pub missing_files: Vec<String>,
    pub invalid_files: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct GenerateMetadataRes {
    pub dataset_id: String,
    pub success: bool,
    pub error: String,
    pub detailed_error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct PreserveRes {
    pub dataset_id: String,
    /// Always `packaging`.
    pub status: String,
}

/// Envelope for every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorRes {
    pub code: u16,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

impl From<ValidationOutcome> for ValidateMetadataRes {
    fn from(outcome: ValidationOutcome) -> Self {
        Self {
            dataset_id: outcome.dataset_id.to_string(),
            is_valid: outcome.is_valid,
            error: outcome.error,
            detailed_error: outcome.detailed_error,
        }
    }
}

impl From<ValidationOutcome> for ValidateFilesRes {
    fn from(outcome: ValidationOutcome) -> Self {
        Self {
            dataset_id: outcome.dataset_id.to_string(),
            is_valid: outcome.is_valid,
            error: outcome.error,
            detailed_error: outcome.detailed_error,
            missing_files: outcome.missing_files,
            invalid_files: outcome.invalid_files,
        }
    }
}

impl From<GenerationOutcome> for GenerateMetadataRes {
    fn from(outcome: GenerationOutcome) -> Self {
        Self {
            dataset_id: outcome.dataset_id.to_string(),
            success: outcome.success,
            error: outcome.error,
            detailed_error: outcome.detailed_error,
        }
    }
}

impl From<PreservationOutcome> for PreserveRes {
    fn from(outcome: PreservationOutcome) -> Self {
        Self {
            dataset_id: outcome.dataset_id.to_string(),
            status: outcome.status.to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_core::DatasetId;
    use serde_json::json;

    #[test]
    fn files_response_keeps_both_lists() {
        let outcome = ValidationOutcome {
            invalid_files: vec!["pid:urn:1".into()],
            ..ValidationOutcome::valid(&DatasetId::new("1"))
        };
        let body = serde_json::to_value(ValidateFilesRes::from(outcome)).unwrap();
        assert_eq!(
            body,
            json!({
                "dataset_id": "1",
                "is_valid": true,
                "error": "",
                "detailed_error": "",
                "missing_files": [],
                "invalid_files": ["pid:urn:1"]
            })
        );
    }

    #[test]
    fn metadata_response_omits_file_lists() {
        let outcome = ValidationOutcome::valid(&DatasetId::new("1"));
        let body = serde_json::to_string(&ValidateMetadataRes::from(outcome)).unwrap();
        assert_eq!(
            body,
            r#"{"dataset_id":"1","is_valid":true,"error":"","detailed_error":""}"#
        );
    }

    #[test]
    fn preserve_response_reports_packaging() {
        let body = serde_json::to_value(PreserveRes::from(PreservationOutcome::packaging(
            &DatasetId::new("urn:1"),
        )))
        .unwrap();
        assert_eq!(body, json!({"dataset_id": "urn:1", "status": "packaging"}));
    }
}
