//! Boundaries to the external services this façade delegates to.
//!
//! Both traits return [`CollaboratorResult`] so callers only ever see the canonical
//! [`crate::CollaboratorError`] payload, whatever the transport underneath.

use crate::config::ResearchConfig;
use crate::error::CollaboratorResult;
use research_types::{DatasetId, PreservationState};
use serde::{Deserialize, Deserializer};

/// The subset of a catalog dataset record read by this service.
///
/// The read only has to prove that the dataset exists, so a preservation state code this
/// service does not know is logged and dropped rather than failing the request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogDataset {
    pub identifier: String,
    #[serde(default, deserialize_with = "known_state_or_none")]
    pub preservation_state: Option<PreservationState>,
}

fn known_state_or_none<'de, D>(deserializer: D) -> Result<Option<PreservationState>, D::Error>
where
    D: Deserializer<'de>,
{
    let code = Option::<i64>::deserialize(deserializer)?;
    Ok(code.and_then(|code| match PreservationState::try_from(code) {
        Ok(state) => Some(state),
        Err(err) => {
            tracing::warn!(code, %err, "ignoring preservation state");
            None
        }
    }))
}

/// Metadata catalog holding datasets and their preservation state.
#[cfg_attr(any(feature = "testing", test), mockall::automock)]
#[async_trait::async_trait]
pub trait Catalog: Send + Sync {
    async fn get_dataset(&self, dataset_id: &DatasetId) -> CollaboratorResult<CatalogDataset>;

    async fn set_preservation_state(
        &self,
        dataset_id: &DatasetId,
        state: PreservationState,
        description: &str,
    ) -> CollaboratorResult<()>;
}

/// Preservation workflow engine.
///
/// `preserve_dataset` only hands the dataset over; packaging continues in the engine after the
/// call returns.
#[cfg_attr(any(feature = "testing", test), mockall::automock)]
#[async_trait::async_trait]
pub trait Workflow: Send + Sync {
    async fn validate_metadata(
        &self,
        dataset_id: &DatasetId,
        config: &ResearchConfig,
    ) -> CollaboratorResult<()>;

    async fn validate_files(
        &self,
        dataset_id: &DatasetId,
        config: &ResearchConfig,
    ) -> CollaboratorResult<()>;

    async fn generate_metadata(
        &self,
        dataset_id: &DatasetId,
        config: &ResearchConfig,
    ) -> CollaboratorResult<()>;

    async fn preserve_dataset(
        &self,
        dataset_id: &DatasetId,
        config: &ResearchConfig,
    ) -> CollaboratorResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_state_is_decoded() {
        let dataset: CatalogDataset =
            serde_json::from_str(r#"{"identifier": "1", "preservation_state": 60}"#).unwrap();
        assert_eq!(
            dataset.preservation_state,
            Some(PreservationState::ValidatedMetadataUpdated)
        );
    }

    #[test]
    fn unlisted_state_does_not_fail_the_read() {
        let dataset: CatalogDataset =
            serde_json::from_str(r#"{"identifier": "1", "preservation_state": 65}"#).unwrap();
        assert_eq!(dataset.identifier, "1");
        assert_eq!(dataset.preservation_state, None);
    }

    #[test]
    fn missing_or_null_state_is_none() {
        let missing: CatalogDataset = serde_json::from_str(r#"{"identifier": "1"}"#).unwrap();
        let null: CatalogDataset =
            serde_json::from_str(r#"{"identifier": "1", "preservation_state": null}"#).unwrap();
        assert_eq!(missing.preservation_state, None);
        assert_eq!(null.preservation_state, None);
    }
}
