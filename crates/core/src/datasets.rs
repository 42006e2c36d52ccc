//! Dataset action dispatcher.
//!
//! Each action reads the dataset from the catalog, calls the workflow engine, echoes the
//! resulting preservation state back to the catalog and returns an outcome for the REST layer.
//! A dataset missing from the catalog ends the action right after the read, so no state is ever
//! written for it.

use crate::collaborators::{Catalog, CatalogDataset, Workflow};
use crate::config::ResearchConfig;
use crate::constants::{
    FILES_INVALID_PREFIX, METADATA_GENERATED_DESCRIPTION, METADATA_GENERATION_FAILED_PREFIX,
    METADATA_INVALID_PREFIX, METADATA_VALID_DESCRIPTION, PACKAGING_DESCRIPTION,
};
use crate::error::{CollaboratorResult, ErrorKind};
use crate::outcome::{
    truncate_description, GenerationOutcome, PreservationOutcome, ValidationOutcome,
};
use research_types::{DatasetId, PreservationState};
use std::sync::Arc;

#[derive(Clone)]
pub struct DatasetService {
    cfg: Arc<ResearchConfig>,
    catalog: Arc<dyn Catalog>,
    workflow: Arc<dyn Workflow>,
}

impl DatasetService {
    pub fn new(
        cfg: Arc<ResearchConfig>,
        catalog: Arc<dyn Catalog>,
        workflow: Arc<dyn Workflow>,
    ) -> Self {
        Self {
            cfg,
            catalog,
            workflow,
        }
    }

    /// Validate dataset metadata and record the verdict in the catalog.
    pub async fn validate_metadata(
        &self,
        dataset_id: &DatasetId,
    ) -> CollaboratorResult<ValidationOutcome> {
        self.read_dataset(dataset_id).await?;

        let result = self.workflow.validate_metadata(dataset_id, &self.cfg).await;
        let outcome = ValidationOutcome::from_result(dataset_id, result)?;

        if outcome.is_valid {
            self.echo_state(
                dataset_id,
                PreservationState::ValidMetadata,
                METADATA_VALID_DESCRIPTION,
            )
            .await?;
        } else {
            tracing::warn!(%dataset_id, error = %outcome.error, "metadata validation failed");
            self.echo_state(
                dataset_id,
                PreservationState::MetadataValidationFailed,
                &format!("{METADATA_INVALID_PREFIX}{}", outcome.detailed_error),
            )
            .await?;
        }

        Ok(outcome)
    }

    /// Validate dataset files. Only a failed validation is recorded in the catalog.
    pub async fn validate_files(
        &self,
        dataset_id: &DatasetId,
    ) -> CollaboratorResult<ValidationOutcome> {
        self.read_dataset(dataset_id).await?;

        let result = self.workflow.validate_files(dataset_id, &self.cfg).await;
        let outcome = ValidationOutcome::from_result(dataset_id, result)?;

        if !outcome.is_valid {
            tracing::warn!(%dataset_id, error = %outcome.error, "file validation failed");
            self.echo_state(
                dataset_id,
                PreservationState::MetadataValidationFailed,
                &format!("{FILES_INVALID_PREFIX}{}", outcome.detailed_error),
            )
            .await?;
        }

        Ok(outcome)
    }

    /// Generate technical metadata for the dataset.
    ///
    /// Invalid dataset and generation failures are reported in the outcome with
    /// `success: false`; other failures are returned as errors.
    pub async fn generate_metadata(
        &self,
        dataset_id: &DatasetId,
    ) -> CollaboratorResult<GenerationOutcome> {
        self.read_dataset(dataset_id).await?;

        let err = match self.workflow.generate_metadata(dataset_id, &self.cfg).await {
            Ok(()) => {
                self.echo_state(
                    dataset_id,
                    PreservationState::TechnicalMetadataGenerated,
                    METADATA_GENERATED_DESCRIPTION,
                )
                .await?;
                return Ok(GenerationOutcome::succeeded(dataset_id));
            }
            Err(err) => err,
        };

        match err.kind {
            ErrorKind::InvalidDataset | ErrorKind::MetadataGeneration => {
                tracing::error!(%dataset_id, error = %err.message, "metadata generation failed");
                self.echo_state(
                    dataset_id,
                    PreservationState::TechnicalMetadataGenerationFailed,
                    &format!("{METADATA_GENERATION_FAILED_PREFIX}{}", err.message),
                )
                .await?;
                Ok(GenerationOutcome::failed(dataset_id, err.message))
            }
            ErrorKind::DatasetNotFound
            | ErrorKind::InvalidFiles
            | ErrorKind::MissingFiles
            | ErrorKind::Upstream
            | ErrorKind::Unavailable => Err(err),
        }
    }

    /// Hand the dataset to the workflow engine for packaging.
    ///
    /// Returns as soon as the engine accepted the command. State 90 is written only after that,
    /// so a refused dispatch leaves the catalog untouched. A failed write after acceptance is
    /// still reported as an error even though packaging has started.
    pub async fn preserve(&self, dataset_id: &DatasetId) -> CollaboratorResult<PreservationOutcome> {
        self.read_dataset(dataset_id).await?;

        self.workflow.preserve_dataset(dataset_id, &self.cfg).await?;
        tracing::info!(%dataset_id, "dataset accepted for packaging");

        self.echo_state(
            dataset_id,
            PreservationState::InPackagingService,
            PACKAGING_DESCRIPTION,
        )
        .await?;

        Ok(PreservationOutcome::packaging(dataset_id))
    }

    async fn read_dataset(&self, dataset_id: &DatasetId) -> CollaboratorResult<CatalogDataset> {
        let dataset = self.catalog.get_dataset(dataset_id).await?;
        tracing::debug!(
            %dataset_id,
            state = ?dataset.preservation_state,
            "dataset found in catalog"
        );
        Ok(dataset)
    }

    async fn echo_state(
        &self,
        dataset_id: &DatasetId,
        state: PreservationState,
        description: &str,
    ) -> CollaboratorResult<()> {
        self.catalog
            .set_preservation_state(dataset_id, state, &truncate_description(description))
            .await
    }
}
