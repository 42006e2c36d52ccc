//! # Research Core
//!
//! Core logic of the research REST API.
//!
//! This crate contains everything between an inbound request and the external collaborators:
//! - Startup configuration (`ResearchConfig`)
//! - The `Catalog` and `Workflow` collaborator boundaries and their canonical error payload
//! - `DatasetService`, which dispatches actions, echoes preservation state to the catalog and
//!   shapes action outcomes
//!
//! **No API concerns**: routing, status codes and JSON envelopes belong in `api-rest`.

pub mod collaborators;
pub mod config;
pub mod constants;
pub mod datasets;
pub mod error;
pub mod outcome;

pub use collaborators::{Catalog, CatalogDataset, Workflow};
pub use config::{ConfigFile, ResearchConfig};
pub use datasets::DatasetService;
pub use error::{CollaboratorError, CollaboratorResult, ConfigError, ConfigResult, ErrorKind};
pub use outcome::{truncate_description, GenerationOutcome, PreservationOutcome, ValidationOutcome};
pub use research_types::{DatasetId, PreservationState};

#[cfg(any(feature = "testing", test))]
pub use collaborators::{MockCatalog, MockWorkflow};
