//! Constants used throughout the research core crate.
//!
//! Default configuration values and the fixed texts written back to the catalog live here so
//! the response contract and the preservation-state echo stay in one place.

/// Default location of the service configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/research-rest-api/research-rest-api.yaml";

/// Default catalog (Metax) base URL.
pub const DEFAULT_METAX_URL: &str = "http://localhost:8888";

/// Default workflow engine base URL.
pub const DEFAULT_WORKFLOW_URL: &str = "http://localhost:8090";

/// Default workspace root forwarded to the workflow engine.
pub const DEFAULT_WORKSPACE_ROOT: &str = "/var/spool/siptools-research";

/// Default packaging root forwarded to the workflow engine.
pub const DEFAULT_PACKAGING_ROOT: &str = "/var/spool/siptools-research/packaging";

/// Default timeout for outbound HTTP requests, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Maximum number of characters of a preservation description sent to the catalog.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

pub const METADATA_VALID_DESCRIPTION: &str = "Metadata passed validation";
pub const METADATA_INVALID_PREFIX: &str = "Metadata did not pass validation: ";
pub const FILES_INVALID_PREFIX: &str = "File validation failed: ";
pub const METADATA_GENERATED_DESCRIPTION: &str = "Metadata generated";
pub const METADATA_GENERATION_FAILED_PREFIX: &str = "Metadata generation failed: ";
pub const PACKAGING_DESCRIPTION: &str = "In packaging service";

/// Short error returned to clients when metadata generation fails.
pub const DATASET_INVALID_ERROR: &str = "Dataset is invalid";

/// Status reported once a dataset has been handed to the workflow engine for packaging.
pub const PACKAGING_STATUS: &str = "packaging";
