//! Service runtime configuration.
//!
//! Configuration is resolved once at process startup and then handed to the dataset service and
//! its collaborators by reference. Request handling never reads the environment or the config
//! file again.

use crate::constants::{
    DEFAULT_METAX_URL, DEFAULT_PACKAGING_ROOT, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_WORKFLOW_URL,
    DEFAULT_WORKSPACE_ROOT,
};
use crate::error::{ConfigError, ConfigResult};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Configuration resolved at startup.
#[derive(Clone, PartialEq, Eq)]
pub struct ResearchConfig {
    metax_url: Url,
    metax_user: String,
    metax_password: String,
    metax_ssl_verification: bool,
    workflow_url: Url,
    workspace_root: PathBuf,
    packaging_root: PathBuf,
    request_timeout: Duration,
}

impl std::fmt::Debug for ResearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchConfig")
            .field("metax_url", &self.metax_url.as_str())
            .field("metax_user", &self.metax_user)
            .field("metax_password", &"<redacted>")
            .field("metax_ssl_verification", &self.metax_ssl_verification)
            .field("workflow_url", &self.workflow_url.as_str())
            .field("workspace_root", &self.workspace_root)
            .field("packaging_root", &self.packaging_root)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// On-disk representation of the configuration file.
///
/// Every key is optional; missing keys fall back to the defaults in [`crate::constants`].
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub metax_url: String,
    pub metax_user: String,
    pub metax_password: String,
    pub metax_ssl_verification: bool,
    pub workflow_url: String,
    pub workspace_root: PathBuf,
    pub packaging_root: PathBuf,
    pub request_timeout_secs: u64,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            metax_url: DEFAULT_METAX_URL.into(),
            metax_user: String::new(),
            metax_password: String::new(),
            metax_ssl_verification: true,
            workflow_url: DEFAULT_WORKFLOW_URL.into(),
            workspace_root: PathBuf::from(DEFAULT_WORKSPACE_ROOT),
            packaging_root: PathBuf::from(DEFAULT_PACKAGING_ROOT),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ResearchConfig {
    /// Build a validated configuration from raw file values.
    pub fn new(file: ConfigFile) -> ConfigResult<Self> {
        let metax_url = parse_http_url("metax_url", &file.metax_url)?;
        let workflow_url = parse_http_url("workflow_url", &file.workflow_url)?;

        if file.workspace_root.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "workspace_root",
                reason: "workspace_root cannot be empty".into(),
            });
        }
        if file.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs",
                reason: "timeout must be at least one second".into(),
            });
        }

        Ok(Self {
            metax_url,
            metax_user: file.metax_user,
            metax_password: file.metax_password,
            metax_ssl_verification: file.metax_ssl_verification,
            workflow_url,
            workspace_root: file.workspace_root,
            packaging_root: file.packaging_root,
            request_timeout: Duration::from_secs(file.request_timeout_secs),
        })
    }

    /// Read and validate a YAML configuration file.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(path, &contents)
    }

    /// Load configuration from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            tracing::info!(
                "{} doesn't exist; using default settings",
                path.display()
            );
            return Self::new(ConfigFile::default());
        }
        Self::from_file(path)
    }

    fn from_yaml(path: &Path, contents: &str) -> ConfigResult<Self> {
        // An empty file is valid YAML for "no overrides".
        if contents.trim().is_empty() {
            return Self::new(ConfigFile::default());
        }
        let file: ConfigFile = serde_yaml::from_str(contents).map_err(|source| {
            ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::new(file)
    }

    pub fn metax_url(&self) -> &Url {
        &self.metax_url
    }

    pub fn metax_user(&self) -> &str {
        &self.metax_user
    }

    pub fn metax_password(&self) -> &str {
        &self.metax_password
    }

    pub fn metax_ssl_verification(&self) -> bool {
        self.metax_ssl_verification
    }

    pub fn workflow_url(&self) -> &Url {
        &self.workflow_url
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    pub fn packaging_root(&self) -> &Path {
        &self.packaging_root
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }
}

fn parse_http_url(key: &'static str, value: &str) -> ConfigResult<Url> {
    let url = Url::parse(value.trim()).map_err(|e| ConfigError::InvalidValue {
        key,
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidValue {
            key,
            reason: format!("unsupported scheme '{other}', expected http or https"),
        }),
    }
}
