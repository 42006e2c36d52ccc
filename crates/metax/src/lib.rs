//! # Research Metax
//!
//! HTTP client for the Metax metadata catalog.
//!
//! Implements [`research_core::Catalog`] over the Metax REST API:
//! - `GET {metax_url}/rest/v1/datasets/{id}` reads a dataset
//! - `PATCH {metax_url}/rest/v1/datasets/{id}` updates its preservation state
//!
//! A 404 from Metax becomes [`ErrorKind::DatasetNotFound`]; any other non-success status
//! becomes [`ErrorKind::Upstream`] carrying the response body for server-side logging only.

#![warn(rust_2018_idioms)]

use research_core::{
    Catalog, CatalogDataset, CollaboratorError, CollaboratorResult, DatasetId, ErrorKind,
    PreservationState, ResearchConfig,
};
use reqwest::{Client, Method, StatusCode};
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum MetaxError {
    #[error("failed to build Metax HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

#[derive(Debug, serde::Serialize)]
struct PreservationStatePatch<'a> {
    preservation_state: PreservationState,
    preservation_description: &'a str,
}

/// Metax catalog client.
#[derive(Clone)]
pub struct MetaxClient {
    client: Client,
    base_url: Url,
    user: String,
    password: String,
}

impl std::fmt::Debug for MetaxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetaxClient")
            .field("base_url", &self.base_url.as_str())
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl MetaxClient {
    /// Build a client from the startup configuration.
    ///
    /// Certificate verification is disabled when `metax_ssl_verification` is false.
    pub fn new(cfg: &ResearchConfig) -> Result<Self, MetaxError> {
        let client = Client::builder()
            .timeout(cfg.request_timeout())
            .danger_accept_invalid_certs(!cfg.metax_ssl_verification())
            .build()?;

        Ok(Self {
            client,
            base_url: cfg.metax_url().clone(),
            user: cfg.metax_user().to_owned(),
            password: cfg.metax_password().to_owned(),
        })
    }

    fn dataset_url(&self, dataset_id: &DatasetId) -> CollaboratorResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                CollaboratorError::new(
                    ErrorKind::Upstream,
                    format!("Metax URL cannot be a base: {}", self.base_url),
                )
            })?
            .pop_if_empty()
            .extend(["rest", "v1", "datasets", dataset_id.as_str()]);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, url);
        if self.user.is_empty() {
            builder
        } else {
            builder.basic_auth(&self.user, Some(&self.password))
        }
    }

    /// Send a request and classify a non-success answer.
    async fn send(
        &self,
        method: Method,
        url: Url,
        dataset_id: &DatasetId,
        build: impl FnOnce(reqwest::RequestBuilder) -> reqwest::RequestBuilder,
    ) -> CollaboratorResult<reqwest::Response> {
        let response = build(self.request(method.clone(), url.clone()))
            .send()
            .await
            .map_err(|e| CollaboratorError::unavailable(&url, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(CollaboratorError::dataset_not_found(dataset_id));
        }

        let body = response.text().await.unwrap_or_default();
        Err(CollaboratorError::upstream(
            method.as_str(),
            &url,
            status.as_u16(),
            body,
        ))
    }
}

#[async_trait::async_trait]
impl Catalog for MetaxClient {
    #[tracing::instrument(level = "debug", name = "MetaxClient::get_dataset", skip_all, fields(%dataset_id))]
    async fn get_dataset(&self, dataset_id: &DatasetId) -> CollaboratorResult<CatalogDataset> {
        let url = self.dataset_url(dataset_id)?;
        let response = self
            .send(Method::GET, url.clone(), dataset_id, |req| req)
            .await?;

        response.json::<CatalogDataset>().await.map_err(|e| {
            CollaboratorError::new(
                ErrorKind::Upstream,
                format!("GET {url} returned an unreadable dataset"),
            )
            .with_detail(e.to_string())
        })
    }

    #[tracing::instrument(
        level = "debug",
        name = "MetaxClient::set_preservation_state",
        skip_all,
        fields(%dataset_id, %state)
    )]
    async fn set_preservation_state(
        &self,
        dataset_id: &DatasetId,
        state: PreservationState,
        description: &str,
    ) -> CollaboratorResult<()> {
        let url = self.dataset_url(dataset_id)?;
        let patch = PreservationStatePatch {
            preservation_state: state,
            preservation_description: description,
        };

        self.send(Method::PATCH, url, dataset_id, |req| req.json(&patch))
            .await?;
        Ok(())
    }
}
