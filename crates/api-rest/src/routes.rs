use crate::error::ApiError;
use api_shared::{
    ErrorRes, GenerateMetadataRes, HealthRes, HealthService, PreserveRes, ValidateFilesRes,
    ValidateMetadataRes,
};
use axum::{
    extract::{FromRequestParts, Path as AxumPath, State},
    http::{Method, StatusCode, Uri},
    response::Json,
    routing::{any, get, post},
    Router,
};
use research_core::{DatasetId, DatasetService};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across REST API handlers
///
/// Holds the dataset service, which in turn owns the startup configuration and the collaborator
/// clients. Nothing in here is mutated after startup.
#[derive(Clone)]
pub struct AppState {
    datasets: DatasetService,
}

impl AppState {
    pub fn new(datasets: DatasetService) -> Self {
        Self { datasets }
    }
}

/// Dataset identifier taken from the request path.
///
/// Rejections (for example an identifier that is not valid UTF-8 once percent-decoded) are
/// answered with the standard error envelope.
#[derive(FromRequestParts)]
#[from_request(rejection(ApiError))]
struct DatasetPath(#[from_request(via(AxumPath))] DatasetId);

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        validate_metadata,
        validate_metadata_legacy,
        validate_files,
        generate_metadata,
        preserve,
        package,
    ),
    components(schemas(
        HealthRes,
        ValidateMetadataRes,
        ValidateFilesRes,
        GenerateMetadataRes,
        PreserveRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Build the REST router.
///
/// `/` and every unknown path answer 400 with the standard error envelope.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", any(index))
        .route("/health", get(health).fallback(wrong_method))
        .route(
            "/dataset/:dataset_id/validate",
            post(validate_metadata_legacy).fallback(wrong_method),
        )
        .route(
            "/dataset/:dataset_id/validate/metadata",
            post(validate_metadata).fallback(wrong_method),
        )
        .route(
            "/dataset/:dataset_id/validate/files",
            post(validate_files).fallback(wrong_method),
        )
        .route(
            "/dataset/:dataset_id/genmetadata",
            post(generate_metadata).fallback(wrong_method),
        )
        .route(
            "/dataset/:dataset_id/preserve",
            post(preserve).fallback(wrong_method),
        )
        .route(
            "/dataset/:dataset_id/package",
            post(package).fallback(wrong_method),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(unrecognised)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Accessing the root URL always returns a Bad Request error.
async fn index() -> ApiError {
    ApiError::bad_request()
}

async fn unrecognised(uri: Uri) -> ApiError {
    tracing::debug!(%uri, "no route");
    ApiError::bad_request()
}

async fn wrong_method(method: Method, uri: Uri) -> ApiError {
    tracing::debug!(%method, %uri, "method not routed");
    ApiError::method_not_allowed()
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Reports that the process is up. Collaborators are not contacted.
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/dataset/{dataset_id}/validate/metadata",
    params(("dataset_id" = String, Path, description = "Catalog identifier of the dataset")),
    responses(
        (status = 200, description = "Validation result, valid or not", body = ValidateMetadataRes),
        (status = 404, description = "Dataset not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes),
        (status = 503, description = "Upstream service unreachable", body = ErrorRes)
    )
)]
/// Validate dataset metadata
///
/// Invalid metadata is a normal result: the response is 200 with `is_valid: false`, the first
/// line of the validator message in `error` and the full message in `detailed_error`.
///
/// # Errors
/// Returns `404 Not Found` if the dataset is not in the catalog, and `500`/`503` if the catalog
/// or workflow engine fails.
#[axum::debug_handler]
async fn validate_metadata(
    State(state): State<AppState>,
    DatasetPath(dataset_id): DatasetPath,
) -> Result<Json<ValidateMetadataRes>, ApiError> {
    let outcome = state.datasets.validate_metadata(&dataset_id).await?;
    Ok(Json(outcome.into()))
}

#[utoipa::path(
    post,
    path = "/dataset/{dataset_id}/validate",
    params(("dataset_id" = String, Path, description = "Catalog identifier of the dataset")),
    responses(
        (status = 200, description = "Validation result, valid or not", body = ValidateMetadataRes),
        (status = 404, description = "Dataset not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Legacy alias of `/dataset/{dataset_id}/validate/metadata`.
#[axum::debug_handler]
async fn validate_metadata_legacy(
    state: State<AppState>,
    dataset_id: DatasetPath,
) -> Result<Json<ValidateMetadataRes>, ApiError> {
    validate_metadata(state, dataset_id).await
}

#[utoipa::path(
    post,
    path = "/dataset/{dataset_id}/validate/files",
    params(("dataset_id" = String, Path, description = "Catalog identifier of the dataset")),
    responses(
        (status = 200, description = "Validation result, valid or not", body = ValidateFilesRes),
        (status = 404, description = "Dataset not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes),
        (status = 503, description = "Upstream service unreachable", body = ErrorRes)
    )
)]
/// Validate dataset files
///
/// Malformed or missing files are reported with `is_valid: false` and the offending file
/// identifiers in `invalid_files` or `missing_files`.
#[axum::debug_handler]
async fn validate_files(
    State(state): State<AppState>,
    DatasetPath(dataset_id): DatasetPath,
) -> Result<Json<ValidateFilesRes>, ApiError> {
    let outcome = state.datasets.validate_files(&dataset_id).await?;
    Ok(Json(outcome.into()))
}

#[utoipa::path(
    post,
    path = "/dataset/{dataset_id}/genmetadata",
    params(("dataset_id" = String, Path, description = "Catalog identifier of the dataset")),
    responses(
        (status = 200, description = "Technical metadata generated", body = GenerateMetadataRes),
        (status = 400, description = "Metadata generation failed", body = GenerateMetadataRes),
        (status = 404, description = "Dataset not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Generate technical metadata for a dataset
///
/// A failed generation answers 400 with `success: false`, `error: "Dataset is invalid"` and the
/// workflow message in `detailed_error`.
#[axum::debug_handler]
async fn generate_metadata(
    State(state): State<AppState>,
    DatasetPath(dataset_id): DatasetPath,
) -> Result<(StatusCode, Json<GenerateMetadataRes>), ApiError> {
    let outcome = state.datasets.generate_metadata(&dataset_id).await?;
    let status = if outcome.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(outcome.into())))
}

#[utoipa::path(
    post,
    path = "/dataset/{dataset_id}/preserve",
    params(("dataset_id" = String, Path, description = "Catalog identifier of the dataset")),
    responses(
        (status = 202, description = "Dataset accepted for packaging", body = PreserveRes),
        (status = 404, description = "Dataset not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Trigger packaging of a dataset
///
/// Returns 202 once the workflow engine has accepted the dataset. Progress is tracked through
/// the dataset's preservation state in the catalog, not through this API.
#[axum::debug_handler]
async fn preserve(
    State(state): State<AppState>,
    DatasetPath(dataset_id): DatasetPath,
) -> Result<(StatusCode, Json<PreserveRes>), ApiError> {
    let outcome = state.datasets.preserve(&dataset_id).await?;
    Ok((StatusCode::ACCEPTED, Json(outcome.into())))
}

#[utoipa::path(
    post,
    path = "/dataset/{dataset_id}/package",
    params(("dataset_id" = String, Path, description = "Catalog identifier of the dataset")),
    responses(
        (status = 202, description = "Dataset accepted for packaging", body = PreserveRes),
        (status = 404, description = "Dataset not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Alias of `/dataset/{dataset_id}/preserve`.
#[axum::debug_handler]
async fn package(
    state: State<AppState>,
    dataset_id: DatasetPath,
) -> Result<(StatusCode, Json<PreserveRes>), ApiError> {
    preserve(state, dataset_id).await
}
