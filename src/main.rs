use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api_rest::{router, AppState};
use research_core::{constants::DEFAULT_CONFIG_PATH, DatasetService, ResearchConfig};
use research_metax::MetaxClient;
use research_workflow::WorkflowClient;

/// Crates whose events are shown at info and above unless `RUST_LOG` says otherwise.
const LOGGED_CRATES: [&str; 5] = [
    "research_run",
    "api_rest",
    "research_core",
    "research_metax",
    "research_workflow",
];

fn log_filter(base: EnvFilter) -> anyhow::Result<EnvFilter> {
    let mut filter = base;
    for target in LOGGED_CRATES {
        filter = filter.add_directive(format!("{target}=info").parse()?);
    }
    Ok(filter)
}

/// Main entry point for the research REST API
///
/// Loads the configuration once, wires the Metax and workflow clients into the dataset service
/// and serves the REST API until the process is stopped.
///
/// # Environment Variables
/// - `RESEARCH_REST_API_CONF`: path of the YAML configuration file
///   (default: "/etc/research-rest-api/research-rest-api.yaml")
/// - `RESEARCH_REST_ADDR`: REST server address (default: "0.0.0.0:5001")
/// - `RUST_LOG`: extra tracing directives
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, client setup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(log_filter(EnvFilter::from_default_env())?)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("RESEARCH_REST_API_CONF")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    let cfg = Arc::new(ResearchConfig::load(&config_path)?);

    tracing::info!(metax = %cfg.metax_url(), workflow = %cfg.workflow_url(), "configuration loaded");

    let datasets = DatasetService::new(
        cfg.clone(),
        Arc::new(MetaxClient::new(&cfg)?),
        Arc::new(WorkflowClient::new(&cfg)?),
    );
    let app = router(AppState::new(datasets));

    let addr = std::env::var("RESEARCH_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:5001".into());
    tracing::info!("++ Starting research REST API on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
