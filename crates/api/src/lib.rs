//! Alertmanager Gateway
//!
//! HTTP front end exposing one Alertmanager backend per organization.

use alerting::OrgRegistry;
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use remote_alertmanager::RemoteAlertmanager;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_governor::GovernorLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

pub mod error;
pub mod rate_limit;
pub mod routes;
pub mod settings;

pub use error::ApiError;
pub use settings::{LogSettings, OrgSettings, ServerSettings, Settings};

/// Application state shared across handlers
pub struct AppState {
    /// Backend per organization
    pub registry: OrgRegistry,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus exporter, when installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(registry: OrgRegistry) -> Self {
        Self {
            registry,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub orgs: Vec<OrgHealth>,
}

/// Per-organization backend health
#[derive(Debug, Serialize)]
pub struct OrgHealth {
    pub org_id: i64,
    pub ready: bool,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let org_routes = Router::new()
        .route("/config", post(routes::config::post_config))
        .route("/config/default", post(routes::config::post_default_config))
        .route("/status", get(routes::status::get_status))
        .route("/ready", get(routes::status::get_ready))
        .route("/capabilities", get(routes::status::get_capabilities))
        .route(
            "/silences",
            get(routes::silences::list_silences).post(routes::silences::create_silence),
        )
        .route(
            "/silence/:silence_id",
            get(routes::silences::get_silence).delete(routes::silences::delete_silence),
        )
        .route(
            "/alerts",
            get(routes::alerts::get_alerts).post(routes::alerts::post_alerts),
        )
        .route("/alerts/groups", get(routes::alerts::get_alert_groups))
        .route("/receivers", get(routes::receivers::get_receivers))
        .route("/receivers/test", post(routes::receivers::test_receivers))
        .route("/templates/test", post(routes::receivers::test_template));

    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .nest("/api/v1/orgs/:org_id", org_routes)
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let orgs: Vec<OrgHealth> = state
        .registry
        .org_ids()
        .into_iter()
        .filter_map(|org_id| state.registry.get(org_id).ok())
        .map(|backend| OrgHealth {
            org_id: backend.org_id(),
            ready: backend.ready(),
        })
        .collect();

    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        orgs,
    })
}

/// Prometheus text exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (
            StatusCode::NOT_FOUND,
            "metrics exporter not installed".to_string(),
        ),
    }
}

/// Initialize logging
pub fn init_logging(log: &LogSettings) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true);

    if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Build a remote backend for every configured organization
pub fn build_registry(settings: &Settings) -> Result<OrgRegistry, ApiError> {
    let registry = OrgRegistry::new();
    for org in &settings.orgs {
        let backend = RemoteAlertmanager::new(org.remote.clone(), org.org_id)?;
        registry.register(Arc::new(backend));
    }
    Ok(registry)
}

/// Push the default configuration to organizations that ask for it
async fn apply_startup_defaults(settings: &Settings, registry: &OrgRegistry) {
    for org in settings.orgs.iter().filter(|o| o.apply_default_on_start) {
        let result = match registry.get(org.org_id) {
            Ok(backend) => backend.save_and_apply_default_config().await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => info!("Applied default configuration for org {}", org.org_id),
            Err(e) => warn!(
                "Could not apply default configuration for org {}: {}",
                org.org_id, e
            ),
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

/// Run the server
pub async fn run_server(settings: Settings) -> anyhow::Result<()> {
    let registry = build_registry(&settings)?;
    apply_startup_defaults(&settings, &registry).await;

    let handle = PrometheusBuilder::new().install_recorder()?;
    let state = Arc::new(AppState::new(registry).with_metrics(handle));

    let mut app = create_router(state.clone()).layer(TraceLayer::new_for_http());
    match rate_limit::create_governor_config(&settings.server.rate_limit) {
        Some(config) => app = app.layer(GovernorLayer { config }),
        None => warn!("Rate limiting disabled: invalid rate limit settings"),
    }

    info!(
        "Starting Alertmanager gateway on {} for {} orgs",
        settings.server.listen_addr,
        state.registry.len()
    );

    let listener = tokio::net::TcpListener::bind(&settings.server.listen_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    state.registry.stop_all().await;
    Ok(())
}
