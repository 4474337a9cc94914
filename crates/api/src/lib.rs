//! Rain Forecast API Server
//!
//! HTTP boundary for the forecast form: field descriptors, predictions,
//! health and Prometheus metrics.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::{get, post}, Json, Router};
use inference_engine::{Forecaster, ModelBundle};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod error;
pub mod rate_limit;
mod routes;
pub mod settings;

pub use error::{ApiError, ErrorBody};
pub use rate_limit::RateLimitConfig;
pub use routes::forecast::PredictResponse;
pub use routes::form::FormResponse;
pub use settings::{AppConfig, LoggingConfig};

/// Application state shared across handlers. Read-only after startup.
pub struct AppState {
    /// Forecaster over the process-wide model bundle
    pub forecaster: Forecaster,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
    /// Prometheus renderer, when a recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new application state
    pub fn new(forecaster: Forecaster) -> Self {
        Self {
            forecaster,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub model: ModelSummary,
}

/// Loaded model summary
#[derive(Debug, Serialize)]
pub struct ModelSummary {
    pub input_count: usize,
    pub feature_width: usize,
    pub classes: Vec<String>,
}

/// Create the application router. Rate limits apply to the prediction route only.
pub fn create_router(
    state: Arc<AppState>,
    rate_limit: Option<&RateLimitConfig>,
) -> Result<Router, ApiError> {
    let mut predict = Router::new().route("/api/v1/predict", post(routes::forecast::predict));
    if let Some(limits) = rate_limit {
        info!(
            "Rate limiting predictions: burst {}, one request per {}s",
            limits.burst_size, limits.per_second
        );
        predict = predict.layer(GovernorLayer {
            config: rate_limit::create_governor_config(limits)?,
        });
    }

    Ok(Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/form", get(routes::form::get_form))
        .route("/metrics", get(metrics_handler))
        .merge(predict)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let bundle = state.forecaster.bundle();
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        model: ModelSummary {
            input_count: bundle.schema().input_cols().len(),
            feature_width: bundle.schema().feature_width(),
            classes: bundle.classifier().classes().to_vec(),
        },
    })
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics recorder not installed".to_string()),
    }
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), ApiError> {
    let level: Level = config
        .level
        .parse()
        .map_err(|_| ApiError::Config(format!("invalid log level {:?}", config.level)))?;

    let builder = FmtSubscriber::builder().with_max_level(level).with_target(true);
    let result = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.map_err(|e| ApiError::Config(format!("failed to set tracing subscriber: {}", e)))
}

/// Load the model, install metrics and serve until shutdown
pub async fn run_server(config: AppConfig) -> Result<(), ApiError> {
    let bundle = ModelBundle::global(&config.model.path)?;
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ApiError::Config(format!("failed to install metrics recorder: {}", e)))?;

    let state = Arc::new(AppState::new(Forecaster::new(bundle)).with_metrics(handle));
    let limits = config.rate_limit.enabled.then_some(&config.rate_limit);
    let app = create_router(state, limits)?;

    info!("Starting API server on {}", config.server.addr);

    let listener = tokio::net::TcpListener::bind(config.server.addr.as_str()).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}
