//! Web server setup using Axum framework

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::catalog::VariantCatalog;
use crate::service::{
    config::ServiceConfig,
    handlers,
    predictors::PredictionClient,
    rate_limit::SlidingWindowRateLimiter,
    types::{ErrorResponse, ServiceError},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Read-only variant catalog
    pub catalog: Arc<VariantCatalog>,
    /// Prediction strategy selected at startup
    pub predictor: PredictionClient,
    /// Shared limit on prediction requests
    pub rate_limiter: Arc<SlidingWindowRateLimiter>,
    /// Service configuration
    pub config: Arc<ServiceConfig>,
}

impl AppState {
    /// Assemble state from its parts; the rate limiter comes from `config`
    pub fn new(
        config: ServiceConfig,
        catalog: VariantCatalog,
        predictor: PredictionClient,
    ) -> Self {
        let rate_limiter = SlidingWindowRateLimiter::from_config(&config.rate_limit);
        Self {
            catalog: Arc::new(catalog),
            predictor,
            rate_limiter: Arc::new(rate_limiter),
            config: Arc::new(config),
        }
    }
}

/// Load the configured catalog, or the built-in table when none is set
pub fn load_catalog(config: &ServiceConfig) -> Result<VariantCatalog, ServiceError> {
    match &config.data.catalog_path {
        Some(path) => {
            tracing::info!("Loading variant catalog from {}", path.display());
            let catalog = VariantCatalog::from_json_file(path).map_err(|e| {
                ServiceError::ConfigError(format!(
                    "Failed to load catalog {}: {}",
                    path.display(),
                    e
                ))
            })?;
            tracing::info!("Loaded {} variants", catalog.len());
            Ok(catalog)
        }
        None => {
            tracing::debug!("No catalog path configured. Using built-in variants.");
            Ok(VariantCatalog::builtin())
        }
    }
}

/// Create the Axum application with all routes and middleware
pub fn create_app(config: ServiceConfig) -> Result<(Router, AppState), ServiceError> {
    let catalog = load_catalog(&config)?;
    let predictor = PredictionClient::from_config(&config.prediction);
    tracing::info!(
        "Prediction mode: {}, rate limit: {} calls per {}s",
        predictor.mode(),
        config.rate_limit.max_calls,
        config.rate_limit.window_seconds
    );

    let state = AppState::new(config, catalog, predictor);
    let app = build_router(state.clone())?;
    Ok((app, state))
}

/// Build the router over existing state
pub fn build_router(state: AppState) -> Result<Router, ServiceError> {
    let max_size = parse_size(&state.config.server.max_request_size)
        .map_err(|e| ServiceError::ConfigError(format!("Invalid max_request_size: {}", e)))?;

    let app = Router::new()
        .route("/", get(root_handler))
        // Health endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/health", get(handlers::health::api_health_check))
        .route("/api/v1/health/", get(handlers::health::api_health_check))
        // Variant endpoints
        .route("/api/v1/variants", get(handlers::variants::list_variants))
        .route("/api/v1/variants/", get(handlers::variants::list_variants))
        .route(
            "/api/v1/variants/predict",
            post(handlers::variants::predict_variant),
        )
        .route(
            "/api/v1/variants/:variant_name",
            get(handlers::variants::variant_details),
        )
        // API info endpoint
        .route("/api/v1/info", get(handlers::info::service_info))
        // Handle 404s
        .fallback(handle_404)
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_size));

    Ok(app)
}

/// Handle 404 errors
async fn handle_404() -> (StatusCode, Json<ErrorResponse>) {
    let error = ServiceError::BadRequest("Endpoint not found".to_string());
    (StatusCode::NOT_FOUND, Json(error.to_response()))
}

/// Static greeting
async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "PharmaCode API - AlphaGenome Integration" }))
}

/// Parse size strings like "10MB", "1GB", etc.
pub fn parse_size(size_str: &str) -> Result<usize, String> {
    let size_str = size_str.trim().to_uppercase();

    // Check longer suffixes first to avoid partial matches
    let (num_str, multiplier) = if let Some(num) = size_str.strip_suffix("GB") {
        (num, 1024 * 1024 * 1024)
    } else if let Some(num) = size_str.strip_suffix("MB") {
        (num, 1024 * 1024)
    } else if let Some(num) = size_str.strip_suffix("KB") {
        (num, 1024)
    } else if let Some(num) = size_str.strip_suffix('B') {
        (num, 1)
    } else {
        (size_str.as_str(), 1)
    };

    let n = num_str
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("Invalid size format: {}", size_str))?;
    n.checked_mul(multiplier)
        .ok_or_else(|| format!("Size too large: {}", size_str))
}
