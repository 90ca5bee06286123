//! Service information endpoints

use axum::{extract::State, response::Json};
use serde_json::{json, Value};

use crate::service::server::AppState;

/// Provide basic service information
pub async fn service_info(State(state): State<AppState>) -> Json<Value> {
    let limiter = &state.rate_limiter;

    Json(json!({
        "service": "pharmacode-web",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "AlphaGenome-powered pharmacogenomics predictions",
        "prediction_mode": state.predictor.mode(),
        "model_stats": state.predictor.model_stats(),
        "variant_count": state.catalog.len(),
        "rate_limit": {
            "max_calls": limiter.max_calls(),
            "window_seconds": limiter.window().as_secs(),
            "remaining": limiter.remaining().await,
        },
        "endpoints": {
            "variants": {
                "list": "GET /api/v1/variants/",
                "details": "GET /api/v1/variants/{variant_name}",
                "predict": "POST /api/v1/variants/predict"
            },
            "health": {
                "service": "GET /health",
                "api": "GET /api/v1/health/"
            }
        }
    }))
}
