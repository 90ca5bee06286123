//! Variant listing and prediction endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};

use crate::service::{
    handlers::error_reply,
    server::AppState,
    types::{
        ErrorResponse, PredictionResponse, ServiceError, VariantDetailsResponse, VariantRequest,
        VariantsResponse,
    },
};

/// List every variant in the catalog
pub async fn list_variants(State(state): State<AppState>) -> Json<VariantsResponse> {
    Json(VariantsResponse::new(state.catalog.list()))
}

/// Catalog record for a single variant
pub async fn variant_details(
    State(state): State<AppState>,
    Path(variant_name): Path<String>,
) -> Result<Json<VariantDetailsResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.catalog.lookup(&variant_name) {
        Ok(record) => Ok(Json(VariantDetailsResponse {
            interval: record.interval().to_string(),
            record: record.clone(),
        })),
        Err(e) => Err(error_reply(&state, e.into())),
    }
}

/// Predict the molecular effects of a catalog variant
///
/// Checks the shared rate limit first, then the request body and catalog
/// membership, then runs the prediction strategy selected at startup.
pub async fn predict_variant(
    State(state): State<AppState>,
    body: Result<Json<VariantRequest>, JsonRejection>,
) -> Result<Json<PredictionResponse>, (StatusCode, Json<ErrorResponse>)> {
    if let Err(error) = state.rate_limiter.check().await {
        return Err(error_reply(&state, error));
    }

    let Json(request) = body.map_err(|rejection| {
        tracing::debug!("Rejected prediction request body: {}", rejection);
        error_reply(&state, ServiceError::InvalidBody(rejection.body_text()))
    })?;

    let record = match state.catalog.lookup(&request.variant_name) {
        Ok(record) => record.clone(),
        Err(e) => {
            tracing::info!("Prediction requested for unknown variant {:?}", request.variant_name);
            return Err(error_reply(&state, e.into()));
        }
    };

    // Run on its own task so a panic in the strategy surfaces as a 500
    let predictor = state.predictor.clone();
    let result = tokio::spawn(async move { predictor.predict(&record).await })
        .await
        .map_err(|e| {
            tracing::error!("Prediction task failed: {}", e);
            error_reply(&state, ServiceError::PredictionFailed(format!("Task error: {}", e)))
        })?;

    match result {
        Ok(response) => Ok(Json(response)),
        Err(e) => Err(error_reply(&state, e)),
    }
}
