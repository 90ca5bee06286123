//! Request and response types for the PharmaCode web service

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::VariantRecord;
use crate::error::PharmaError;

pub use crate::prediction::{
    Confidence, MolecularEffects, PredictionConfidence, PredictionResponse, RawData,
};

/// Request for a single variant prediction
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VariantRequest {
    /// Catalog identifier, e.g. `CYP2D6*4`
    pub variant_name: String,
}

/// Response for the variant listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantsResponse {
    /// All catalog identifiers, in catalog order
    pub variants: Vec<String>,
    /// Always equal to `variants.len()`
    pub total_count: usize,
}

impl VariantsResponse {
    pub fn new(variants: Vec<String>) -> Self {
        let total_count = variants.len();
        Self {
            variants,
            total_count,
        }
    }
}

/// Response for the variant details endpoint
#[derive(Debug, Clone, Serialize)]
pub struct VariantDetailsResponse {
    #[serde(flatten)]
    pub record: VariantRecord,
    /// Genomic interval sent to the model (`chrom:start-end`)
    pub interval: String,
}

/// Liveness payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    /// Unix time in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
}

/// Which prediction strategy the service was started with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionMode {
    /// Canned figures keyed by variant name
    Mock,
    /// Live calls to the AlphaGenome model
    AlphaGenome,
}

impl PredictionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionMode::Mock => "mock",
            PredictionMode::AlphaGenome => "alphagenome",
        }
    }
}

impl std::fmt::Display for PredictionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Request counters for the genomic model client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    pub total_requests: u64,
    pub failure_count: u64,
}

/// Standard error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type
    pub error: String,
    /// Human-readable error message
    pub detail: String,
    /// Seconds until a rate-limited request may be retried
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
}

/// Service error types
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Variant not found: {name}. Available: {}", available.join(", "))]
    UnknownVariant {
        name: String,
        available: Vec<String>,
    },

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited { retry_after: Duration },

    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl ServiceError {
    /// Convert to HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::InvalidBody(_) => 422,
            ServiceError::UnknownVariant { .. } => 404,
            ServiceError::RateLimited { .. } => 429,
            ServiceError::PredictionFailed(_) => 500,
            ServiceError::ConfigError(_) => 500,
        }
    }

    /// Short machine-readable error type
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::UnknownVariant { .. } => "unknown_variant",
            ServiceError::RateLimited { .. } => "rate_limited",
            ServiceError::PredictionFailed(_) => "prediction_failed",
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::InvalidBody(_) => "invalid_body",
            ServiceError::ConfigError(_) => "config_error",
        }
    }

    /// Convert to error response
    pub fn to_response(&self) -> ErrorResponse {
        let retry_after_seconds = match self {
            // Round up so clients never retry early
            ServiceError::RateLimited { retry_after } => {
                Some(retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0))
            }
            _ => None,
        };

        ErrorResponse {
            error: self.kind().to_string(),
            detail: self.to_string(),
            retry_after_seconds,
        }
    }

    /// Error response with internal failure messages withheld
    pub fn to_redacted_response(&self) -> ErrorResponse {
        match self {
            ServiceError::PredictionFailed(_) => ErrorResponse {
                error: self.kind().to_string(),
                detail: "Prediction failed".to_string(),
                retry_after_seconds: None,
            },
            _ => self.to_response(),
        }
    }
}

impl From<PharmaError> for ServiceError {
    fn from(err: PharmaError) -> Self {
        match err {
            PharmaError::UnknownVariant { name, available } => {
                ServiceError::UnknownVariant { name, available }
            }
            other => ServiceError::PredictionFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let unknown = ServiceError::UnknownVariant {
            name: "x".to_string(),
            available: vec![],
        };
        assert_eq!(unknown.status_code(), 404);
        assert_eq!(
            ServiceError::RateLimited {
                retry_after: Duration::from_secs(1)
            }
            .status_code(),
            429
        );
        assert_eq!(
            ServiceError::PredictionFailed("boom".to_string()).status_code(),
            500
        );
        assert_eq!(ServiceError::BadRequest("bad".to_string()).status_code(), 400);
        assert_eq!(
            ServiceError::InvalidBody("missing field".to_string()).status_code(),
            422
        );
    }

    #[test]
    fn test_retry_after_rounds_up() {
        let err = ServiceError::RateLimited {
            retry_after: Duration::from_millis(12_300),
        };
        let response = err.to_response();
        assert_eq!(response.error, "rate_limited");
        assert_eq!(response.retry_after_seconds, Some(13));
        assert_eq!(response.detail, "Rate limit exceeded. Please try again later.");
    }

    #[test]
    fn test_prediction_failure_detail() {
        let err = ServiceError::PredictionFailed("division by zero".to_string());
        assert_eq!(err.to_response().detail, "Prediction failed: division by zero");
        assert_eq!(err.to_redacted_response().detail, "Prediction failed");
    }

    #[test]
    fn test_from_pharma_error() {
        let err: ServiceError = PharmaError::ZeroReferenceMean {
            channel: "RNA expression".to_string(),
        }
        .into();
        assert!(matches!(err, ServiceError::PredictionFailed(_)));

        let err: ServiceError = PharmaError::UnknownVariant {
            name: "nope".to_string(),
            available: vec!["CYP2D6*4".to_string()],
        }
        .into();
        assert_eq!(err.status_code(), 404);
        assert!(err.to_string().contains("CYP2D6*4"));
    }

    #[test]
    fn test_variants_response_count() {
        let response = VariantsResponse::new(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(response.total_count, response.variants.len());
    }

    #[test]
    fn test_health_response_omits_missing_fields() {
        let health = HealthResponse {
            status: "healthy".to_string(),
            timestamp: None,
            service: None,
        };
        assert_eq!(
            serde_json::to_string(&health).unwrap(),
            r#"{"status":"healthy"}"#
        );
    }
}
