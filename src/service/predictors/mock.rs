//! Mock prediction strategy

use crate::catalog::VariantRecord;
use crate::prediction::mock_prediction;
use crate::service::{
    predictors::VariantPredictor,
    types::{PredictionMode, PredictionResponse, ServiceError},
};

/// Returns canned figures without contacting the model
#[derive(Debug, Clone, Copy, Default)]
pub struct MockPredictor;

#[async_trait::async_trait]
impl VariantPredictor for MockPredictor {
    async fn predict(&self, record: &VariantRecord) -> Result<PredictionResponse, ServiceError> {
        Ok(mock_prediction(&record.name))
    }

    fn mode(&self) -> PredictionMode {
        PredictionMode::Mock
    }
}
