//! Prediction strategies
//!
//! A [`PredictionClient`] wraps exactly one [`VariantPredictor`], chosen once
//! at startup:
//! - alphagenome (live model calls, needs the `alphagenome` feature and an API key)
//! - mock (canned figures keyed by variant name)

use std::sync::Arc;
use std::time::Instant;

use crate::catalog::VariantRecord;
use crate::service::{
    config::PredictionConfig,
    types::{ModelStats, PredictionMode, PredictionResponse, ServiceError},
};

#[cfg(feature = "alphagenome")]
pub mod alphagenome;
#[cfg(feature = "alphagenome")]
pub mod http_client;
pub mod mock;

pub use mock::MockPredictor;

/// Trait for variant effect prediction strategies
#[async_trait::async_trait]
pub trait VariantPredictor: Send + Sync {
    /// Predict the molecular effects of a catalog variant
    async fn predict(&self, record: &VariantRecord) -> Result<PredictionResponse, ServiceError>;

    /// Which strategy this is
    fn mode(&self) -> PredictionMode;

    /// Request statistics for strategies that call out to the model
    fn model_stats(&self) -> Option<ModelStats> {
        None
    }
}

/// The prediction strategy selected for this process
#[derive(Clone)]
pub struct PredictionClient {
    predictor: Arc<dyn VariantPredictor>,
}

impl PredictionClient {
    pub fn new(predictor: Arc<dyn VariantPredictor>) -> Self {
        Self { predictor }
    }

    pub fn mock() -> Self {
        Self::new(Arc::new(MockPredictor))
    }

    /// Pick the live model when an API key is configured and the client
    /// can be built, otherwise fall back to mock predictions
    pub fn from_config(config: &PredictionConfig) -> Self {
        match config.api_key() {
            #[cfg(feature = "alphagenome")]
            Some(api_key) => match alphagenome::AlphaGenomePredictor::from_config(config, api_key)
            {
                Ok(predictor) => {
                    tracing::info!("Using AlphaGenome predictions via {}", config.api_url);
                    Self::new(Arc::new(predictor))
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to initialize AlphaGenome client: {}. Using mock predictions",
                        e
                    );
                    Self::mock()
                }
            },
            #[cfg(not(feature = "alphagenome"))]
            Some(_) => {
                tracing::warn!(
                    "API key configured but alphagenome support is not built in. \
                     Using mock predictions"
                );
                Self::mock()
            }
            None => {
                tracing::warn!("AlphaGenome API key not set. Using mock predictions");
                Self::mock()
            }
        }
    }

    pub fn mode(&self) -> PredictionMode {
        self.predictor.mode()
    }

    pub fn model_stats(&self) -> Option<ModelStats> {
        self.predictor.model_stats()
    }

    /// Run the selected strategy for one variant
    pub async fn predict(
        &self,
        record: &VariantRecord,
    ) -> Result<PredictionResponse, ServiceError> {
        let start = Instant::now();
        let result = self.predictor.predict(record).await;

        match &result {
            Ok(_) => tracing::debug!(
                "Predicted {} ({}) in {}ms",
                record.name,
                self.mode(),
                start.elapsed().as_millis()
            ),
            Err(e) => tracing::error!("Prediction for {} failed: {}", record.name, e),
        }

        result
    }
}
