//! AlphaGenome prediction strategy
//!
//! The model is treated as an opaque service: given an interval, a variant,
//! tissue context and a list of output channels, it returns one track per
//! channel for the reference and alternate alleles. The tracks are then
//! summarized locally by [`crate::prediction::summarize`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::catalog::{GenomicInterval, GenomicVariant, VariantRecord};
use crate::prediction::{summarize, VariantOutputs};
use crate::service::{
    config::PredictionConfig,
    predictors::{http_client::ModelHttpClient, VariantPredictor},
    types::{ModelStats, PredictionMode, PredictionResponse, ServiceError},
};

/// Output channels the model can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutputType {
    RnaSeq,
    HistoneMarks,
    TfBinding,
}

/// Channels requested for every prediction
pub const REQUESTED_OUTPUTS: [OutputType; 3] = [
    OutputType::RnaSeq,
    OutputType::HistoneMarks,
    OutputType::TfBinding,
];

/// Variant prediction request sent to the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRequest {
    pub interval: GenomicInterval,
    pub variant: GenomicVariant,
    pub ontology_terms: Vec<String>,
    pub requested_outputs: Vec<OutputType>,
}

impl ModelRequest {
    pub fn for_record(record: &VariantRecord) -> Self {
        Self {
            interval: record.interval(),
            variant: record.variant(),
            ontology_terms: record.ontology_terms.clone(),
            requested_outputs: REQUESTED_OUTPUTS.to_vec(),
        }
    }
}

/// The external genomic model
#[async_trait::async_trait]
pub trait GenomeModel: Send + Sync {
    async fn predict_variant(&self, request: &ModelRequest) -> Result<VariantOutputs, ServiceError>;

    /// Request statistics, when the model is remote
    fn stats(&self) -> Option<ModelStats> {
        None
    }
}

/// AlphaGenome reached over its JSON HTTP API
pub struct AlphaGenomeHttpModel {
    client: ModelHttpClient,
    predict_url: String,
}

impl AlphaGenomeHttpModel {
    pub fn new(config: &PredictionConfig, api_key: &str) -> Result<Self, ServiceError> {
        let client = ModelHttpClient::new(config, api_key)?;
        let base_url = config.api_url.trim_end_matches('/');
        Ok(Self {
            client,
            predict_url: format!("{}/v1/predict_variant", base_url),
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }
}

#[async_trait::async_trait]
impl GenomeModel for AlphaGenomeHttpModel {
    async fn predict_variant(
        &self,
        request: &ModelRequest,
    ) -> Result<VariantOutputs, ServiceError> {
        tracing::debug!(
            "Requesting {:?} for {} over {}",
            request.requested_outputs,
            request.variant,
            request.interval
        );
        self.client.post_json(&self.predict_url, request).await
    }

    fn stats(&self) -> Option<ModelStats> {
        Some(self.client.get_stats())
    }
}

/// Live predictions from the genomic model
pub struct AlphaGenomePredictor {
    model: Arc<dyn GenomeModel>,
}

impl AlphaGenomePredictor {
    pub fn new(model: Arc<dyn GenomeModel>) -> Self {
        Self { model }
    }

    pub fn from_config(config: &PredictionConfig, api_key: &str) -> Result<Self, ServiceError> {
        let model = AlphaGenomeHttpModel::new(config, api_key)?;
        Ok(Self::new(Arc::new(model)))
    }
}

#[async_trait::async_trait]
impl VariantPredictor for AlphaGenomePredictor {
    async fn predict(&self, record: &VariantRecord) -> Result<PredictionResponse, ServiceError> {
        let request = ModelRequest::for_record(record);
        let outputs = self.model.predict_variant(&request).await?;
        Ok(summarize(&record.name, &outputs)?)
    }

    fn mode(&self) -> PredictionMode {
        PredictionMode::AlphaGenome
    }

    fn model_stats(&self) -> Option<ModelStats> {
        self.model.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VariantCatalog;
    use crate::prediction::{AlleleOutputs, Confidence, Track};
    use std::sync::Mutex;

    /// Returns fixed outputs and records the last request
    struct FixedModel {
        outputs: VariantOutputs,
        last_request: Mutex<Option<ModelRequest>>,
    }

    #[async_trait::async_trait]
    impl GenomeModel for FixedModel {
        async fn predict_variant(
            &self,
            request: &ModelRequest,
        ) -> Result<VariantOutputs, ServiceError> {
            *self.last_request.lock().unwrap() = Some(request.clone());
            Ok(self.outputs.clone())
        }
    }

    struct FailingModel;

    #[async_trait::async_trait]
    impl GenomeModel for FailingModel {
        async fn predict_variant(&self, _: &ModelRequest) -> Result<VariantOutputs, ServiceError> {
            Err(ServiceError::PredictionFailed(
                "Model API returned HTTP 503".to_string(),
            ))
        }
    }

    fn allele(record: &VariantRecord, rna: f64, histone: f64, tf: f64) -> AlleleOutputs {
        let track = |v: f64| Track::new(record.interval(), vec![v; 8]);
        AlleleOutputs {
            rna_seq: track(rna),
            histone_marks: track(histone),
            tf_binding: track(tf),
        }
    }

    #[test]
    fn test_request_serialization() {
        let catalog = VariantCatalog::builtin();
        let request = ModelRequest::for_record(catalog.lookup("CYP2D6*4").unwrap());
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json["requested_outputs"],
            serde_json::json!(["RNA_SEQ", "HISTONE_MARKS", "TF_BINDING"])
        );
        assert_eq!(json["interval"]["start"], 42522000);
        assert_eq!(json["variant"]["alternate_bases"], "A");
        assert_eq!(json["ontology_terms"], serde_json::json!(["liver", "hepatocyte"]));
    }

    #[test]
    fn test_predict_url() {
        let config = PredictionConfig {
            api_url: "http://localhost:9000/".to_string(),
            ..PredictionConfig::default()
        };
        let model = AlphaGenomeHttpModel::new(&config, "key").unwrap();
        assert_eq!(model.predict_url(), "http://localhost:9000/v1/predict_variant");
    }

    #[tokio::test]
    async fn test_predict_summarizes_model_outputs() {
        let catalog = VariantCatalog::builtin();
        let record = catalog.lookup("TPMT*3A_G460A").unwrap();
        let model = Arc::new(FixedModel {
            outputs: VariantOutputs {
                reference: allele(record, 2.0, 4.0, 1.0),
                alternate: allele(record, 1.0, 3.0, 1.5),
            },
            last_request: Mutex::new(None),
        });
        let predictor = AlphaGenomePredictor::new(model.clone());

        let response = predictor.predict(record).await.unwrap();
        let effects = &response.molecular_effects;
        assert_eq!(effects.gene_expression_change, -50.0);
        assert_eq!(effects.chromatin_accessibility_change, -25.0);
        assert_eq!(effects.binding_sites_lost, 0);
        assert_eq!(effects.binding_sites_gained, 4);
        assert_eq!(effects.splicing_impact, "Normal splicing pattern");
        assert_eq!(response.prediction_confidence.expression, Confidence::High);
        assert_eq!(response.raw_data.interval, "chr6:18138500-18139500");

        let request = model.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(request.variant.position, 18138997);
        assert_eq!(predictor.mode(), PredictionMode::AlphaGenome);
        assert!(predictor.model_stats().is_none());
    }

    #[tokio::test]
    async fn test_zero_reference_mean_fails_prediction() {
        let catalog = VariantCatalog::builtin();
        let record = catalog.lookup("DPYD*2A").unwrap();
        let predictor = AlphaGenomePredictor::new(Arc::new(FixedModel {
            outputs: VariantOutputs {
                reference: allele(record, 0.0, 1.0, 1.0),
                alternate: allele(record, 1.0, 1.0, 1.0),
            },
            last_request: Mutex::new(None),
        }));

        let err = predictor.predict(record).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("mean is zero"));
    }

    #[tokio::test]
    async fn test_model_failure_propagates() {
        let catalog = VariantCatalog::builtin();
        let predictor = AlphaGenomePredictor::new(Arc::new(FailingModel));
        let err = predictor
            .predict(catalog.lookup("UGT1A1*28").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PredictionFailed(_)));
        assert!(err.to_string().contains("HTTP 503"));
    }
}
