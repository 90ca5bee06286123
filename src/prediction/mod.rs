//! Variant effect prediction model
//!
//! [`PredictionResponse`] is the payload returned for a single variant. It is
//! produced either from canned figures ([`mock`]) or by summarizing the
//! reference/alternate output tracks of the genomic model ([`analysis`]).

use serde::{Deserialize, Serialize};

pub mod analysis;
pub mod mock;

pub use analysis::{summarize, AlleleOutputs, Track, VariantOutputs};
pub use mock::{mock_prediction, MockEffects};

/// Number of samples kept in each raw expression profile
pub const RAW_PROFILE_LEN: usize = 100;

/// Confidence label attached to a predicted channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
        }
    }
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Predicted molecular consequences of a variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MolecularEffects {
    /// Percent change in gene expression (alternate vs reference)
    pub gene_expression_change: f64,
    /// Percent change in chromatin accessibility
    pub chromatin_accessibility_change: f64,
    pub binding_sites_lost: u64,
    pub binding_sites_gained: u64,
    pub splicing_impact: String,
}

/// Per-channel confidence labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionConfidence {
    pub expression: Confidence,
    pub chromatin: Confidence,
}

/// Raw expression profiles backing the prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawData {
    pub interval: String,
    pub reference_expression_profile: Vec<f64>,
    pub alternate_expression_profile: Vec<f64>,
}

/// Full prediction for one variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub variant_name: String,
    pub molecular_effects: MolecularEffects,
    pub prediction_confidence: PredictionConfidence,
    pub raw_data: RawData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_serializes_as_label() {
        assert_eq!(
            serde_json::to_string(&Confidence::High).unwrap(),
            "\"High\""
        );
        assert_eq!(
            serde_json::from_str::<Confidence>("\"Low\"").unwrap(),
            Confidence::Low
        );
        assert_eq!(Confidence::Medium.to_string(), "Medium");
    }

    #[test]
    fn test_response_field_names() {
        let response = mock_prediction("CYP2D6*4");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["variant_name"], "CYP2D6*4");
        assert_eq!(json["molecular_effects"]["gene_expression_change"], -45.2);
        assert_eq!(json["molecular_effects"]["binding_sites_lost"], 3);
        assert_eq!(json["prediction_confidence"]["expression"], "High");
        assert_eq!(json["prediction_confidence"]["chromatin"], "Medium");
        assert_eq!(
            json["raw_data"]["reference_expression_profile"]
                .as_array()
                .unwrap()
                .len(),
            RAW_PROFILE_LEN
        );
    }
}
