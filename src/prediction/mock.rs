//! Canned predictions used when the genomic model is not available

use super::{
    Confidence, MolecularEffects, PredictionConfidence, PredictionResponse, RawData,
    RAW_PROFILE_LEN,
};

/// Interval reported in the raw data of every mock prediction
pub const MOCK_INTERVAL: &str = "chr1:1000000-1001000";

/// Entry used for identifiers missing from the mock table
pub const DEFAULT_MOCK_VARIANT: &str = "CYP2D6*4";

/// Expression changes with a larger magnitude are labelled high confidence
const HIGH_CONFIDENCE_EXPRESSION_CHANGE: f64 = 40.0;

/// Canned molecular-effect figures for one variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MockEffects {
    pub gene_expression_change: f64,
    pub chromatin_accessibility_change: f64,
    pub binding_sites_lost: u64,
    pub binding_sites_gained: u64,
    pub splicing_impact: &'static str,
}

const MOCK_TABLE: &[(&str, MockEffects)] = &[
    (
        "CYP2D6*4",
        MockEffects {
            gene_expression_change: -45.2,
            chromatin_accessibility_change: -20.1,
            binding_sites_lost: 3,
            binding_sites_gained: 0,
            splicing_impact: "Exon 3 exclusion",
        },
    ),
    (
        "TPMT*3A_G460A",
        MockEffects {
            gene_expression_change: -35.5,
            chromatin_accessibility_change: -15.2,
            binding_sites_lost: 2,
            binding_sites_gained: 1,
            splicing_impact: "Normal splicing",
        },
    ),
    (
        "DPYD*2A",
        MockEffects {
            gene_expression_change: -55.0,
            chromatin_accessibility_change: -30.5,
            binding_sites_lost: 4,
            binding_sites_gained: 0,
            splicing_impact: "Exon 14 skipping",
        },
    ),
    (
        "UGT1A1*28",
        MockEffects {
            gene_expression_change: -30.0,
            chromatin_accessibility_change: -12.0,
            binding_sites_lost: 1,
            binding_sites_gained: 0,
            splicing_impact: "Normal splicing",
        },
    ),
];

/// Figures recorded for `variant_name`, if it has a mock entry
pub fn lookup_effects(variant_name: &str) -> Option<MockEffects> {
    MOCK_TABLE
        .iter()
        .find(|(name, _)| *name == variant_name)
        .map(|(_, effects)| *effects)
}

/// Figures for `variant_name`, falling back to the default entry
pub fn effects_for(variant_name: &str) -> MockEffects {
    lookup_effects(variant_name).unwrap_or_else(|| {
        tracing::debug!(
            "No mock entry for {}, using {} figures",
            variant_name,
            DEFAULT_MOCK_VARIANT
        );
        MOCK_TABLE[0].1
    })
}

/// Expression confidence in mock mode: strictly above 40% magnitude is high
pub fn mock_expression_confidence(expression_change: f64) -> Confidence {
    if expression_change.abs() > HIGH_CONFIDENCE_EXPRESSION_CHANGE {
        Confidence::High
    } else {
        Confidence::Medium
    }
}

/// Build a canned prediction for `variant_name`
pub fn mock_prediction(variant_name: &str) -> PredictionResponse {
    let effects = effects_for(variant_name);

    PredictionResponse {
        variant_name: variant_name.to_string(),
        molecular_effects: MolecularEffects {
            gene_expression_change: effects.gene_expression_change,
            chromatin_accessibility_change: effects.chromatin_accessibility_change,
            binding_sites_lost: effects.binding_sites_lost,
            binding_sites_gained: effects.binding_sites_gained,
            splicing_impact: effects.splicing_impact.to_string(),
        },
        prediction_confidence: PredictionConfidence {
            expression: mock_expression_confidence(effects.gene_expression_change),
            chromatin: Confidence::Medium,
        },
        raw_data: RawData {
            interval: MOCK_INTERVAL.to_string(),
            reference_expression_profile: vec![1.0; RAW_PROFILE_LEN],
            alternate_expression_profile: vec![0.5; RAW_PROFILE_LEN],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("CYP2D6*4", -45.2, -20.1, 3, 0, "Exon 3 exclusion", Confidence::High)]
    #[case("TPMT*3A_G460A", -35.5, -15.2, 2, 1, "Normal splicing", Confidence::Medium)]
    #[case("DPYD*2A", -55.0, -30.5, 4, 0, "Exon 14 skipping", Confidence::High)]
    #[case("UGT1A1*28", -30.0, -12.0, 1, 0, "Normal splicing", Confidence::Medium)]
    fn test_canned_figures(
        #[case] name: &str,
        #[case] expression: f64,
        #[case] chromatin: f64,
        #[case] lost: u64,
        #[case] gained: u64,
        #[case] splicing: &str,
        #[case] confidence: Confidence,
    ) {
        let prediction = mock_prediction(name);
        let effects = &prediction.molecular_effects;
        assert_eq!(prediction.variant_name, name);
        assert_eq!(effects.gene_expression_change, expression);
        assert_eq!(effects.chromatin_accessibility_change, chromatin);
        assert_eq!(effects.binding_sites_lost, lost);
        assert_eq!(effects.binding_sites_gained, gained);
        assert_eq!(effects.splicing_impact, splicing);
        assert_eq!(prediction.prediction_confidence.expression, confidence);
        assert_eq!(prediction.prediction_confidence.chromatin, Confidence::Medium);
    }

    #[test]
    fn test_unknown_falls_back_to_default_entry() {
        let prediction = mock_prediction("CYP2C19*2");
        assert_eq!(prediction.variant_name, "CYP2C19*2");
        assert_eq!(lookup_effects("CYP2C19*2"), None);
        assert_eq!(
            effects_for("CYP2C19*2"),
            lookup_effects(DEFAULT_MOCK_VARIANT).unwrap()
        );
        assert_eq!(prediction.molecular_effects.gene_expression_change, -45.2);
    }

    #[rstest]
    #[case(40.0, Confidence::Medium)]
    #[case(-40.0, Confidence::Medium)]
    #[case(40.1, Confidence::High)]
    #[case(-40.1, Confidence::High)]
    #[case(0.0, Confidence::Medium)]
    fn test_expression_confidence_boundary(#[case] change: f64, #[case] expected: Confidence) {
        assert_eq!(mock_expression_confidence(change), expected);
    }

    #[test]
    fn test_raw_data_constants() {
        let raw = mock_prediction("DPYD*2A").raw_data;
        assert_eq!(raw.interval, MOCK_INTERVAL);
        assert!(raw.reference_expression_profile.iter().all(|&v| v == 1.0));
        assert!(raw.alternate_expression_profile.iter().all(|&v| v == 0.5));
        assert_eq!(
            raw.reference_expression_profile.len(),
            raw.alternate_expression_profile.len()
        );
    }
}
