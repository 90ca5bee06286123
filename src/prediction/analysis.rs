//! Summarization of genomic model outputs into a [`PredictionResponse`]
//!
//! The model returns one track per requested output channel for each allele.
//! Statistics are population statistics (divisor `n`).

use serde::{Deserialize, Serialize};

use super::{
    Confidence, MolecularEffects, PredictionConfidence, PredictionResponse, RawData,
    RAW_PROFILE_LEN,
};
use crate::catalog::GenomicInterval;
use crate::error::PharmaError;

/// Variance thresholds for confidence labels
const HIGH_CONFIDENCE_VARIANCE: f64 = 0.1;
const MEDIUM_CONFIDENCE_VARIANCE: f64 = 0.3;

/// Relative variance shifts for splicing classification
const SIGNIFICANT_SPLICING_SHIFT: f64 = 0.5;
const MODERATE_SPLICING_SHIFT: f64 = 0.2;

pub const SPLICING_SIGNIFICANT: &str = "Significant splicing disruption detected";
pub const SPLICING_MODERATE: &str = "Moderate splicing changes";
pub const SPLICING_NORMAL: &str = "Normal splicing pattern";

/// One output channel over an interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub interval: GenomicInterval,
    pub values: Vec<f64>,
}

impl Track {
    pub fn new(interval: GenomicInterval, values: Vec<f64>) -> Self {
        Self { interval, values }
    }

    pub fn mean(&self) -> Option<f64> {
        if self.values.is_empty() {
            return None;
        }
        Some(self.sum() / self.values.len() as f64)
    }

    /// Population variance
    pub fn variance(&self) -> Option<f64> {
        let mean = self.mean()?;
        let sq: f64 = self.values.iter().map(|v| (v - mean).powi(2)).sum();
        Some(sq / self.values.len() as f64)
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    fn profile(&self) -> Vec<f64> {
        self.values.iter().take(RAW_PROFILE_LEN).copied().collect()
    }
}

/// Requested output channels for a single allele
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlleleOutputs {
    pub rna_seq: Track,
    pub histone_marks: Track,
    pub tf_binding: Track,
}

/// Model outputs for both alleles of a variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantOutputs {
    pub reference: AlleleOutputs,
    pub alternate: AlleleOutputs,
}

/// Derive molecular effects, confidence labels and raw profiles
pub fn summarize(
    variant_name: &str,
    outputs: &VariantOutputs,
) -> Result<PredictionResponse, PharmaError> {
    let reference = &outputs.reference;
    let alternate = &outputs.alternate;

    let expression_change =
        percent_change("RNA expression", &reference.rna_seq, &alternate.rna_seq)?;
    let chromatin_change =
        percent_change("histone mark", &reference.histone_marks, &alternate.histone_marks)?;
    let (binding_sites_lost, binding_sites_gained) =
        binding_site_changes(&reference.tf_binding, &alternate.tf_binding)?;

    let ref_rna_variance = variance_of("RNA expression", &reference.rna_seq)?;
    let alt_rna_variance = variance_of("RNA expression", &alternate.rna_seq)?;
    let ref_histone_variance = variance_of("histone mark", &reference.histone_marks)?;

    Ok(PredictionResponse {
        variant_name: variant_name.to_string(),
        molecular_effects: MolecularEffects {
            gene_expression_change: expression_change,
            chromatin_accessibility_change: chromatin_change,
            binding_sites_lost,
            binding_sites_gained,
            splicing_impact: classify_splicing(ref_rna_variance, alt_rna_variance).to_string(),
        },
        prediction_confidence: PredictionConfidence {
            expression: confidence_from_variance(ref_rna_variance),
            chromatin: confidence_from_variance(ref_histone_variance),
        },
        raw_data: RawData {
            interval: reference.rna_seq.interval.to_string(),
            reference_expression_profile: reference.rna_seq.profile(),
            alternate_expression_profile: alternate.rna_seq.profile(),
        },
    })
}

/// `(mean(alt) - mean(ref)) / mean(ref) * 100`, rounded to one decimal
pub fn percent_change(
    channel: &str,
    reference: &Track,
    alternate: &Track,
) -> Result<f64, PharmaError> {
    let ref_mean = mean_of(channel, reference)?;
    let alt_mean = mean_of(channel, alternate)?;

    if ref_mean == 0.0 {
        return Err(PharmaError::ZeroReferenceMean {
            channel: channel.to_string(),
        });
    }

    let change = (alt_mean - ref_mean) / ref_mean * 100.0;
    if !change.is_finite() {
        return Err(PharmaError::NonFinite {
            channel: channel.to_string(),
            value: change,
        });
    }
    Ok(round_to_tenth(change))
}

/// Net TF binding delta split into (lost, gained); at most one side is non-zero
pub fn binding_site_changes(
    reference: &Track,
    alternate: &Track,
) -> Result<(u64, u64), PharmaError> {
    let delta = alternate.sum() - reference.sum();
    if !delta.is_finite() {
        return Err(PharmaError::NonFinite {
            channel: "TF binding".to_string(),
            value: delta,
        });
    }

    // Truncate toward zero before splitting
    let delta = delta.trunc() as i64;
    if delta < 0 {
        Ok((delta.unsigned_abs(), 0))
    } else {
        Ok((0, delta as u64))
    }
}

/// Compare RNA profile variance between alleles
pub fn classify_splicing(ref_variance: f64, alt_variance: f64) -> &'static str {
    let shift = (alt_variance - ref_variance).abs();
    if shift > ref_variance * SIGNIFICANT_SPLICING_SHIFT {
        SPLICING_SIGNIFICANT
    } else if shift > ref_variance * MODERATE_SPLICING_SHIFT {
        SPLICING_MODERATE
    } else {
        SPLICING_NORMAL
    }
}

pub fn confidence_from_variance(variance: f64) -> Confidence {
    if variance < HIGH_CONFIDENCE_VARIANCE {
        Confidence::High
    } else if variance < MEDIUM_CONFIDENCE_VARIANCE {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

/// Round to one decimal place, ties to even
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

fn mean_of(channel: &str, track: &Track) -> Result<f64, PharmaError> {
    track.mean().ok_or_else(|| PharmaError::EmptyTrack {
        channel: channel.to_string(),
    })
}

fn variance_of(channel: &str, track: &Track) -> Result<f64, PharmaError> {
    track.variance().ok_or_else(|| PharmaError::EmptyTrack {
        channel: channel.to_string(),
    })
}
