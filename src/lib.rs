//! pharmacode: pharmacogenomic variant effect predictions
//!
//! A small catalog of clinically relevant variants, the math that turns
//! reference and alternate allele track predictions into summary figures,
//! and (behind the `web-service` feature) the HTTP API that serves them.
//!
//! # Example
//!
//! ```
//! use pharmacode::{mock_prediction, VariantCatalog};
//!
//! let catalog = VariantCatalog::builtin();
//! let record = catalog.lookup("CYP2D6*4").unwrap();
//! assert_eq!(record.gene_region.start, 42522000);
//!
//! let prediction = mock_prediction(&record.name);
//! assert_eq!(prediction.molecular_effects.gene_expression_change, -45.2);
//! ```

pub mod catalog;
pub mod error;
pub mod prediction;
#[cfg(feature = "web-service")]
pub mod service;

// Re-export commonly used types
pub use catalog::{GeneRegion, GenomicInterval, GenomicVariant, VariantCatalog, VariantRecord};
pub use error::{ErrorCode, PharmaError};
pub use prediction::{
    mock_prediction, summarize, AlleleOutputs, Confidence, MolecularEffects, PredictionResponse,
    Track, VariantOutputs,
};

/// Result type alias for pharmacode operations
pub type Result<T> = std::result::Result<T, PharmaError>;
