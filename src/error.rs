//! Error types for pharmacode
//!
//! Catalog and analysis failures are reported as [`PharmaError`]. The web
//! service maps these onto HTTP-level errors in `service::types`.

use thiserror::Error;

/// Error codes for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ErrorCode {
    // Catalog errors (E1xxx)
    /// Variant identifier not present in the catalog
    UnknownVariant = 1001,
    /// Catalog content failed validation
    InvalidCatalog = 1002,

    // Analysis errors (E2xxx)
    /// Model output track has no samples
    EmptyTrack = 2001,
    /// Reference channel mean is zero
    ZeroReferenceMean = 2002,
    /// Derived value is NaN or infinite
    NonFiniteValue = 2003,

    // IO errors (E9xxx)
    /// File IO error
    IoError = 9001,
    /// JSON parsing error
    JsonError = 9002,
}

impl ErrorCode {
    /// Get the error code as a string (e.g., "E1001")
    pub fn as_str(&self) -> String {
        format!("E{:04}", *self as u16)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for pharmacode operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PharmaError {
    /// Variant is not in the catalog
    #[error("Variant not found: {name}. Available: {}", available.join(", "))]
    UnknownVariant {
        name: String,
        /// Every identifier the catalog does know, in catalog order
        available: Vec<String>,
    },

    /// Catalog failed validation on load
    #[error("Invalid catalog: {msg}")]
    InvalidCatalog { msg: String },

    /// A model output track carried no samples
    #[error("Empty {channel} track")]
    EmptyTrack { channel: String },

    /// Percent change is undefined for a zero reference mean
    #[error("Reference {channel} mean is zero; percent change is undefined")]
    ZeroReferenceMean { channel: String },

    /// Arithmetic produced NaN or infinity
    #[error("Non-finite {channel} value: {value}")]
    NonFinite { channel: String, value: f64 },

    /// IO error (for file operations)
    #[error("IO error: {msg}")]
    Io { msg: String },

    /// JSON parsing error
    #[error("JSON error: {msg}")]
    Json { msg: String },
}

impl PharmaError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            PharmaError::UnknownVariant { .. } => ErrorCode::UnknownVariant,
            PharmaError::InvalidCatalog { .. } => ErrorCode::InvalidCatalog,
            PharmaError::EmptyTrack { .. } => ErrorCode::EmptyTrack,
            PharmaError::ZeroReferenceMean { .. } => ErrorCode::ZeroReferenceMean,
            PharmaError::NonFinite { .. } => ErrorCode::NonFiniteValue,
            PharmaError::Io { .. } => ErrorCode::IoError,
            PharmaError::Json { .. } => ErrorCode::JsonError,
        }
    }

    pub(crate) fn invalid_catalog(msg: impl Into<String>) -> Self {
        PharmaError::InvalidCatalog { msg: msg.into() }
    }
}

impl From<std::io::Error> for PharmaError {
    fn from(err: std::io::Error) -> Self {
        PharmaError::Io {
            msg: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PharmaError {
    fn from(err: serde_json::Error) -> Self {
        PharmaError::Json {
            msg: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::UnknownVariant.as_str(), "E1001");
        assert_eq!(ErrorCode::ZeroReferenceMean.to_string(), "E2002");
        assert_eq!(ErrorCode::JsonError.as_str(), "E9002");
    }

    #[test]
    fn test_unknown_variant_lists_available() {
        let err = PharmaError::UnknownVariant {
            name: "nonexistent".to_string(),
            available: vec!["CYP2D6*4".to_string(), "DPYD*2A".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Variant not found: nonexistent. Available: CYP2D6*4, DPYD*2A"
        );
        assert_eq!(err.code(), ErrorCode::UnknownVariant);
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err: PharmaError = io.into();
        assert!(matches!(err, PharmaError::Io { .. }));
        assert!(err.to_string().contains("missing.json"));
    }
}
