//! Error types for Chain2Dim
//!
//! Defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::fragment::Position;

/// Main error type for Chain2Dim operations
#[derive(Debug, Error)]
pub enum Chain2DimError {
    /// Chain mode configuration errors
    #[error("Chain mode error: {0}")]
    ChainMode(#[from] ChainModeError),

    /// Fragment insertion errors
    #[error("Fragment error: {0}")]
    Fragment(#[from] FragmentError),

    /// Fragment file parsing errors
    #[error("Fragment parse error: {0}")]
    FragmentParse(#[from] FragmentParseError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid or contradictory chain mode options
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainModeError {
    /// Textual chain kind could not be recognized
    #[error("Unknown chain kind '{0}': expected 'global [gc|ov]' or 'local [n|kb|pp]'")]
    UnknownKind(String),

    /// Weight factor requested for plain global chaining
    #[error("Weight factor is only meaningful with 'global gc', 'global ov' or local chaining")]
    WeightFactorWithGlobal,

    /// Weight factor must be a positive finite number
    #[error("Weight factor must be positive and finite, got {0}")]
    InvalidWeightFactor(f64),

    /// Best-k local chaining needs at least one chain
    #[error("Number of best local chains must be at least 1")]
    ZeroBestK,

    /// Percentage away from the best score must be within 0..=100
    #[error("Percentage away from best score must be in 0..=100, got {0}")]
    InvalidPercentAway(u32),

    /// Coverage filtering requested without overlap chaining
    #[error("Minimum coverage is only meaningful with 'global ov'")]
    CoverageWithoutOverlaps,

    /// Coverage needs a nonempty first sequence
    #[error("Length of the first sequence must be at least 1")]
    ZeroSequenceLength,

    /// Minimum coverage is a fraction of the first sequence
    #[error("Minimum coverage must be in 0..=1, got {0}")]
    InvalidMinCoverage(f64),
}

/// Errors raised when inserting fragments into a table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    /// Start position is larger than end position
    #[error("Invalid range in dimension {dim}: start ({start}) > end ({end})")]
    InvalidRange {
        dim: usize,
        start: Position,
        end: Position,
    },
}

/// Errors that can occur while reading a fragment file
#[derive(Debug, Error)]
pub enum FragmentParseError {
    /// Wrong number of fields on a data line
    #[error("Invalid fragment line at line {line}: expected 5 fields, got {found}")]
    FieldCount { line: usize, found: usize },

    /// Failed to parse an integer field
    #[error("Failed to parse {field} '{value}' at line {line}")]
    ParseInt {
        line: usize,
        field: &'static str,
        value: String,
    },

    /// Range check failed on insertion
    #[error("Invalid fragment at line {line}: {source}")]
    Range {
        line: usize,
        #[source]
        source: FragmentError,
    },

    /// File not found
    #[error("Fragment file not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O error during parsing
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Chain2Dim operations
pub type Result<T> = std::result::Result<T, Chain2DimError>;

/// Result type alias for chain mode construction
pub type ChainModeResult<T> = std::result::Result<T, ChainModeError>;

/// Result type alias for fragment file parsing
pub type FragmentParseResult<T> = std::result::Result<T, FragmentParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_error_message() {
        let err = FragmentError::InvalidRange { dim: 1, start: 9, end: 3 };
        assert_eq!(
            err.to_string(),
            "Invalid range in dimension 1: start (9) > end (3)"
        );
    }

    #[test]
    fn test_mode_error_converts() {
        let err: Chain2DimError = ChainModeError::ZeroBestK.into();
        assert!(matches!(err, Chain2DimError::ChainMode(ChainModeError::ZeroBestK)));
    }

    #[test]
    fn test_parse_error_carries_line() {
        let err = FragmentParseError::FieldCount { line: 7, found: 3 };
        assert!(err.to_string().contains("line 7"));
    }
}
