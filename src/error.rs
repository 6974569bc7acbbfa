//! Error types for the analysis pipeline.

use thiserror::Error;

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while parsing, decomposing, or fitting.
///
/// Every failure in the modeling stage is converted into one of these
/// variants; the web layer renders a single message from it and shows no
/// partial results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Uploaded content is not readable as a single numeric column.
    #[error("could not parse input: {0}")]
    Parse(String),

    /// Fewer data points than the operation requires.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// A form value is outside its allowed range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Numerical failure during model estimation.
    #[error("model estimation failed: {0}")]
    ModelFit(String),

    /// Calendar index could not be synthesized.
    #[error("timestamp error: {0}")]
    Timestamp(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,
}
