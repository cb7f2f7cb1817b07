//! Error types for chart construction and rendering.

use thiserror::Error;

/// The error type for chart operations.
///
/// Every failure is detected during validation, range resolution or
/// geometry building; a render either fully succeeds or returns one of
/// these with no markup produced.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Invalid or contradictory configuration (zero pie total,
    /// unsatisfiable integer scale, bad interval text, ...).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Dataset shape problems: mixed paired/unpaired points, missing
    /// fields, inverted date ranges.
    #[error("invalid data shape: {0}")]
    DataShape(String),

    /// Render was attempted before any data set was added.
    #[error("no data has been added to the chart")]
    EmptyData,
}

/// Result type alias for chart operations.
pub type ChartResult<T> = Result<T, ChartError>;
