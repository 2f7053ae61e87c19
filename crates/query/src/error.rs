//! Query model error types

use thiserror::Error;

/// Errors from the query model layer
#[derive(Debug, Error)]
pub enum QueryError {
    /// Invalid date range (unknown preset, bad date, end before start)
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    /// Invalid granularity string
    #[error("invalid granularity: {0}")]
    InvalidGranularity(String),

    /// Invalid filter operator string
    #[error("invalid operator: {0}")]
    InvalidOperator(String),
}

/// Result type for query model operations
pub type Result<T> = std::result::Result<T, QueryError>;
