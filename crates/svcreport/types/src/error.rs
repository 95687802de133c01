//! Error types for report configuration and value construction.

use thiserror::Error;

/// Errors raised while building report types.
#[derive(Debug, Error, PartialEq)]
pub enum TypesError {
    /// Options that cannot be combined.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A percentage that is not a finite number.
    #[error("invalid percentage: {0}")]
    InvalidPercentage(String),
}

pub type TypesResult<T> = Result<T, TypesError>;
