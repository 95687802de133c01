//! CLI error types

use thiserror::Error;

/// CLI error types
#[derive(Debug, Error)]
pub enum CliError {
    /// HTTP client setup error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Monitoring backend error outside of a report run
    #[error("Backend error: {0}")]
    Backend(#[from] svcreport_tree::BackendError),

    /// Report resolution failed
    #[error("Report failed: {0}")]
    Report(#[from] svcreport_tree::TreeError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl From<svcreport_types::TypesError> for CliError {
    fn from(e: svcreport_types::TypesError) -> Self {
        CliError::Config(e.to_string())
    }
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;
