//! Error types for rodd-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that abort a CLI invocation
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] rodd_core::Error),

    #[error("Failed to format output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to format output: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
