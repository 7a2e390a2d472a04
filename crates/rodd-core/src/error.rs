//! Error types for rodd-core

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] rodd_fs::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize record: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Invalid field '{field}': {message}")]
    InvalidField { field: String, message: String },

    #[error("Label {label:?} does not produce a usable resource name")]
    EmptyResourceName { label: String },

    #[error("Refusing to overwrite existing file {path}")]
    TargetExists { path: PathBuf },

    #[error("Validator program '{program}' could not be started: {source}")]
    ValidatorUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Validator command '{command}' exited with code {code}: {output}")]
    ValidatorFailed {
        command: String,
        code: i32,
        output: String,
    },

    #[error("Unknown component: {item_type}")]
    UnknownComponent { item_type: String },

    #[error("Resource not found: {id}")]
    ResourceNotFound { id: String },
}

impl Error {
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            message: message.into(),
        }
    }
}
