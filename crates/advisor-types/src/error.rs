//! Error types for crop-advisor

use std::path::PathBuf;

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),
}

/// Errors raised while loading model and preprocessor artifacts.
///
/// All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Artifact not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Artifact {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("Artifacts are incompatible: {0}")]
    Incompatible(String),
}

/// Input rejected by a feature encoder
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("Unknown value '{value}' for field '{field}'")]
    UnknownCategory { field: String, value: String },

    #[error("Missing field '{0}'")]
    MissingField(String),

    #[error("Field '{field}' must be {expected}")]
    WrongKind { field: String, expected: &'static str },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),

    #[error("Schema mismatch: {0}")]
    Schema(#[from] SchemaError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Excel export error: {0}")]
    Excel(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(ConfigError::ParseError(e.to_string()))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
