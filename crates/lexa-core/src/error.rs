use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the lexa-core crate and dependents.
#[derive(Debug, Error)]
pub enum LexaError {
    #[error("corpus file not found: {}", path.display())]
    CorpusNotFound { path: PathBuf },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{origin} is not valid JSON: {source}")]
    MalformedJson {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid corpus: {0}")]
    InvalidCorpus(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience Result alias used across the workspace.
pub type Result<T> = std::result::Result<T, LexaError>;
