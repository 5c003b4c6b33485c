use thiserror::Error;

#[derive(Error, Debug)]
pub enum SpeclensError {
    #[error("No test files found under: {root}")]
    NoTestFilesFound { root: String },

    #[error("No analysis results found at: {path}. Run 'speclens analyze' first")]
    ResultsNotFound { path: String },

    #[error("Failed to persist analysis results: {0}")]
    PersistenceError(String),

    #[error("Pattern compilation failed: {0}")]
    PatternError(#[from] regex::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, SpeclensError>;
