use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving the server configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port value {value:?}: expected an integer")]
    InvalidPort { value: String },

    #[error("Invalid max_workers value {value:?}: expected a positive integer")]
    InvalidWorkers { value: String },

    #[error("Failed to read settings file {path:?}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors a recommender implementation can report back to the RPC layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    #[error("Recommender is not available: {0}")]
    Unavailable(&'static str),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unknown user: {0}")]
    UnknownUser(i32),

    #[error("Internal recommender error: {0}")]
    Internal(String),
}

/// Result type for `Recommender` operations.
pub type RecommendResult<T> = Result<T, RecommendError>;
