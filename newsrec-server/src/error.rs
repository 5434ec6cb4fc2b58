use newsrec_core::{ConfigError, RecommendError};
use thiserror::Error;
use tonic::Status;
use tracing::error;

/// Server-specific error types. Every variant is fatal at startup.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start worker pool: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("gRPC transport error: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("Failed to initialise logging: {0}")]
    Logging(String),

    #[error("Failed to write startup message: {0}")]
    Output(#[source] std::io::Error),
}

// Define a Result type alias for server operations
pub type ServerResult<T> = Result<T, ServerError>;

/// Converts a recommender failure into the gRPC status returned to the caller.
pub fn status_from_recommend_error(err: RecommendError) -> Status {
    match err {
        RecommendError::Unavailable(reason) => Status::unimplemented(reason),
        RecommendError::InvalidInput(msg) => Status::invalid_argument(msg),
        RecommendError::UnknownUser(id) => Status::not_found(format!("User {} not found", id)),
        RecommendError::Internal(msg) => {
            error!(error = %msg, "Recommender internal error");
            Status::internal("Internal recommender error")
        }
    }
}
