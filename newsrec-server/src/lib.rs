// Declare modules to be part of the library crate

pub mod client;
pub mod error;
pub mod grpc_api; // For generated gRPC code
pub mod grpc_services; // For gRPC service implementations
pub mod runtime;
pub mod server;
pub mod shutdown;
pub mod telemetry;

pub use error::{ServerError, ServerResult};
pub use runtime::WorkerPool;
pub use server::RpcServer;
