//! Fixed-size worker pool that runs the server and every inbound call.

use std::future::Future;
use std::io;

use tokio::runtime::{Builder, Runtime};

use crate::error::{ServerError, ServerResult};

pub const WORKER_THREAD_NAME: &str = "newsrec-worker";

/// A multi-threaded tokio runtime with exactly `capacity` worker threads.
#[derive(Debug)]
pub struct WorkerPool {
    runtime: Runtime,
    capacity: usize,
}

impl WorkerPool {
    pub fn new(capacity: usize) -> ServerResult<Self> {
        if capacity == 0 {
            return Err(ServerError::Runtime(io::Error::new(
                io::ErrorKind::InvalidInput,
                "worker pool capacity must be at least 1",
            )));
        }
        let runtime = Builder::new_multi_thread()
            .worker_threads(capacity)
            .thread_name(WORKER_THREAD_NAME)
            .enable_all()
            .build()
            .map_err(ServerError::Runtime)?;
        Ok(WorkerPool { runtime, capacity })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Blocks the calling thread until `future` completes on the pool.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }
}
