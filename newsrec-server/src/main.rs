use std::process::ExitCode;

use newsrec_core::{ServerConfig, UnavailableRecommender};
use newsrec_server::{server, telemetry, ServerResult, WorkerPool};
use tracing::{error, info};

fn main() -> ExitCode {
    let config = match ServerConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("newsrec-server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Held until exit so buffered file logs are flushed.
    let _log_guard = match telemetry::init(&config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("newsrec-server: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match start(&config) {
        Ok(()) => {
            info!("Shut down cleanly");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Server failed to start");
            eprintln!("newsrec-server: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn start(config: &ServerConfig) -> ServerResult<()> {
    let pool = WorkerPool::new(config.max_workers)?;
    info!(workers = pool.capacity(), "Worker pool ready");

    // No model is linked into this binary; calls are answered with UNIMPLEMENTED.
    pool.block_on(server::run(config, UnavailableRecommender))
}
