//! Logging setup.
//!
//! Console output goes to stderr so stdout only carries the startup line.
//! When `log_file` is configured, a second layer writes plain-text logs to a
//! daily rotated file.

use std::path::Path;

use newsrec_core::ServerConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::{ServerError, ServerResult};

/// Installs the global subscriber. `RUST_LOG` takes precedence over `config.log_level`.
///
/// The returned guard flushes the file writer on drop and must be kept alive
/// for as long as logs should be written.
pub fn init(config: &ServerConfig) -> ServerResult<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| ServerError::Logging(format!("invalid log level {:?}: {}", config.log_level, e)))?;

    let console_layer = fmt::layer().with_writer(std::io::stderr).with_target(true);

    let (file_layer, guard) = match &config.log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .ok_or_else(|| ServerError::Logging(format!("log_file {:?} has no file name", path)))?;
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));

            let appender = tracing_appender::rolling::daily(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| ServerError::Logging(e.to_string()))?;

    tracing::info!(log_file = ?config.log_file, "Tracing logger initialized");
    Ok(guard)
}
