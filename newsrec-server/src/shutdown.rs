use std::future::Future;

#[cfg(not(unix))]
use tracing::error;
use tracing::info;

/// Resolves once the process receives Ctrl+C or SIGTERM.
///
/// On unix the handlers are registered when this is called, not when the
/// future is first polled, so a signal that arrives in between is not lost.
/// Must be called from inside a tokio runtime. If a handler cannot be
/// installed the error is logged and that branch never resolves.
pub fn signal() -> impl Future<Output = ()> + Send {
    #[cfg(unix)]
    let (interrupt, terminate) = (
        unix::listen(tokio::signal::unix::SignalKind::interrupt(), "Ctrl+C"),
        unix::listen(tokio::signal::unix::SignalKind::terminate(), "SIGTERM"),
    );

    async move {
        #[cfg(unix)]
        tokio::select! {
            _ = unix::recv(interrupt) => {
                info!("Received Ctrl+C, initiating graceful shutdown...");
            },
            _ = unix::recv(terminate) => {
                info!("Received terminate signal, initiating graceful shutdown...");
            },
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
    }
}

#[cfg(unix)]
mod unix {
    use tokio::signal::unix::{signal, Signal, SignalKind};
    use tracing::error;

    pub(super) fn listen(kind: SignalKind, name: &'static str) -> Option<Signal> {
        match signal(kind) {
            Ok(sig) => Some(sig),
            Err(e) => {
                error!(error = %e, "Failed to install {} handler", name);
                None
            }
        }
    }

    pub(super) async fn recv(sig: Option<Signal>) {
        match sig {
            Some(mut sig) => {
                sig.recv().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
