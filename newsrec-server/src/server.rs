//! Server bootstrap: bind, announce, serve until shutdown.

use std::future::Future;
use std::io::{self, Write};
use std::net::SocketAddr;
use std::sync::Arc;

use newsrec_core::{Recommender, ServerConfig};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tracing::info;

use crate::error::{ServerError, ServerResult};
use crate::grpc_api::NewsRecommendServer;
use crate::grpc_services::NewsRecommendServerImpl;
use crate::shutdown;

/// A gRPC server whose listener is already bound but not yet accepting calls.
pub struct RpcServer<R: Recommender> {
    host: String,
    listener: TcpListener,
    local_addr: SocketAddr,
    service: NewsRecommendServer<NewsRecommendServerImpl<R>>,
}

impl<R: Recommender> RpcServer<R> {
    /// Registers the servicer and binds `host:port` in a single attempt.
    ///
    /// A port outside `0..=65535` fails here as a bind error.
    pub async fn bind(config: &ServerConfig, recommender: Arc<R>) -> ServerResult<Self> {
        let addr = config.bind_target();
        let bind_err = |source: io::Error| ServerError::Bind {
            addr: addr.clone(),
            source,
        };

        let port = u16::try_from(config.port).map_err(|_| {
            bind_err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("port {} is outside 0..=65535", config.port),
            ))
        })?;
        let listener = TcpListener::bind((config.host.as_str(), port))
            .await
            .map_err(bind_err)?;
        let local_addr = listener.local_addr().map_err(bind_err)?;
        info!(%local_addr, requested = %addr, "gRPC listener bound");

        Ok(RpcServer {
            host: config.host.clone(),
            listener,
            local_addr,
            service: NewsRecommendServer::new(NewsRecommendServerImpl::new(recommender)),
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// The startup line: configured host and the port actually bound.
    pub fn startup_message(&self) -> String {
        format!("Server started at {}:{}", self.host, self.local_addr.port())
    }

    /// Accepts calls until `signal` resolves, then drains in-flight calls and returns.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send,
    {
        let incoming = TcpListenerStream::new(self.listener);
        tonic::transport::Server::builder()
            .add_service(self.service)
            .serve_with_incoming_shutdown(incoming, signal)
            .await?;
        info!("gRPC server stopped");
        Ok(())
    }
}

/// Binds, writes the startup line to `out` and serves until `signal` resolves.
///
/// Nothing is written to `out` when binding fails.
pub async fn run_until<R, W, F>(
    config: &ServerConfig,
    recommender: R,
    out: &mut W,
    signal: F,
) -> ServerResult<()>
where
    R: Recommender,
    W: Write,
    F: Future<Output = ()> + Send,
{
    let server = RpcServer::bind(config, Arc::new(recommender)).await?;
    writeln!(out, "{}", server.startup_message()).map_err(ServerError::Output)?;
    out.flush().map_err(ServerError::Output)?;
    server.serve_with_shutdown(signal).await
}

/// Runs the server on stdout until Ctrl+C or SIGTERM.
pub async fn run<R: Recommender>(config: &ServerConfig, recommender: R) -> ServerResult<()> {
    info!("Starting news recommend RPC server");
    let signal = shutdown::signal();
    run_until(config, recommender, &mut std::io::stdout(), signal).await
}
