use std::future::{Future, IntoFuture};
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::config::ApiConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;
use crate::state::AppState;

/// Default drain window after a shutdown signal.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(10);

/// Storage gateway HTTP server.
pub struct GatewayServer {
    config: ApiConfig,
    state: AppState,
    shutdown_timeout: Duration,
}

impl GatewayServer {
    pub fn new(config: ApiConfig, state: AppState) -> Self {
        Self {
            config,
            state,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        }
    }

    pub fn with_shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = timeout;
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Bind the configured address and serve until Ctrl-C or SIGTERM.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        self.serve_with_listener(listener, shutdown_signal()).await
    }

    /// Serve on `listener` until `shutdown` resolves.
    ///
    /// After the signal, in-flight requests get `shutdown_timeout` to finish;
    /// connections still open after that are dropped.
    pub async fn serve_with_listener<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        info!(%addr, "storage gateway listening");

        let (signalled_tx, signalled_rx) = oneshot::channel::<()>();
        let signal = async move {
            shutdown.await;
            info!("shutdown signal received, draining connections");
            let _ = signalled_tx.send(());
        };
        let serve = axum::serve(listener, self.router())
            .with_graceful_shutdown(signal)
            .into_future();

        let drain = self.shutdown_timeout;
        let deadline = async move {
            match signalled_rx.await {
                Ok(()) => tokio::time::sleep(drain).await,
                Err(_) => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            result = serve => result.map_err(|e| ServerError::Internal(e.to_string()))?,
            _ = deadline => warn!(timeout = ?drain, "shutdown timeout elapsed, dropping open connections"),
        }
        info!("storage gateway stopped");
        Ok(())
    }
}

/// Unix signals that stop the gateway, besides Ctrl-C.
#[cfg(unix)]
pub const SHUTDOWN_SIGNALS: [tokio::signal::unix::SignalKind; 2] = [
    tokio::signal::unix::SignalKind::terminate(),
    tokio::signal::unix::SignalKind::quit(),
];

/// Resolves on Ctrl-C, or on unix on any of [`SHUTDOWN_SIGNALS`].
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "could not listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        let [term, quit] = SHUTDOWN_SIGNALS.map(|kind| {
            tokio::signal::unix::signal(kind)
                .map_err(|e| warn!(error = %e, signal = ?kind, "could not install signal handler"))
                .ok()
        });
        tokio::select! {
            _ = recv_or_pending(term) => info!("SIGTERM received"),
            _ = recv_or_pending(quit) => info!("SIGQUIT received"),
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(unix)]
async fn recv_or_pending(signal: Option<tokio::signal::unix::Signal>) {
    match signal {
        Some(mut signal) => {
            signal.recv().await;
        }
        None => std::future::pending::<()>().await,
    }
}
