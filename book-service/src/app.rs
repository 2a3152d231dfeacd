use std::{future::Future, net::SocketAddr};

use anyhow::{Context, Result};
use axum::Router;
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tracing::{info, warn};

use crate::http::router;
use crate::registry::Registry;

/// A bound HTTP server that has not started accepting requests yet.
pub struct App {
    listener: TcpListener,
    router: Router,
}

impl App {
    pub fn new(listener: TcpListener, registry: &Registry) -> Self {
        Self {
            listener,
            router: router(registry),
        }
    }

    pub async fn bind(addr: SocketAddr, registry: &Registry) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        Ok(Self::new(listener, registry))
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves requests until `shutdown` resolves, then drains in-flight
    /// requests and returns.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let App { listener, router } = self;
        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await
        .context("http server failed")?;

        info!("server stopped");
        Ok(())
    }

    pub async fn run_until_signal(self) -> Result<()> {
        self.run_until(async {
            let reason = shutdown_signal().await;
            info!(reason, "start shutdown");
        })
        .await
    }

    /// Starts serving on a background task.
    pub fn start(self) -> Result<AppHandle> {
        let local_addr = self.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(self.run_until(async move {
            let _ = shutdown_rx.await;
        }));

        Ok(AppHandle {
            local_addr,
            shutdown: shutdown_tx,
            task,
        })
    }
}

/// Handle to a server started with [`App::start`]. Dropping it also stops
/// the server.
pub struct AppHandle {
    local_addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<Result<()>>,
}

impl AppHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub async fn stop(self) -> Result<()> {
        let _ = self.shutdown.send(());
        self.task.await.context("server task panicked")?
    }
}

#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{SignalKind, signal};

    let (mut terminate, mut hangup) =
        match (signal(SignalKind::terminate()), signal(SignalKind::hangup())) {
            (Ok(terminate), Ok(hangup)) => (terminate, hangup),
            (Err(err), _) | (_, Err(err)) => {
                warn!(error = ?err, "failed to install signal handlers, falling back to ctrl-c");
                return ctrl_c().await;
            }
        };

    tokio::select! {
        reason = ctrl_c() => reason,
        _ = terminate.recv() => "terminate",
        _ = hangup.recv() => "hangup",
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    ctrl_c().await
}

async fn ctrl_c() -> &'static str {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = ?err, "failed to install ctrl-c handler");
    }
    "interrupt"
}
