//! Process lifecycle: bind listeners, serve, shut down.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;

use promdemo_core::error::{DemoError, Result};

use crate::app_state::AppState;
use crate::config::AppConfig;
use crate::router;
use crate::simulator::Simulator;

/// Run until Ctrl-C / SIGTERM. A bind or serve failure is returned as
/// `DemoError::Listener`.
pub async fn run(cfg: AppConfig) -> Result<()> {
    let listen = cfg.server.listen_addr()?;
    let metrics_listen = cfg.server.metrics_addr()?;

    let state = AppState::new(cfg)?;
    if let Some(creds) = state.auth() {
        tracing::info!(user = creds.username(), "basic authentication enabled");
    }

    let main_listener = bind(listen).await?;
    let metrics_listener = match metrics_listen {
        Some(addr) => Some(bind(addr).await?),
        None => None,
    };

    let simulator = state
        .metrics()
        .sim
        .clone()
        .map(|m| Simulator::spawn(m, &state.cfg().simulator));

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = stop_tx.send(true);
    });

    tracing::info!(%listen, "listening");
    let main_srv = serve(main_listener, router::build_router(state.clone()), stop_rx.clone());
    let metrics_srv = async {
        match metrics_listener {
            Some(l) => {
                tracing::info!(addr = %local_addr(&l), "listening (metrics only)");
                serve(l, router::build_metrics_router(state.clone()), stop_rx.clone()).await
            }
            None => Ok(()),
        }
    };
    let served = tokio::try_join!(main_srv, metrics_srv);

    if let Some(sim) = simulator {
        sim.shutdown().await?;
    }
    served?;

    tracing::info!("shutdown complete");
    Ok(())
}

async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr).await.map_err(|e| DemoError::Listener {
        addr: addr.to_string(),
        reason: format!("bind failed: {e}"),
    })
}

fn local_addr(l: &TcpListener) -> String {
    l.local_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".into())
}

async fn serve(listener: TcpListener, app: Router, mut stop: watch::Receiver<bool>) -> Result<()> {
    let addr = local_addr(&listener);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = stop.wait_for(|stopped| *stopped).await;
        })
        .await
        .map_err(|e| DemoError::Listener {
            addr,
            reason: format!("serve failed: {e}"),
        })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
