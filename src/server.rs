//! Process lifecycle: starting, serving, draining, stopped.

use crate::config::Config;
use crate::db;
use crate::error::StartupError;
use crate::routes::app;
use crate::state::AppState;
use crate::store::PgTodoStore;
use axum::Router;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use hyper_util::service::TowerToHyperService;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;

/// Connects to the database, serves until SIGTERM/SIGINT, drains, then closes the pool.
pub async fn run(config: Config) -> Result<(), StartupError> {
    tracing::info!(phase = "starting", addr = %config.server_addr, "todod starting");
    let pool = db::connect(&config).await?;
    let store = Arc::new(PgTodoStore::new(pool));
    let router = app(AppState::new(store.clone()));

    let result = match bind(&config.server_addr).await {
        Ok(listener) => {
            serve(listener, router, shutdown_signal(), config.server_shutdown_timeout).await
        }
        Err(e) => Err(e),
    };

    store.close(config.server_shutdown_timeout).await;
    tracing::info!(phase = "stopped", "todod stopped");
    result
}

/// Accepts `:8080` as shorthand for all interfaces.
pub fn listen_addr(raw: &str) -> String {
    if raw.starts_with(':') {
        format!("0.0.0.0{}", raw)
    } else {
        raw.to_string()
    }
}

pub async fn bind(raw: &str) -> Result<TcpListener, StartupError> {
    let addr = listen_addr(raw);
    TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })
}

/// Serves `router` until `shutdown` resolves, then stops accepting and lets in-flight
/// requests finish for at most `drain_timeout`. Connection tasks still running after that
/// are aborted, which drops their sockets and cancels the handlers.
///
/// Connections are HTTP/1.1 so each handler future lives inside its connection task.
pub async fn serve<F>(
    listener: TcpListener,
    router: Router,
    shutdown: F,
    drain_timeout: Duration,
) -> Result<(), StartupError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    let (drain_tx, drain_rx) = watch::channel(false);
    let mut connections = JoinSet::new();
    tokio::pin!(shutdown);
    tracing::info!(phase = "serving", %addr, "api server started");

    loop {
        tokio::select! {
            biased;

            () = &mut shutdown => break,

            res = listener.accept() => {
                let (stream, peer) = match res {
                    Ok(v) => v,
                    Err(e) => {
                        tracing::warn!(error = %e, "accept failed");
                        continue;
                    }
                };
                let service = TowerToHyperService::new(router.clone());
                let mut drain_rx = drain_rx.clone();
                connections.spawn(async move {
                    let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
                    tokio::pin!(conn);
                    let res = tokio::select! {
                        res = conn.as_mut() => res,
                        _ = drain_rx.changed() => {
                            conn.as_mut().graceful_shutdown();
                            conn.as_mut().await
                        }
                    };
                    if let Err(e) = res {
                        tracing::debug!(%peer, error = %e, "connection closed with error");
                    }
                });
            }

            Some(_) = connections.join_next(), if !connections.is_empty() => {}
        }
    }

    drop(listener);
    tracing::info!(
        phase = "draining",
        in_flight = connections.len(),
        timeout = ?drain_timeout,
        "api server shutting down"
    );
    let _ = drain_tx.send(true);

    let drained = tokio::time::timeout(drain_timeout, async {
        while connections.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        tracing::warn!(
            remaining = connections.len(),
            "drain timed out, closing remaining connections"
        );
        connections.shutdown().await;
    }
    tracing::info!("api server stopped");
    Ok(())
}

/// Resolves on the first SIGINT (Ctrl-C) or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "could not install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "could not install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = sigterm => {}
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colon_port_means_all_interfaces() {
        assert_eq!(listen_addr(":8080"), "0.0.0.0:8080");
        assert_eq!(listen_addr("127.0.0.1:9000"), "127.0.0.1:9000");
    }

    #[tokio::test]
    async fn bind_failure_is_reported() {
        let held = bind("127.0.0.1:0").await.unwrap();
        let addr = held.local_addr().unwrap().to_string();
        let err = bind(&addr).await.unwrap_err();
        assert!(matches!(err, StartupError::Bind { .. }));
    }
}
