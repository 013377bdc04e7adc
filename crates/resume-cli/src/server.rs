//! Serving the router until the process is asked to stop.

use std::future::{Future, IntoFuture, pending};
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::oneshot;

use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Binds the configured address and serves `app` until SIGINT or SIGTERM.
pub async fn serve(app: Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("cannot listen on {addr}"))?;

    tracing::info!(target: TRACING_TARGET_SERVER_STARTUP, %addr, "listening");
    if config.is_public() {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "listening on every interface"
        );
    }

    run(listener, app, stop_requested(), config.drain_timeout()).await
}

/// Serves `app` on `listener` until `stop` resolves, then gives in-flight
/// requests at most `drain` to finish.
async fn run(
    listener: TcpListener,
    app: Router,
    stop: impl Future<Output = ()> + Send + 'static,
    drain: Duration,
) -> anyhow::Result<()> {
    let (stopped_tx, stopped_rx) = oneshot::channel::<()>();
    let stop = async move {
        stop.await;
        let _ = stopped_tx.send(());
    };

    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(stop)
    .into_future();

    let deadline = async move {
        if stopped_rx.await.is_err() {
            pending::<()>().await;
        }
        tokio::time::sleep(drain).await;
    };

    tokio::select! {
        result = server => {
            result.context("server failed")?;
            tracing::info!(target: TRACING_TARGET_SERVER_SHUTDOWN, "drained");
        }
        () = deadline => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                drain_secs = drain.as_secs(),
                "drain window elapsed, abandoning open connections"
            );
        }
    }

    Ok(())
}

/// Resolves on the first SIGINT or, on Unix, SIGTERM.
async fn stop_requested() {
    let interrupt = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(target: TRACING_TARGET_SERVER_SHUTDOWN, %err, "SIGINT unavailable");
            pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(target: TRACING_TARGET_SERVER_SHUTDOWN, %err, "SIGTERM unavailable");
                pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = pending::<()>();

    let received = tokio::select! {
        () = interrupt => "SIGINT",
        () = terminate => "SIGTERM",
    };

    tracing::info!(target: TRACING_TARGET_SERVER_SHUTDOWN, signal = received, "stopping");
}
