// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Listener bootstrap.
//!
//! Timeouts are split between the connection and the router:
//! - idle: hyper's HTTP/1 header-read timer, which also runs while a
//!   keep-alive connection waits for its next request
//! - read: request body deadline (`RequestBodyTimeoutLayer` in [`crate::api::router`])
//! - write: response deadline (`TimeoutLayer` in [`crate::api::router`])

use std::{io, net::SocketAddr, time::Duration};

use axum::Router;
use axum_server::Handle;
use hyper_util::rt::TokioTimer;

/// How long in-flight requests get to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerTimeouts {
    pub idle: Duration,
    pub read: Duration,
    pub write: Duration,
}

impl Default for ServerTimeouts {
    fn default() -> Self {
        Self {
            idle: Duration::from_secs(60),
            read: Duration::from_secs(10),
            write: Duration::from_secs(30),
        }
    }
}

/// Bind `addr` and serve `app` until SIGINT/SIGTERM.
///
/// Returns an error if the listener cannot be bound; request-level failures
/// never surface here.
pub async fn serve(addr: SocketAddr, app: Router, timeouts: ServerTimeouts) -> io::Result<()> {
    let handle = Handle::new();
    tokio::spawn(shutdown_on_signal(handle.clone()));

    let mut server = axum_server::bind(addr);
    server
        .http_builder()
        .http1()
        .timer(TokioTimer::new())
        .header_read_timeout(timeouts.idle);

    tracing::info!(%addr, ?timeouts, "Movies API listening (docs at /docs)");

    server
        .handle(handle)
        .serve(app.into_make_service())
        .await
}

async fn shutdown_on_signal(handle: Handle<SocketAddr>) {
    shutdown_signal().await;
    tracing::info!("shutdown signal received, draining connections");
    handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
