use std::sync::OnceLock;

use anyhow::Context as _;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use neobench_metrics::TransactionCounters;
use tokio::net::TcpListener;

use crate::exit_codes::ExitCode;
use crate::output::{Error, Result};

pub(crate) const METRICS_PATH: &str = "/metrics";

const OPENMETRICS_CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

static LISTENER: OnceLock<String> = OnceLock::new();

/// Address the process-wide metrics listener was started on, if any.
pub(crate) fn metrics_listener_address() -> Option<&'static str> {
    LISTENER.get().map(String::as_str)
}

/// A bare `:port` binds every interface.
fn normalize_listen_addr(addr: &str) -> String {
    match addr.strip_prefix(':') {
        Some(port) => format!("0.0.0.0:{port}"),
        None => addr.to_string(),
    }
}

/// Starts serving the global transaction counters on `addr`, once per process.
///
/// Calling again with the same address is a no-op. The listener binds on a
/// background task; a bind or serve failure terminates the process.
pub(crate) fn start_metrics_listener(addr: &str) -> Result<()> {
    let bind_addr = normalize_listen_addr(addr);

    if let Some(current) = metrics_listener_address() {
        return same_listener(current, &bind_addr);
    }

    let handle = tokio::runtime::Handle::try_current().map_err(|_| Error::NoRuntime)?;

    let mut won = false;
    let current = LISTENER.get_or_init(|| {
        won = true;
        bind_addr.clone()
    });
    if !won {
        return same_listener(current, &bind_addr);
    }

    handle.spawn(async move {
        let res = async {
            let listener = bind(&bind_addr).await?;
            serve_on(listener, TransactionCounters::global()).await
        }
        .await;

        if let Err(err) = res {
            tracing::error!(addr = %bind_addr, "metrics listener failed: {err:#}");
            eprintln!("ERROR: {err:#}");
            std::process::exit(ExitCode::RuntimeError.as_i32());
        }
    });

    Ok(())
}

fn same_listener(current: &str, requested: &str) -> Result<()> {
    if current == requested {
        Ok(())
    } else {
        Err(Error::MetricsAlreadyListening {
            current: current.to_string(),
        })
    }
}

async fn bind(addr: &str) -> anyhow::Result<TcpListener> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind metrics listener: {addr}"))?;
    let local = listener
        .local_addr()
        .context("failed to resolve metrics listener address")?;
    tracing::info!(%local, path = METRICS_PATH, "metrics listener started");
    Ok(listener)
}

async fn serve_on(
    listener: TcpListener,
    counters: &'static TransactionCounters,
) -> anyhow::Result<()> {
    axum::serve(listener, router(counters))
        .await
        .context("metrics listener stopped")
}

fn router(counters: &'static TransactionCounters) -> Router {
    Router::new()
        .route(METRICS_PATH, get(metrics))
        .with_state(counters)
}

async fn metrics(State(counters): State<&'static TransactionCounters>) -> Response {
    match counters.encode() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}
