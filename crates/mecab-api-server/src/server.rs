//! HTTP surface of the gateway

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use mecab_api_core::dispatch::{BackendSelection, DispatchError};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::params::RequestParams;
use crate::shutdown;
use crate::state::AppState;

/// Request-fatal failures, reported as 500
#[derive(Debug, thiserror::Error)]
pub enum TokenizeError {
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("Tokenizer task panicked: {0}")]
    Panicked(String),
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", any(tokenize_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve until `shutdown` fires, then drain in-flight requests for at most `grace`
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: CancellationToken,
    grace: Duration,
) -> anyhow::Result<()> {
    let addr = listener.local_addr().context("listener has no local address")?;
    info!("Serving on {}", addr);

    let stop = shutdown.clone();
    let server = axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { stop.cancelled().await })
        .into_future();

    match shutdown::drain(server, shutdown, grace).await {
        Some(result) => result.context("server error")?,
        None => warn!("Exiting with requests still in flight"),
    }

    info!("Server stopped");
    Ok(())
}

/// Tokenize endpoint
pub async fn tokenize_handler(State(state): State<Arc<AppState>>, params: RequestParams) -> Response {
    let request_id = Uuid::new_v4();
    let selection = BackendSelection::parse(&params.parsers);

    debug!(
        request_id = %request_id,
        parsers = %params.parsers,
        chars = params.sentense.chars().count(),
        "Tokenizing"
    );

    let dispatcher = state.dispatcher.clone();
    let sentence = params.sentense;
    let result = match tokio::task::spawn_blocking(move || dispatcher.handle(&sentence, &selection)).await {
        Ok(result) => result.map_err(TokenizeError::from),
        Err(join_err) => Err(TokenizeError::Panicked(join_err.to_string())),
    };

    match result {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Tokenization failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": e.to_string(),
                    "request_id": request_id.to_string(),
                })),
            )
                .into_response()
        }
    }
}

/// Liveness probe listing the available backends
pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let backends: Vec<&str> = state
        .dispatcher
        .registry()
        .available()
        .map(|id| id.as_str())
        .collect();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "backends": backends,
        })),
    )
}
