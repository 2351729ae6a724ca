//! # HTTP Server Module
//!
//! Accepts uploads from devices over HTTP.
//!
//! Routes:
//! - `GET /` - liveness greeting
//! - `POST /v0/data` - raw V0 upload body; decoded, then appended to storage
//!
//! A bad upload or a failed write is answered with an error status and
//! logged; the server keeps running.

use std::io;
use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
use bytes::Bytes;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::protocol::decoder::decode_v0;
use crate::protocol::record::V0_MAX_PAYLOAD_LEN;
use crate::storage::SampleWriter;

/// Body of a successful acknowledgement
pub const ACK: &str = "!\n";

/// Body of `GET /`
pub const GREETING: &str = "Hello seder!";

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub writer: SampleWriter,
}

/// Build the application router
pub fn router(writer: SampleWriter) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/v0/data", post(ingest_v0))
        .layer(DefaultBodyLimit::max(V0_MAX_PAYLOAD_LEN))
        .with_state(Arc::new(AppState { writer }))
}

/// Serve until Ctrl+C
pub async fn serve(listener: TcpListener, writer: SampleWriter) -> io::Result<()> {
    axum::serve(listener, router(writer))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received Ctrl+C, shutting down...");
}

async fn hello() -> &'static str {
    GREETING
}

async fn ingest_v0(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    info!("Received {} bytes", body.len());

    if body.is_empty() {
        warn!("Upload body is empty");
        for (name, value) in &headers {
            debug!("{:>20}: {:?}", name, value);
        }
        return (StatusCode::OK, ACK.to_string());
    }

    let records = match decode_v0(&body) {
        Ok(records) => records,
        Err(e) => {
            warn!("Rejected upload: {}", e);
            return (StatusCode::BAD_REQUEST, format!("{}\n", e));
        }
    };

    let count = records.len();
    let writer = state.writer.clone();

    // Blocking file I/O stays off the async workers.
    match tokio::task::spawn_blocking(move || writer.append(&records)).await {
        Ok(Ok(Some(path))) => {
            info!("Stored {} samples in {}", count, path.display());
            (StatusCode::OK, ACK.to_string())
        }
        Ok(Ok(None)) => {
            info!("Upload carried no samples");
            (StatusCode::OK, ACK.to_string())
        }
        Ok(Err(e)) => {
            error!("Error writing samples to file: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "write failed\n".to_string())
        }
        Err(e) => {
            error!("Sample writer task failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "write failed\n".to_string())
        }
    }
}
