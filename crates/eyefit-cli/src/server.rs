//! HTTP measurement service.
//!
//! `POST /api/measure` takes `{"image": "<base64>"}` and answers with the
//! measurement or `{"error": "<message>"}`.

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Result;
use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use eyefit_adapters::{decode_image_payload, PayloadError};
use eyefit_core::FrameMeasurer;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

/// Shared measurer; requests are measured one at a time.
#[derive(Clone)]
struct AppState {
    measurer: Arc<Mutex<Box<dyn FrameMeasurer>>>,
}

/// Builds the service router around one measurer.
pub fn router(measurer: Box<dyn FrameMeasurer>, max_body_bytes: usize) -> Router {
    let state = AppState {
        measurer: Arc::new(Mutex::new(measurer)),
    };

    Router::new()
        .route("/api/measure", post(measure))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves `app` until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the server fails.
pub async fn serve(listener: TcpListener, app: Router) -> Result<()> {
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {e}");
    }
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

async fn measure(State(state): State<AppState>, body: Bytes) -> Response {
    let request: Value = match serde_json::from_slice(&body) {
        Ok(value) => value,
        Err(e) => {
            debug!("Rejected malformed JSON: {e}");
            return error_response(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {e}"));
        }
    };

    let Some(image) = request.get("image") else {
        return error_response(StatusCode::BAD_REQUEST, PayloadError::Missing.to_string());
    };
    let Some(image) = image.as_str() else {
        return error_response(StatusCode::BAD_REQUEST, PayloadError::Undecodable.to_string());
    };

    let frame = match decode_image_payload(image) {
        Ok(frame) => frame,
        Err(e) => return error_response(StatusCode::BAD_REQUEST, e.to_string()),
    };
    debug!("Decoded {}x{} frame", frame.width(), frame.height());

    let measurer = Arc::clone(&state.measurer);
    let result = tokio::task::spawn_blocking(move || {
        measurer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .measure(&frame)
    })
    .await;

    match result {
        Ok(Ok(measurement)) => (StatusCode::OK, Json(measurement)).into_response(),
        Ok(Err(e)) if e.is_detection_failure() => {
            debug!("No measurement: {e}");
            error_response(StatusCode::BAD_REQUEST, e.to_string())
        }
        Ok(Err(e)) => {
            error!("{e:#}");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => {
            error!("Measurement task failed: {e}");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Measurement task failed.",
            )
        }
    }
}
