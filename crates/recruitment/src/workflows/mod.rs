pub mod hiring;
pub mod screening;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Runs store-backed work on the blocking pool. A worker that panics becomes a 500.
pub(crate) async fn run_blocking<T, E, F>(task: F) -> Result<Result<T, E>, Response>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    tokio::task::spawn_blocking(task).await.map_err(|join_err| {
        error!(error = %join_err, "request worker failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "request processing failed" })),
        )
            .into_response()
    })
}
