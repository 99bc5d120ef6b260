use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::error;

use crate::workflows::run_blocking;

use super::ingest::IngestError;
use super::report::{ranking_csv, ranking_rows};
use super::service::{ScreeningError, ScreeningService};
use super::store::ClassificationStoreError;

/// Multipart field carrying the uploaded résumé.
pub const UPLOAD_FIELD: &str = "cv_file";

/// Router exposing upload, classification, and ranking endpoints.
pub fn screening_router(service: Arc<ScreeningService>) -> Router {
    Router::new()
        .route("/api/v1/areas", get(areas_handler))
        .route(
            "/api/v1/resumes",
            post(upload_handler).get(classifications_handler),
        )
        .route("/api/v1/resumes/:filename", get(classification_handler))
        .route("/api/v1/rankings", get(ranking_handler))
        .route("/api/v1/rankings/rows", get(ranking_rows_handler))
        .route("/api/v1/rankings/export.csv", get(ranking_csv_handler))
        .route("/api/v1/rankings/export", post(export_handler))
        .with_state(service)
}

pub(crate) async fn areas_handler(State(service): State<Arc<ScreeningService>>) -> Response {
    (StatusCode::OK, Json(json!({ "areas": service.rules().areas() }))).into_response()
}

pub(crate) async fn upload_handler(
    State(service): State<Arc<ScreeningService>>,
    mut multipart: Multipart,
) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return bad_request(&format!("invalid multipart payload: {err}")),
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        match field.bytes().await {
            Ok(bytes) => upload = Some((filename, bytes.to_vec())),
            Err(err) => return bad_request(&format!("failed to read upload: {err}")),
        }
    }

    let Some((filename, bytes)) = upload else {
        return bad_request("no file was provided");
    };
    if filename.trim().is_empty() {
        return bad_request("no file was selected");
    }

    match run_blocking(move || service.ingest_upload(&filename, &bytes)).await {
        Ok(Ok(classified)) => (
            StatusCode::OK,
            Json(json!({
                "message": "résumé uploaded and classified",
                "filename": classified.filename,
                "areas": classified.areas,
            })),
        )
            .into_response(),
        Ok(Err(err)) => screening_error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn classifications_handler(
    State(service): State<Arc<ScreeningService>>,
) -> Response {
    match run_blocking(move || service.classifications()).await {
        Ok(Ok(map)) => (StatusCode::OK, Json(map)).into_response(),
        Ok(Err(err)) => screening_error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn classification_handler(
    State(service): State<Arc<ScreeningService>>,
    Path(filename): Path<String>,
) -> Response {
    let lookup = filename.clone();
    match run_blocking(move || service.classification(&lookup)).await {
        Ok(Ok(areas)) => (
            StatusCode::OK,
            Json(json!({ "filename": filename, "areas": areas })),
        )
            .into_response(),
        Ok(Err(err)) => screening_error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn ranking_handler(State(service): State<Arc<ScreeningService>>) -> Response {
    match run_blocking(move || service.ranking()).await {
        Ok(Ok(ranking)) => (StatusCode::OK, Json(ranking)).into_response(),
        Ok(Err(err)) => screening_error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn ranking_rows_handler(
    State(service): State<Arc<ScreeningService>>,
) -> Response {
    match run_blocking(move || service.ranking()).await {
        Ok(Ok(ranking)) => (StatusCode::OK, Json(ranking_rows(&ranking))).into_response(),
        Ok(Err(err)) => screening_error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn ranking_csv_handler(
    State(service): State<Arc<ScreeningService>>,
) -> Response {
    let csv = run_blocking(move || {
        service
            .ranking()
            .and_then(|ranking| ranking_csv(&ranking).map_err(ScreeningError::from))
    })
    .await;
    match csv {
        Ok(Ok(body)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"mejores_candidatos.csv\"",
                ),
            ],
            body,
        )
            .into_response(),
        Ok(Err(err)) => screening_error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn export_handler(State(service): State<Arc<ScreeningService>>) -> Response {
    let worker = Arc::clone(&service);
    match run_blocking(move || worker.export_ranking()).await {
        Ok(Ok(ranking)) => (
            StatusCode::OK,
            Json(json!({
                "message": "ranking exported",
                "json": service.paths().ranking_json.display().to_string(),
                "csv": service.paths().ranking_csv.display().to_string(),
                "ranking": ranking,
            })),
        )
            .into_response(),
        Ok(Err(err)) => screening_error_response(err),
        Err(response) => response,
    }
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

pub(crate) fn screening_error_response(err: ScreeningError) -> Response {
    let status = match &err {
        ScreeningError::InvalidFilename => StatusCode::BAD_REQUEST,
        ScreeningError::Extraction(inner) if inner.is_unsupported() => {
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        }
        ScreeningError::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScreeningError::Store(ClassificationStoreError::NotFound(_)) => StatusCode::NOT_FOUND,
        ScreeningError::Ingest(IngestError::MissingFolder(_) | IngestError::EmptyFolder(_)) => {
            StatusCode::NOT_FOUND
        }
        ScreeningError::Ingest(_)
        | ScreeningError::Store(_)
        | ScreeningError::Storage(_)
        | ScreeningError::Export(_) => {
            error!(error = %err, "screening request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
