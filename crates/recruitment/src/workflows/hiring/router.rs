use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use crate::workflows::run_blocking;
use crate::workflows::screening::router::screening_error_response;
use crate::workflows::screening::ScreeningService;

use super::domain::{
    InterviewDraft, InterviewFilter, InterviewId, InterviewUpdate, OpeningDraft, OpeningUpdate,
};
use super::interviews::{InterviewError, InterviewService};
use super::service::{HiringError, HiringService};

/// Shared handler state for the hiring endpoints.
#[derive(Clone)]
pub struct HiringState {
    pub hiring: Arc<HiringService>,
    pub interviews: Arc<InterviewService>,
    pub screening: Arc<ScreeningService>,
}

/// Router exposing opening, selection, and interview endpoints.
pub fn hiring_router(state: HiringState) -> Router {
    Router::new()
        .route(
            "/api/v1/openings",
            get(list_openings_handler).post(create_opening_handler),
        )
        .route("/api/v1/openings/open", get(open_openings_handler))
        .route(
            "/api/v1/openings/:name",
            get(opening_handler)
                .put(update_opening_handler)
                .delete(delete_opening_handler),
        )
        .route("/api/v1/openings/:name/candidates", get(candidates_handler))
        .route("/api/v1/openings/:name/selection", post(selection_handler))
        .route("/api/v1/selections", get(selections_handler))
        .route(
            "/api/v1/interviews",
            get(list_interviews_handler).post(create_interview_handler),
        )
        .route(
            "/api/v1/interviews/:id",
            get(interview_handler)
                .put(update_interview_handler)
                .delete(delete_interview_handler),
        )
        .with_state(state)
}

/// Body of a final-selection request.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectionRequest {
    #[serde(rename = "candidato", alias = "candidate")]
    pub candidate: String,
}

pub(crate) async fn list_openings_handler(State(state): State<HiringState>) -> Response {
    match run_blocking(move || state.hiring.openings()).await {
        Ok(Ok(openings)) => (StatusCode::OK, Json(openings)).into_response(),
        Ok(Err(err)) => hiring_error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn open_openings_handler(State(state): State<HiringState>) -> Response {
    match run_blocking(move || state.hiring.open_openings()).await {
        Ok(Ok(openings)) => (StatusCode::OK, Json(openings)).into_response(),
        Ok(Err(err)) => hiring_error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn create_opening_handler(
    State(state): State<HiringState>,
    Json(draft): Json<OpeningDraft>,
) -> Response {
    match run_blocking(move || state.hiring.create_opening(draft)).await {
        Ok(Ok(opening)) => (StatusCode::CREATED, Json(opening)).into_response(),
        Ok(Err(err)) => hiring_error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn opening_handler(
    State(state): State<HiringState>,
    Path(name): Path<String>,
) -> Response {
    match run_blocking(move || state.hiring.opening(&name)).await {
        Ok(Ok(opening)) => (StatusCode::OK, Json(opening)).into_response(),
        Ok(Err(err)) => hiring_error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn update_opening_handler(
    State(state): State<HiringState>,
    Path(name): Path<String>,
    Json(update): Json<OpeningUpdate>,
) -> Response {
    match run_blocking(move || state.hiring.update_opening(&name, update)).await {
        Ok(Ok(opening)) => (StatusCode::OK, Json(opening)).into_response(),
        Ok(Err(err)) => hiring_error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn delete_opening_handler(
    State(state): State<HiringState>,
    Path(name): Path<String>,
) -> Response {
    match run_blocking(move || state.hiring.delete_opening(&name)).await {
        Ok(Ok(_)) => StatusCode::NO_CONTENT.into_response(),
        Ok(Err(err)) => hiring_error_response(err),
        Err(response) => response,
    }
}

/// Ranking bucket for the opening's area. An area nobody matched yields an empty list.
pub(crate) async fn candidates_handler(
    State(state): State<HiringState>,
    Path(name): Path<String>,
) -> Response {
    let outcome = run_blocking(move || {
        let opening = state.hiring.opening(&name).map_err(hiring_error_response)?;
        let ranking = state
            .screening
            .ranking()
            .map_err(screening_error_response)?;
        Ok::<_, Response>((opening, ranking))
    })
    .await;

    let (opening, ranking) = match outcome {
        Ok(Ok(found)) => found,
        Ok(Err(response)) | Err(response) => return response,
    };
    let candidates = ranking
        .bucket(&opening.area)
        .map(|bucket| bucket.entries.clone())
        .unwrap_or_default();

    (
        StatusCode::OK,
        Json(json!({
            "puesto": opening,
            "candidatos": candidates,
        })),
    )
        .into_response()
}

pub(crate) async fn selection_handler(
    State(state): State<HiringState>,
    Path(name): Path<String>,
    Json(request): Json<SelectionRequest>,
) -> Response {
    match run_blocking(move || state.hiring.select_final(&name, &request.candidate)).await {
        Ok(Ok(opening)) => (StatusCode::OK, Json(opening)).into_response(),
        Ok(Err(err)) => hiring_error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn selections_handler(State(state): State<HiringState>) -> Response {
    match run_blocking(move || state.hiring.selections()).await {
        Ok(Ok(history)) => (StatusCode::OK, Json(history)).into_response(),
        Ok(Err(err)) => hiring_error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn list_interviews_handler(
    State(state): State<HiringState>,
    Query(filter): Query<InterviewFilter>,
) -> Response {
    match run_blocking(move || state.interviews.list(&filter)).await {
        Ok(Ok(records)) => (StatusCode::OK, Json(records)).into_response(),
        Ok(Err(err)) => interview_error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn create_interview_handler(
    State(state): State<HiringState>,
    Json(draft): Json<InterviewDraft>,
) -> Response {
    match run_blocking(move || state.interviews.create(draft)).await {
        Ok(Ok(record)) => (StatusCode::CREATED, Json(record)).into_response(),
        Ok(Err(err)) => interview_error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn interview_handler(
    State(state): State<HiringState>,
    Path(raw_id): Path<String>,
) -> Response {
    let Some(id) = InterviewId::parse(&raw_id) else {
        return unknown_interview(&raw_id);
    };
    match run_blocking(move || state.interviews.get(id)).await {
        Ok(Ok(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(Err(err)) => interview_error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn update_interview_handler(
    State(state): State<HiringState>,
    Path(raw_id): Path<String>,
    Json(update): Json<InterviewUpdate>,
) -> Response {
    let Some(id) = InterviewId::parse(&raw_id) else {
        return unknown_interview(&raw_id);
    };
    match run_blocking(move || state.interviews.update(id, update)).await {
        Ok(Ok(record)) => (StatusCode::OK, Json(record)).into_response(),
        Ok(Err(err)) => interview_error_response(err),
        Err(response) => response,
    }
}

pub(crate) async fn delete_interview_handler(
    State(state): State<HiringState>,
    Path(raw_id): Path<String>,
) -> Response {
    let Some(id) = InterviewId::parse(&raw_id) else {
        return unknown_interview(&raw_id);
    };
    match run_blocking(move || state.interviews.delete(id)).await {
        Ok(Ok(_)) => StatusCode::NO_CONTENT.into_response(),
        Ok(Err(err)) => interview_error_response(err),
        Err(response) => response,
    }
}

fn unknown_interview(raw_id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": format!("interview {raw_id} not found") })),
    )
        .into_response()
}

pub(crate) fn hiring_error_response(err: HiringError) -> Response {
    let status = match &err {
        HiringError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        HiringError::DuplicateName(_) | HiringError::InvalidState { .. } => StatusCode::CONFLICT,
        HiringError::NotFound(_) => StatusCode::NOT_FOUND,
        HiringError::PartialSelection { .. } | HiringError::Repository(_) => {
            error!(error = %err, "hiring request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

pub(crate) fn interview_error_response(err: InterviewError) -> Response {
    let status = match &err {
        InterviewError::Validation(_) | InterviewError::UnknownOpening(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        InterviewError::NotFound(_) => StatusCode::NOT_FOUND,
        InterviewError::InvalidState { .. } => StatusCode::CONFLICT,
        InterviewError::Repository(_) => {
            error!(error = %err, "interview request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
