use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use super::common::*;
use crate::workflows::hiring::repository::{OpeningRegistry, SelectionHistory};
use crate::workflows::hiring::router::{opening_handler, HiringState};
use crate::workflows::hiring::HiringService;

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn opening_body(name: &str, area: &str) -> Value {
    json!({
        "nombre_puesto": name,
        "area_puesto": area,
        "formacion_academica": "Ingeniería",
        "experiencia_laboral": "2 años",
        "habilidades": "Python",
        "certificaciones": ""
    })
}

#[tokio::test]
async fn create_route_returns_created_then_conflict() {
    let dir = tempfile::tempdir().expect("temp dir");
    let fixture = fixture();
    let router = router_with(&fixture, dir.path());

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/openings",
            opening_body("Backend Developer", "Engineering"),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["estado"], "abierto");

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/openings",
            opening_body("Backend Developer", "Sales"),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(stored_openings(&fixture).len(), 1);
}

#[tokio::test]
async fn create_route_rejects_blank_name() {
    let dir = tempfile::tempdir().expect("temp dir");
    let fixture = fixture();
    let router = router_with(&fixture, dir.path());

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/openings",
            opening_body("", "Engineering"),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn update_route_rejects_renaming() {
    let dir = tempfile::tempdir().expect("temp dir");
    let fixture = fixture();
    fixture
        .hiring
        .create_opening(draft("Backend Developer", "Engineering"))
        .expect("created");
    let router = router_with(&fixture, dir.path());

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/v1/openings/Backend%20Developer",
            json!({ "nombre_puesto": "Frontend Developer" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(stored_openings(&fixture)[0].name, "Backend Developer");
}

#[tokio::test]
async fn candidates_route_returns_the_area_bucket() {
    let dir = tempfile::tempdir().expect("temp dir");
    let fixture = fixture();
    fixture
        .hiring
        .create_opening(draft("Backend Developer", "Engineering"))
        .expect("created");
    let router = router_with(&fixture, dir.path());

    let response = router
        .oneshot(empty_request(
            "GET",
            "/api/v1/openings/Backend%20Developer/candidates",
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["puesto"]["nombre_puesto"], "Backend Developer");
    assert_eq!(
        payload["candidatos"],
        json!([
            { "area": "Engineering", "cv": "b.pdf", "puntaje": 2 },
            { "area": "Engineering", "cv": "a.pdf", "puntaje": 1 }
        ])
    );
}

#[tokio::test]
async fn selection_route_closes_once_then_conflicts() {
    let dir = tempfile::tempdir().expect("temp dir");
    let fixture = fixture();
    fixture
        .hiring
        .create_opening(draft("Backend Developer", "Engineering"))
        .expect("created");
    let router = router_with(&fixture, dir.path());

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/openings/Backend%20Developer/selection",
            json!({ "candidato": "b.pdf" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["estado"], "cerrado");
    assert_eq!(payload["seleccionado"]["candidato"], "b.pdf");

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/openings/Backend%20Developer/selection",
            json!({ "candidato": "a.pdf" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = router
        .oneshot(empty_request("GET", "/api/v1/selections"))
        .await
        .expect("route executes");
    let history = read_json_body(response).await;
    assert_eq!(history.as_array().map(Vec::len), Some(1));
    assert_eq!(history[0]["puesto"], "Backend Developer");
}

#[tokio::test]
async fn selection_route_on_unknown_opening_is_not_found() {
    let dir = tempfile::tempdir().expect("temp dir");
    let fixture = fixture();
    let router = router_with(&fixture, dir.path());

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/v1/openings/Ghost/selection",
            json!({ "candidato": "b.pdf" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(stored_history(&fixture).is_empty());
}

#[tokio::test]
async fn interview_routes_cover_the_lifecycle() {
    let dir = tempfile::tempdir().expect("temp dir");
    let fixture = fixture();
    fixture
        .hiring
        .create_opening(draft("Backend Developer", "Engineering"))
        .expect("created");
    let router = router_with(&fixture, dir.path());

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/interviews",
            json!({
                "puesto": "Backend Developer",
                "candidato": "b.pdf",
                "fecha_hora": "2025-10-06T14:30",
                "tipo": "técnica",
                "medio": "presencial"
            }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json_body(response).await;
    let id = created["id"].as_str().expect("id").to_string();
    assert_eq!(created["estado"], "programada");

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/interviews/{id}"),
            json!({ "estado": "realizada", "notas": "Strong systems design" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/interviews/{id}"),
            json!({ "estado": "programada" }),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = router
        .clone()
        .oneshot(empty_request(
            "GET",
            "/api/v1/interviews?candidate=b.pdf&state=realizada",
        ))
        .await
        .expect("route executes");
    let listed = read_json_body(response).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
    assert_eq!(listed[0]["notas"], "Strong systems design");

    let response = router
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/v1/interviews/{id}")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router
        .oneshot(empty_request("GET", &format!("/api/v1/interviews/{id}")))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn interview_route_rejects_identity_changes() {
    let dir = tempfile::tempdir().expect("temp dir");
    let fixture = fixture();
    fixture
        .hiring
        .create_opening(draft("Backend Developer", "Engineering"))
        .expect("created");
    let record = fixture
        .interviews
        .create(interview_draft("Backend Developer", "b.pdf", "2025-10-06T14:30"))
        .expect("created");
    let router = router_with(&fixture, dir.path());

    let response = router
        .oneshot(json_request(
            "PUT",
            &format!("/api/v1/interviews/{}", record.id),
            json!({ "candidato": "someone-else.pdf" }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn opening_handler_maps_storage_failures_to_internal_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let registry = OpeningRegistry::new(Arc::new(OfflineStore));
    let fixture = fixture();
    let state = HiringState {
        hiring: Arc::new(HiringService::new(
            registry,
            SelectionHistory::new(Arc::new(OfflineStore)),
        )),
        interviews: Arc::new(fixture.interviews.clone()),
        screening: Arc::new(screening_service(dir.path(), sample_classifications())),
    };

    let response = opening_handler(State(state), Path("Backend Developer".to_string())).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
