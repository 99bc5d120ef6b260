use std::sync::Arc;

use super::common::*;
use crate::workflows::hiring::domain::{OpeningState, OpeningUpdate, ValidationError};
use crate::workflows::hiring::repository::{OpeningRegistry, SelectionHistory};
use crate::workflows::hiring::{HiringError, HiringService};

#[test]
fn create_trims_name_and_starts_open() {
    let fixture = fixture();

    let opening = fixture
        .hiring
        .create_opening(draft("  Backend Developer ", "Engineering"))
        .expect("created");

    assert_eq!(opening.name, "Backend Developer");
    assert_eq!(opening.state, OpeningState::Open);
    assert!(opening.selection.is_none());
    assert_eq!(stored_openings(&fixture), vec![opening]);
}

#[test]
fn duplicate_name_is_rejected_and_stored_once() {
    let fixture = fixture();
    fixture
        .hiring
        .create_opening(draft("Backend Developer", "Engineering"))
        .expect("first create");

    match fixture
        .hiring
        .create_opening(draft("Backend Developer", "Sales"))
    {
        Err(HiringError::DuplicateName(name)) => assert_eq!(name, "Backend Developer"),
        other => panic!("expected duplicate name, got {other:?}"),
    }

    let stored = stored_openings(&fixture);
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].area, "Engineering");
}

#[test]
fn create_requires_area() {
    let fixture = fixture();

    let err = fixture
        .hiring
        .create_opening(draft("Backend Developer", " "))
        .expect_err("area missing");

    assert!(matches!(
        err,
        HiringError::Validation(ValidationError::MissingField("area_puesto"))
    ));
    assert!(stored_openings(&fixture).is_empty());
}

#[test]
fn update_changes_only_supplied_fields() {
    let fixture = fixture();
    fixture
        .hiring
        .create_opening(draft("Backend Developer", "Engineering"))
        .expect("created");

    let updated = fixture
        .hiring
        .update_opening(
            "Backend Developer",
            OpeningUpdate {
                skills: Some("Rust, Tokio".to_string()),
                ..OpeningUpdate::default()
            },
        )
        .expect("updated");

    assert_eq!(updated.skills, "Rust, Tokio");
    assert_eq!(updated.experience, "3 años");
    assert_eq!(stored_openings(&fixture)[0].skills, "Rust, Tokio");
}

#[test]
fn update_unknown_opening_is_not_found() {
    let fixture = fixture();

    let err = fixture
        .hiring
        .update_opening("Ghost", OpeningUpdate::default())
        .expect_err("missing");

    assert!(matches!(err, HiringError::NotFound(name) if name == "Ghost"));
}

#[test]
fn invalid_update_writes_nothing() {
    let fixture = fixture();
    fixture
        .hiring
        .create_opening(draft("Backend Developer", "Engineering"))
        .expect("created");

    let err = fixture
        .hiring
        .update_opening(
            "Backend Developer",
            OpeningUpdate {
                area: Some(String::new()),
                skills: Some("changed".to_string()),
                ..OpeningUpdate::default()
            },
        )
        .expect_err("empty area");

    assert!(matches!(err, HiringError::Validation(_)));
    assert_eq!(stored_openings(&fixture)[0].skills, "Python, Rust");
}

#[test]
fn delete_removes_closed_openings_too() {
    let fixture = fixture();
    fixture
        .hiring
        .create_opening(draft("Backend Developer", "Engineering"))
        .expect("created");
    fixture
        .hiring
        .select_final("Backend Developer", "b.pdf")
        .expect("selected");

    fixture
        .hiring
        .delete_opening("Backend Developer")
        .expect("deleted");

    assert!(stored_openings(&fixture).is_empty());
    assert!(matches!(
        fixture.hiring.delete_opening("Backend Developer"),
        Err(HiringError::NotFound(_))
    ));
}

#[test]
fn open_listing_excludes_closed_openings() {
    let fixture = fixture();
    for name in ["Backend Developer", "Account Executive", "Data Analyst"] {
        fixture
            .hiring
            .create_opening(draft(name, "Engineering"))
            .expect("created");
    }
    fixture
        .hiring
        .select_final("Account Executive", "b.pdf")
        .expect("selected");

    let open: Vec<String> = fixture
        .hiring
        .open_openings()
        .expect("open list")
        .into_iter()
        .map(|opening| opening.name)
        .collect();

    assert_eq!(open, vec!["Backend Developer", "Data Analyst"]);
    assert_eq!(fixture.hiring.openings().expect("all").len(), 3);
}

#[test]
fn storage_failures_surface_as_repository_errors() {
    let service = HiringService::new(
        OpeningRegistry::new(Arc::new(OfflineStore)),
        SelectionHistory::new(Arc::new(OfflineStore)),
    );

    let err = service
        .create_opening(draft("Backend Developer", "Engineering"))
        .expect_err("offline");

    assert!(matches!(err, HiringError::Repository(_)));
}
