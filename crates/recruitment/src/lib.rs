//! Résumé screening and hiring workflows.
//!
//! The crate is split into the screening pipeline (extraction, classification, ranking) and
//! the hiring workflow (openings, final selection, interviews). Both persist through the
//! [`storage::DocumentStore`] abstraction so file-backed and in-memory backends are
//! interchangeable.

pub mod config;
pub mod error;
pub mod storage;
pub mod telemetry;
pub mod workflows;
