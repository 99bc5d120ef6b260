//! Job openings, final-candidate selection, and interview scheduling.
//!
//! Openings move from `abierto` to `cerrado` exactly once, when a final candidate is
//! selected. Every selection is also appended to a separate history document.

pub mod domain;
pub mod interviews;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    parse_schedule, InterviewDraft, InterviewFilter, InterviewId, InterviewRecord,
    InterviewState, InterviewUpdate, Opening, OpeningDraft, OpeningSelection, OpeningState,
    OpeningUpdate, SelectionRecord, ValidationError,
};
pub use interviews::{InterviewError, InterviewService};
pub use repository::{InterviewLog, OpeningRegistry, RepositoryError, SelectionHistory};
pub use router::{hiring_router, HiringState, SelectionRequest};
pub use service::{HiringError, HiringService};
