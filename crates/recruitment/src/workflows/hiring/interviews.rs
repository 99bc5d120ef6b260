use chrono::Utc;
use tracing::info;

use super::domain::{
    required, InterviewDraft, InterviewFilter, InterviewId, InterviewRecord, InterviewState,
    InterviewUpdate, ValidationError,
};
use super::repository::{InterviewLog, OpeningRegistry, RepositoryError};

/// Interview scheduling linked to registered openings.
#[derive(Clone)]
pub struct InterviewService {
    log: InterviewLog,
    openings: OpeningRegistry,
}

impl InterviewService {
    pub fn new(log: InterviewLog, openings: OpeningRegistry) -> Self {
        Self { log, openings }
    }

    /// Schedule an interview for an existing opening.
    pub fn create(&self, draft: InterviewDraft) -> Result<InterviewRecord, InterviewError> {
        let opening = required("puesto", &draft.opening)?;
        let candidate = required("candidato", &draft.candidate)?;
        let datetime = required("fecha_hora", &draft.datetime)?;
        let kind = required("tipo", &draft.kind)?;
        let medium = required("medio", &draft.medium)?;

        if self.openings.fetch(&opening)?.is_none() {
            return Err(InterviewError::UnknownOpening(opening));
        }

        let now = Utc::now();
        let record = InterviewRecord {
            id: InterviewId::generate(),
            opening,
            candidate,
            datetime,
            kind,
            medium,
            notes: draft.notes.trim().to_string(),
            state: draft.state,
            created_at: now,
            updated_at: now,
        };

        let stored = self.log.insert(record)?;
        info!(
            interview = %stored.id,
            opening = %stored.opening,
            candidate = %stored.candidate,
            "interview scheduled"
        );
        Ok(stored)
    }

    /// Interviews matching `filter`, earliest first. Unparsable dates sort first and ties
    /// keep their stored order.
    pub fn list(&self, filter: &InterviewFilter) -> Result<Vec<InterviewRecord>, InterviewError> {
        let mut records: Vec<InterviewRecord> = self
            .log
            .all()?
            .into_iter()
            .filter(|record| filter.matches(record))
            .collect();
        records.sort_by_key(InterviewRecord::scheduled_at);
        Ok(records)
    }

    pub fn get(&self, id: InterviewId) -> Result<InterviewRecord, InterviewError> {
        self.log.fetch(id)?.ok_or(InterviewError::NotFound(id))
    }

    /// Edit mutable fields. Completed, cancelled, and no-show interviews keep their state.
    pub fn update(
        &self,
        id: InterviewId,
        update: InterviewUpdate,
    ) -> Result<InterviewRecord, InterviewError> {
        self.log.modify(id, |record| {
            if let Some(state) = update.state {
                if record.state.is_terminal() && state != record.state {
                    return Err(InterviewError::InvalidState {
                        id,
                        from: record.state,
                        to: state,
                    });
                }
            }
            if let Some(datetime) = update.datetime {
                record.datetime = required("fecha_hora", &datetime)?;
            }
            if let Some(kind) = update.kind {
                record.kind = required("tipo", &kind)?;
            }
            if let Some(medium) = update.medium {
                record.medium = required("medio", &medium)?;
            }
            if let Some(notes) = update.notes {
                record.notes = notes.trim().to_string();
            }
            if let Some(state) = update.state {
                record.state = state;
            }
            record.updated_at = Utc::now();
            Ok::<_, InterviewError>(record.clone())
        })
    }

    pub fn delete(&self, id: InterviewId) -> Result<InterviewRecord, InterviewError> {
        let removed = self.log.remove(id)?;
        info!(interview = %removed.id, "interview deleted");
        Ok(removed)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InterviewError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("opening '{0}' does not exist")]
    UnknownOpening(String),
    #[error("interview {0} not found")]
    NotFound(InterviewId),
    #[error("interview {id} is {} and cannot move to {}", .from.label(), .to.label())]
    InvalidState {
        id: InterviewId,
        from: InterviewState,
        to: InterviewState,
    },
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for InterviewError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(raw) => match InterviewId::parse(&raw) {
                Some(id) => Self::NotFound(id),
                None => Self::Repository(RepositoryError::NotFound(raw)),
            },
            other => Self::Repository(other),
        }
    }
}
