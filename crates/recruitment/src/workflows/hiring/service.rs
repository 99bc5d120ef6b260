use chrono::{DateTime, Utc};
use tracing::{error, info};

use super::domain::{
    required, Opening, OpeningDraft, OpeningSelection, OpeningState, OpeningUpdate,
    SelectionRecord, ValidationError,
};
use super::repository::{OpeningRegistry, RepositoryError, SelectionHistory};

/// Opening lifecycle and final-candidate selection.
#[derive(Clone)]
pub struct HiringService {
    openings: OpeningRegistry,
    history: SelectionHistory,
}

impl HiringService {
    pub fn new(openings: OpeningRegistry, history: SelectionHistory) -> Self {
        Self { openings, history }
    }

    /// Publish a new opening in the `abierto` state.
    pub fn create_opening(&self, draft: OpeningDraft) -> Result<Opening, HiringError> {
        let opening = draft.into_opening()?;
        let stored = self.openings.insert(opening)?;
        info!(opening = %stored.name, area = %stored.area, "opening published");
        Ok(stored)
    }

    /// Edit descriptive fields. Closed openings remain editable; their state and
    /// selection never change here.
    pub fn update_opening(
        &self,
        name: &str,
        update: OpeningUpdate,
    ) -> Result<Opening, HiringError> {
        self.openings.modify(name, |opening| {
            update.apply(opening)?;
            Ok::<_, HiringError>(opening.clone())
        })
    }

    pub fn delete_opening(&self, name: &str) -> Result<Opening, HiringError> {
        let removed = self.openings.remove(name)?;
        info!(opening = %removed.name, "opening deleted");
        Ok(removed)
    }

    pub fn opening(&self, name: &str) -> Result<Opening, HiringError> {
        self.openings
            .fetch(name)?
            .ok_or_else(|| HiringError::NotFound(name.to_string()))
    }

    pub fn openings(&self) -> Result<Vec<Opening>, HiringError> {
        Ok(self.openings.all()?)
    }

    pub fn open_openings(&self) -> Result<Vec<Opening>, HiringError> {
        let mut openings = self.openings.all()?;
        openings.retain(Opening::is_open);
        Ok(openings)
    }

    pub fn selections(&self) -> Result<Vec<SelectionRecord>, HiringError> {
        Ok(self.history.all()?)
    }

    /// Close `name` with `candidate` as the final selection and append to the history.
    pub fn select_final(&self, name: &str, candidate: &str) -> Result<Opening, HiringError> {
        self.select_final_at(name, candidate, Utc::now())
    }

    /// Same as [`HiringService::select_final`] with an explicit timestamp.
    ///
    /// An unknown opening is reported before the candidate is validated. The opening is
    /// closed before the history entry is written. If that append fails the opening stays
    /// closed and [`HiringError::PartialSelection`] is returned.
    pub fn select_final_at(
        &self,
        name: &str,
        candidate: &str,
        at: DateTime<Utc>,
    ) -> Result<Opening, HiringError> {
        let (closed, candidate) = self.openings.modify(name, |opening| {
            let chosen = required("candidato", candidate)?;
            if opening.state == OpeningState::Closed {
                return Err(HiringError::InvalidState {
                    opening: opening.name.clone(),
                    state: opening.state,
                });
            }
            opening.state = OpeningState::Closed;
            opening.selection = Some(OpeningSelection {
                candidate: chosen.clone(),
                selected_at: at,
            });
            Ok::<_, HiringError>((opening.clone(), chosen))
        })?;

        let record = SelectionRecord {
            opening: closed.name.clone(),
            candidate: candidate.clone(),
            at,
        };
        if let Err(source) = self.history.append(record) {
            error!(
                opening = %closed.name,
                %candidate,
                error = %source,
                "opening closed but selection history was not written"
            );
            return Err(HiringError::PartialSelection {
                opening: closed.name,
                candidate,
                source,
            });
        }

        info!(opening = %closed.name, %candidate, "final candidate selected");
        Ok(closed)
    }
}

/// Error raised by the hiring service.
#[derive(Debug, thiserror::Error)]
pub enum HiringError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("opening '{0}' already exists")]
    DuplicateName(String),
    #[error("opening '{0}' not found")]
    NotFound(String),
    #[error("opening '{opening}' is {} and cannot take a selection", .state.label())]
    InvalidState { opening: String, state: OpeningState },
    #[error("opening '{opening}' was closed for '{candidate}' but the history append failed: {source}")]
    PartialSelection {
        opening: String,
        candidate: String,
        source: RepositoryError,
    },
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for HiringError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(name) => Self::DuplicateName(name),
            RepositoryError::NotFound(name) => Self::NotFound(name),
            other => Self::Repository(other),
        }
    }
}
