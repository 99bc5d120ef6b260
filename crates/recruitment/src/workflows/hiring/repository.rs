use std::sync::Arc;

use crate::storage::{DocumentStore, StorageError};

use super::domain::{InterviewId, InterviewRecord, Opening, SelectionRecord};

/// Error enumeration for registry failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("'{0}' already exists")]
    Conflict(String),
    #[error("'{0}' not found")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Opening registry over a whole-document store (`puestos.json`).
#[derive(Clone)]
pub struct OpeningRegistry {
    documents: Arc<dyn DocumentStore<Vec<Opening>>>,
}

impl OpeningRegistry {
    pub fn new(documents: Arc<dyn DocumentStore<Vec<Opening>>>) -> Self {
        Self { documents }
    }

    pub fn insert(&self, opening: Opening) -> Result<Opening, RepositoryError> {
        let mut openings = self.documents.load()?;
        if openings.iter().any(|existing| existing.name == opening.name) {
            return Err(RepositoryError::Conflict(opening.name));
        }
        openings.push(opening.clone());
        self.documents.save(&openings)?;
        Ok(opening)
    }

    /// Loads the document, lets `apply` mutate the named opening, and writes it back.
    ///
    /// Nothing is written when `apply` fails.
    pub fn modify<T, E, F>(&self, name: &str, apply: F) -> Result<T, E>
    where
        F: FnOnce(&mut Opening) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut openings = self.documents.load().map_err(RepositoryError::from)?;
        let opening = openings
            .iter_mut()
            .find(|opening| opening.name == name)
            .ok_or_else(|| RepositoryError::NotFound(name.to_string()))?;

        let outcome = apply(opening)?;
        self.documents
            .save(&openings)
            .map_err(RepositoryError::from)?;
        Ok(outcome)
    }

    pub fn remove(&self, name: &str) -> Result<Opening, RepositoryError> {
        let mut openings = self.documents.load()?;
        let index = openings
            .iter()
            .position(|opening| opening.name == name)
            .ok_or_else(|| RepositoryError::NotFound(name.to_string()))?;
        let removed = openings.remove(index);
        self.documents.save(&openings)?;
        Ok(removed)
    }

    pub fn fetch(&self, name: &str) -> Result<Option<Opening>, RepositoryError> {
        let openings = self.documents.load()?;
        Ok(openings.into_iter().find(|opening| opening.name == name))
    }

    pub fn all(&self) -> Result<Vec<Opening>, RepositoryError> {
        Ok(self.documents.load()?)
    }
}

/// Append-only selection log (`historial_selecciones.json`).
#[derive(Clone)]
pub struct SelectionHistory {
    documents: Arc<dyn DocumentStore<Vec<SelectionRecord>>>,
}

impl SelectionHistory {
    pub fn new(documents: Arc<dyn DocumentStore<Vec<SelectionRecord>>>) -> Self {
        Self { documents }
    }

    pub fn append(&self, record: SelectionRecord) -> Result<(), RepositoryError> {
        let mut history = self.documents.load()?;
        history.push(record);
        self.documents.save(&history)?;
        Ok(())
    }

    pub fn all(&self) -> Result<Vec<SelectionRecord>, RepositoryError> {
        Ok(self.documents.load()?)
    }
}

/// Interview log over a whole-document store (`entrevistas.json`).
#[derive(Clone)]
pub struct InterviewLog {
    documents: Arc<dyn DocumentStore<Vec<InterviewRecord>>>,
}

impl InterviewLog {
    pub fn new(documents: Arc<dyn DocumentStore<Vec<InterviewRecord>>>) -> Self {
        Self { documents }
    }

    pub fn insert(&self, record: InterviewRecord) -> Result<InterviewRecord, RepositoryError> {
        let mut records = self.documents.load()?;
        if records.iter().any(|existing| existing.id == record.id) {
            return Err(RepositoryError::Conflict(record.id.to_string()));
        }
        records.push(record.clone());
        self.documents.save(&records)?;
        Ok(record)
    }

    pub fn modify<T, E, F>(&self, id: InterviewId, apply: F) -> Result<T, E>
    where
        F: FnOnce(&mut InterviewRecord) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut records = self.documents.load().map_err(RepositoryError::from)?;
        let record = records
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        let outcome = apply(record)?;
        self.documents
            .save(&records)
            .map_err(RepositoryError::from)?;
        Ok(outcome)
    }

    pub fn remove(&self, id: InterviewId) -> Result<InterviewRecord, RepositoryError> {
        let mut records = self.documents.load()?;
        let index = records
            .iter()
            .position(|record| record.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;
        let removed = records.remove(index);
        self.documents.save(&records)?;
        Ok(removed)
    }

    pub fn fetch(&self, id: InterviewId) -> Result<Option<InterviewRecord>, RepositoryError> {
        let records = self.documents.load()?;
        Ok(records.into_iter().find(|record| record.id == id))
    }

    pub fn all(&self) -> Result<Vec<InterviewRecord>, RepositoryError> {
        Ok(self.documents.load()?)
    }
}
