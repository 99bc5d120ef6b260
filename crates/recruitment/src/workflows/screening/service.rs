use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::storage::{write_atomically, StorageError};

use super::classifier::classify;
use super::extractor::{extract_bytes, DocumentFormat, ExtractionError};
use super::ingest::{ingest_folder, IngestError, ResumeRecord, SkippedDocument};
use super::ranking::{rank, Ranking};
use super::report::{export_ranking, RankingExportError};
use super::rules::AreaRuleSet;
use super::store::{ClassificationMap, ClassificationStore, ClassificationStoreError};

/// Filesystem locations the screening service writes to.
#[derive(Debug, Clone)]
pub struct ScreeningPaths {
    pub upload_dir: PathBuf,
    pub ranking_json: PathBuf,
    pub ranking_csv: PathBuf,
}

/// Result of classifying one résumé.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedResume {
    pub filename: String,
    pub areas: Vec<String>,
}

/// Result of a batch folder run.
#[derive(Debug, Default, Serialize)]
pub struct FolderClassification {
    pub classified: Vec<ClassifiedResume>,
    pub skipped: Vec<SkippedDocument>,
}

#[derive(Debug, thiserror::Error)]
pub enum ScreeningError {
    #[error("upload is missing a usable file name")]
    InvalidFilename,
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Ingest(#[from] IngestError),
    #[error(transparent)]
    Store(#[from] ClassificationStoreError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Export(#[from] RankingExportError),
}

/// Extraction, classification, and ranking over a fixed rule set.
pub struct ScreeningService {
    rules: Arc<AreaRuleSet>,
    store: ClassificationStore,
    paths: ScreeningPaths,
}

impl ScreeningService {
    pub fn new(rules: Arc<AreaRuleSet>, store: ClassificationStore, paths: ScreeningPaths) -> Self {
        Self {
            rules,
            store,
            paths,
        }
    }

    pub fn rules(&self) -> &AreaRuleSet {
        &self.rules
    }

    pub fn classify_record(&self, record: &ResumeRecord) -> Vec<String> {
        classify(&record.normalized_text, &self.rules)
    }

    /// Stores an uploaded résumé, classifies it, and upserts the classification.
    ///
    /// The format is checked before anything is written to the upload folder.
    pub fn ingest_upload(
        &self,
        original_name: &str,
        bytes: &[u8],
    ) -> Result<ClassifiedResume, ScreeningError> {
        let filename = sanitize_filename(original_name).ok_or(ScreeningError::InvalidFilename)?;
        let format = DocumentFormat::detect(Path::new(&filename)).ok_or_else(|| {
            ExtractionError::UnsupportedFormat {
                filename: filename.clone(),
            }
        })?;

        write_atomically(&self.paths.upload_dir.join(&filename), bytes)?;

        let record = ResumeRecord::new(filename, extract_bytes(format, bytes)?);
        let areas = self.classify_record(&record);
        let stored = self.store.upsert(&record.filename, areas)?;

        info!(
            filename = %record.filename,
            format = format.label(),
            areas = ?stored,
            "résumé uploaded and classified"
        );

        Ok(ClassifiedResume {
            filename: record.filename,
            areas: stored,
        })
    }

    /// Classifies every supported document in `dir` and upserts all results at once.
    pub fn ingest_folder(&self, dir: &Path) -> Result<FolderClassification, ScreeningError> {
        let batch = ingest_folder(dir)?;

        let classified: Vec<ClassifiedResume> = batch
            .records
            .iter()
            .map(|record| ClassifiedResume {
                filename: record.filename.clone(),
                areas: self.classify_record(record),
            })
            .collect();

        let written = self.store.upsert_many(
            classified
                .iter()
                .map(|resume| (resume.filename.clone(), resume.areas.clone())),
        )?;

        info!(
            folder = %dir.display(),
            classified = written,
            skipped = batch.skipped.len(),
            "résumé folder classified"
        );

        Ok(FolderClassification {
            classified,
            skipped: batch.skipped,
        })
    }

    pub fn classifications(&self) -> Result<ClassificationMap, ScreeningError> {
        Ok(self.store.get_all()?)
    }

    pub fn classification(&self, filename: &str) -> Result<Vec<String>, ScreeningError> {
        Ok(self.store.get(filename)?)
    }

    pub fn ranking(&self) -> Result<Ranking, ScreeningError> {
        let classifications = self.store.get_all()?;
        Ok(rank(&classifications, &self.rules.names()))
    }

    /// Recomputes the ranking and writes the JSON and csv reports.
    pub fn export_ranking(&self) -> Result<Ranking, ScreeningError> {
        let ranking = self.ranking()?;
        export_ranking(&ranking, &self.paths.ranking_json, &self.paths.ranking_csv)?;
        Ok(ranking)
    }

    pub fn paths(&self) -> &ScreeningPaths {
        &self.paths
    }
}

/// Reduces an uploaded name to a safe single path component.
///
/// Directory parts are dropped, whitespace becomes `_`, and anything outside
/// `[A-Za-z0-9._-]` is removed. Returns `None` when nothing usable remains.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .filter_map(|ch| match ch {
            c if c.is_whitespace() => Some('_'),
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            _ => None,
        })
        .collect();
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
