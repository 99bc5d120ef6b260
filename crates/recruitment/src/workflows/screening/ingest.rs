use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use super::extractor::{extract_text, ExtractionError};
use super::normalizer::normalize_text;

/// Extracted résumé text keyed by its file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResumeRecord {
    pub filename: String,
    pub raw_text: String,
    pub normalized_text: String,
}

impl ResumeRecord {
    pub fn new(filename: impl Into<String>, raw_text: String) -> Self {
        let normalized_text = normalize_text(&raw_text);
        Self {
            filename: filename.into(),
            raw_text,
            normalized_text,
        }
    }
}

/// Why a document in the batch folder was left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum SkipReason {
    UnsupportedFormat,
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedDocument {
    pub filename: String,
    #[serde(flatten)]
    pub reason: SkipReason,
}

#[derive(Debug, Default, Serialize)]
pub struct FolderIngest {
    pub records: Vec<ResumeRecord>,
    pub skipped: Vec<SkippedDocument>,
}

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("résumé folder {0} does not exist")]
    MissingFolder(PathBuf),
    #[error("résumé folder {0} contains no documents")]
    EmptyFolder(PathBuf),
    #[error("failed to list {path}: {source}")]
    Listing {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Extracts every supported document in `dir`, in file-name order.
///
/// Unsupported formats and unreadable documents are skipped and reported; they never abort
/// the batch.
pub fn ingest_folder(dir: &Path) -> Result<FolderIngest, IngestError> {
    if !dir.is_dir() {
        return Err(IngestError::MissingFolder(dir.to_path_buf()));
    }

    let listing_err = |source| IngestError::Listing {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(listing_err)? {
        let entry = entry.map_err(listing_err)?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        return Err(IngestError::EmptyFolder(dir.to_path_buf()));
    }
    files.sort();

    let mut batch = FolderIngest::default();
    for path in files {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        match extract_text(&path) {
            Ok(raw_text) => {
                debug!(%filename, chars = raw_text.len(), "résumé extracted");
                batch.records.push(ResumeRecord::new(filename, raw_text));
            }
            Err(ExtractionError::UnsupportedFormat { .. }) => {
                debug!(%filename, "skipping unsupported document");
                batch.skipped.push(SkippedDocument {
                    filename,
                    reason: SkipReason::UnsupportedFormat,
                });
            }
            Err(err) => {
                warn!(%filename, error = %err, "skipping unreadable résumé");
                batch.skipped.push(SkippedDocument {
                    filename,
                    reason: SkipReason::Unreadable(err.to_string()),
                });
            }
        }
    }

    Ok(batch)
}
