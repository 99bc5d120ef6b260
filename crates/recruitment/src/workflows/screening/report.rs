use std::path::Path;

use crate::storage::{write_atomically, StorageError};

use super::ranking::{Ranking, RankingEntry};

const CSV_HEADERS: [&str; 3] = ["Area", "CV", "Puntaje"];

#[derive(Debug, thiserror::Error)]
pub enum RankingExportError {
    #[error("failed to encode ranking csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to encode ranking json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Tabular `Area, CV, Puntaje` report of an already sorted ranking.
pub fn ranking_csv(ranking: &Ranking) -> Result<Vec<u8>, RankingExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;
    for row in ranking.rows() {
        writer.write_record([
            row.area.as_str(),
            row.candidate.as_str(),
            row.score.to_string().as_str(),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|err| RankingExportError::Csv(err.into_error().into()))
}

/// Flat JSON rows mirroring the csv report line for line.
pub fn ranking_rows(ranking: &Ranking) -> Vec<RankingEntry> {
    ranking.rows().cloned().collect()
}

/// Writes the area-keyed JSON document and the csv report side by side.
pub fn export_ranking(
    ranking: &Ranking,
    json_path: &Path,
    csv_path: &Path,
) -> Result<(), RankingExportError> {
    let json = serde_json::to_vec_pretty(ranking)?;
    let csv = ranking_csv(ranking)?;

    write_atomically(json_path, &json)?;
    write_atomically(csv_path, &csv)?;

    tracing::info!(
        json = %json_path.display(),
        csv = %csv_path.display(),
        areas = ranking.buckets().len(),
        "ranking exported"
    );
    Ok(())
}
