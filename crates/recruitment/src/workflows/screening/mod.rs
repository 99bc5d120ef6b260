//! Résumé screening pipeline: text extraction, keyword classification, the persisted
//! classification map, and per-area candidate ranking.

pub mod classifier;
pub mod extractor;
pub mod ingest;
pub mod normalizer;
pub mod ranking;
pub mod report;
pub mod router;
pub mod rules;
pub mod service;
pub mod store;

pub use classifier::{classify, UNCLASSIFIED};
pub use extractor::{extract_text, DocumentFormat, ExtractionError};
pub use ingest::{
    ingest_folder, FolderIngest, IngestError, ResumeRecord, SkipReason, SkippedDocument,
};
pub use normalizer::normalize_text;
pub use ranking::{candidate_score, rank, AreaRanking, Ranking, RankingEntry};
pub use report::{export_ranking, ranking_csv, ranking_rows, RankingExportError};
pub use router::screening_router;
pub use rules::{AreaRule, AreaRuleSet, RuleSetError};
pub use service::{
    sanitize_filename, ClassifiedResume, FolderClassification, ScreeningError, ScreeningPaths,
    ScreeningService,
};
pub use store::{
    ClassificationEntry, ClassificationMap, ClassificationStore, ClassificationStoreError,
};
