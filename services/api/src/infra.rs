use metrics_exporter_prometheus::PrometheusHandle;
use recruitment::config::{AppConfig, StorageConfig};
use recruitment::error::AppError;
use recruitment::storage::JsonFileStore;
use recruitment::workflows::hiring::{
    HiringService, HiringState, InterviewLog, InterviewRecord, InterviewService, Opening,
    OpeningRegistry, SelectionHistory, SelectionRecord,
};
use recruitment::workflows::screening::{
    AreaRuleSet, ClassificationMap, ClassificationStore, ScreeningPaths, ScreeningService,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// File-backed services shared by the HTTP surface and the batch commands.
#[derive(Clone)]
pub(crate) struct Services {
    pub(crate) screening: Arc<ScreeningService>,
    pub(crate) hiring: Arc<HiringService>,
    pub(crate) interviews: Arc<InterviewService>,
}

impl Services {
    /// Loads the area rules and wires every store to its configured file.
    ///
    /// A missing or malformed rule set aborts startup.
    pub(crate) fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        let rules = AreaRuleSet::from_path(&config.storage.rules_path)?;
        info!(
            path = %config.storage.rules_path.display(),
            areas = rules.len(),
            "area rules loaded"
        );
        Ok(Self::with_rules(rules, &config.storage))
    }

    pub(crate) fn with_rules(rules: AreaRuleSet, storage: &StorageConfig) -> Self {
        let classifications =
            JsonFileStore::<ClassificationMap>::new(storage.classification_path());
        let screening = ScreeningService::new(
            Arc::new(rules),
            ClassificationStore::new(Arc::new(classifications)),
            ScreeningPaths {
                upload_dir: storage.upload_dir.clone(),
                ranking_json: storage.ranking_json_path(),
                ranking_csv: storage.ranking_csv_path(),
            },
        );

        let registry = OpeningRegistry::new(Arc::new(JsonFileStore::<Vec<Opening>>::new(
            storage.openings_path.clone(),
        )));
        let history = SelectionHistory::new(Arc::new(JsonFileStore::<Vec<SelectionRecord>>::new(
            storage.selections_path.clone(),
        )));
        let log = InterviewLog::new(Arc::new(JsonFileStore::<Vec<InterviewRecord>>::new(
            storage.interviews_path.clone(),
        )));

        Self {
            screening: Arc::new(screening),
            hiring: Arc::new(HiringService::new(registry.clone(), history)),
            interviews: Arc::new(InterviewService::new(log, registry)),
        }
    }

    pub(crate) fn hiring_state(&self) -> HiringState {
        HiringState {
            hiring: self.hiring.clone(),
            interviews: self.interviews.clone(),
            screening: self.screening.clone(),
        }
    }
}
