use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::storage::{DocumentStore, MemoryStore, StorageError};
use crate::workflows::hiring::domain::{InterviewDraft, Opening, OpeningDraft, SelectionRecord};
use crate::workflows::hiring::repository::{InterviewLog, OpeningRegistry, SelectionHistory};
use crate::workflows::hiring::router::{hiring_router, HiringState};
use crate::workflows::hiring::{HiringService, InterviewRecord, InterviewService};
use crate::workflows::screening::{
    AreaRule, AreaRuleSet, ClassificationMap, ClassificationStore, ScreeningPaths,
    ScreeningService,
};

pub(super) fn draft(name: &str, area: &str) -> OpeningDraft {
    OpeningDraft {
        name: name.to_string(),
        area: area.to_string(),
        education: "Ingeniería en sistemas".to_string(),
        experience: "3 años".to_string(),
        skills: "Python, Rust".to_string(),
        certifications: String::new(),
    }
}

pub(super) fn interview_draft(opening: &str, candidate: &str, datetime: &str) -> InterviewDraft {
    InterviewDraft {
        opening: opening.to_string(),
        candidate: candidate.to_string(),
        datetime: datetime.to_string(),
        kind: "técnica".to_string(),
        medium: "videollamada".to_string(),
        notes: String::new(),
        state: Default::default(),
    }
}

pub(super) struct Fixture {
    pub(super) hiring: HiringService,
    pub(super) interviews: InterviewService,
    pub(super) openings: Arc<MemoryStore<Vec<Opening>>>,
    pub(super) history: Arc<MemoryStore<Vec<SelectionRecord>>>,
}

pub(super) fn fixture() -> Fixture {
    let openings = Arc::new(MemoryStore::<Vec<Opening>>::default());
    let history = Arc::new(MemoryStore::<Vec<SelectionRecord>>::default());
    let log = Arc::new(MemoryStore::<Vec<InterviewRecord>>::default());

    let registry = OpeningRegistry::new(openings.clone());
    let hiring = HiringService::new(registry.clone(), SelectionHistory::new(history.clone()));
    let interviews = InterviewService::new(InterviewLog::new(log), registry);

    Fixture {
        hiring,
        interviews,
        openings,
        history,
    }
}

/// Loads as an empty document and rejects every write.
pub(super) struct ReadOnlyStore<T>(PhantomData<fn() -> T>);

impl<T> Default for ReadOnlyStore<T> {
    fn default() -> Self {
        Self(PhantomData)
    }
}

impl<T: Default> DocumentStore<T> for ReadOnlyStore<T> {
    fn load(&self) -> Result<T, StorageError> {
        Ok(T::default())
    }

    fn save(&self, _document: &T) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("read only".to_string()))
    }
}

/// Fails every read and write.
pub(super) struct OfflineStore;

impl<T> DocumentStore<T> for OfflineStore {
    fn load(&self) -> Result<T, StorageError> {
        Err(StorageError::Unavailable("disk offline".to_string()))
    }

    fn save(&self, _document: &T) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("disk offline".to_string()))
    }
}

pub(super) fn screening_service(root: &Path, classifications: ClassificationMap) -> ScreeningService {
    let rules = AreaRuleSet::new(vec![
        AreaRule {
            name: "Engineering".to_string(),
            keywords: vec!["python".to_string(), "rust".to_string()],
        },
        AreaRule {
            name: "Sales".to_string(),
            keywords: vec!["crm".to_string()],
        },
    ])
    .expect("valid rules");

    ScreeningService::new(
        Arc::new(rules),
        ClassificationStore::new(Arc::new(MemoryStore::new(classifications))),
        ScreeningPaths {
            upload_dir: root.join("uploads"),
            ranking_json: root.join("output").join("mejores_candidatos.json"),
            ranking_csv: root.join("output").join("mejores_candidatos.csv"),
        },
    )
}

pub(super) fn sample_classifications() -> ClassificationMap {
    [
        ("a.pdf", vec!["Engineering".to_string()]),
        (
            "b.pdf",
            vec!["Engineering".to_string(), "Sales".to_string()],
        ),
        ("c.pdf", vec!["Unclassified".to_string()]),
    ]
    .into_iter()
    .collect()
}

pub(super) fn router_with(fixture: &Fixture, root: &Path) -> axum::Router {
    hiring_router(HiringState {
        hiring: Arc::new(fixture.hiring.clone()),
        interviews: Arc::new(fixture.interviews.clone()),
        screening: Arc::new(screening_service(root, sample_classifications())),
    })
}

pub(super) fn stored_openings(fixture: &Fixture) -> Vec<Opening> {
    fixture.openings.load().expect("openings load")
}

pub(super) fn stored_history(fixture: &Fixture) -> Vec<SelectionRecord> {
    fixture.history.load().expect("history load")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
