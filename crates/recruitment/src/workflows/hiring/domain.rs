use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a job opening. There is no transition out of `Closed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpeningState {
    #[default]
    #[serde(rename = "abierto", alias = "abierta", alias = "Abierto", alias = "open")]
    Open,
    #[serde(rename = "cerrado", alias = "cerrada", alias = "Cerrado", alias = "closed")]
    Closed,
}

impl OpeningState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "abierto",
            Self::Closed => "cerrado",
        }
    }
}

/// Final candidate recorded when an opening is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningSelection {
    #[serde(rename = "candidato")]
    pub candidate: String,
    #[serde(rename = "at")]
    pub selected_at: DateTime<Utc>,
}

/// Job opening ("puesto") as stored in the registry document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    #[serde(rename = "nombre_puesto")]
    pub name: String,
    #[serde(rename = "area_puesto")]
    pub area: String,
    #[serde(rename = "formacion_academica", default)]
    pub education: String,
    #[serde(rename = "experiencia_laboral", default)]
    pub experience: String,
    #[serde(rename = "habilidades", default)]
    pub skills: String,
    #[serde(rename = "certificaciones", default)]
    pub certifications: String,
    #[serde(rename = "estado", default)]
    pub state: OpeningState,
    #[serde(
        rename = "seleccionado",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub selection: Option<OpeningSelection>,
}

impl Opening {
    pub fn is_open(&self) -> bool {
        self.state != OpeningState::Closed
    }
}

/// Payload accepted when publishing a new opening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpeningDraft {
    #[serde(rename = "nombre_puesto")]
    pub name: String,
    #[serde(rename = "area_puesto")]
    pub area: String,
    #[serde(rename = "formacion_academica", default)]
    pub education: String,
    #[serde(rename = "experiencia_laboral", default)]
    pub experience: String,
    #[serde(rename = "habilidades", default)]
    pub skills: String,
    #[serde(rename = "certificaciones", default)]
    pub certifications: String,
}

impl OpeningDraft {
    pub fn into_opening(self) -> Result<Opening, ValidationError> {
        let name = required("nombre_puesto", &self.name)?;
        let area = required("area_puesto", &self.area)?;

        Ok(Opening {
            name,
            area,
            education: self.education,
            experience: self.experience,
            skills: self.skills,
            certifications: self.certifications,
            state: OpeningState::Open,
            selection: None,
        })
    }
}

/// Editable opening fields. The name, state, and selection cannot be changed here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpeningUpdate {
    #[serde(rename = "area_puesto", default)]
    pub area: Option<String>,
    #[serde(rename = "formacion_academica", default)]
    pub education: Option<String>,
    #[serde(rename = "experiencia_laboral", default)]
    pub experience: Option<String>,
    #[serde(rename = "habilidades", default)]
    pub skills: Option<String>,
    #[serde(rename = "certificaciones", default)]
    pub certifications: Option<String>,
}

impl OpeningUpdate {
    pub fn apply(self, opening: &mut Opening) -> Result<(), ValidationError> {
        if let Some(area) = self.area {
            opening.area = required("area_puesto", &area)?;
        }
        if let Some(education) = self.education {
            opening.education = education;
        }
        if let Some(experience) = self.experience {
            opening.experience = experience;
        }
        if let Some(skills) = self.skills {
            opening.skills = skills;
        }
        if let Some(certifications) = self.certifications {
            opening.certifications = certifications;
        }
        Ok(())
    }
}

/// Append-only selection history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRecord {
    #[serde(rename = "puesto")]
    pub opening: String,
    #[serde(rename = "candidato")]
    pub candidate: String,
    pub at: DateTime<Utc>,
}

/// Identifier wrapper for scheduled interviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterviewId(pub Uuid);

impl InterviewId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl std::fmt::Display for InterviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Interview progress. Completed, cancelled, and no-show are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterviewState {
    #[default]
    #[serde(rename = "programada")]
    Scheduled,
    #[serde(rename = "reprogramada")]
    Rescheduled,
    #[serde(rename = "realizada")]
    Completed,
    #[serde(rename = "cancelada")]
    Cancelled,
    #[serde(rename = "no_asistio")]
    NoShow,
}

impl InterviewState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "programada",
            Self::Rescheduled => "reprogramada",
            Self::Completed => "realizada",
            Self::Cancelled => "cancelada",
            Self::NoShow => "no_asistio",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }
}

/// Interview linked to an opening and a candidate résumé.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewRecord {
    pub id: InterviewId,
    #[serde(rename = "puesto")]
    pub opening: String,
    #[serde(rename = "candidato")]
    pub candidate: String,
    #[serde(rename = "fecha_hora")]
    pub datetime: String,
    #[serde(rename = "tipo")]
    pub kind: String,
    #[serde(rename = "medio")]
    pub medium: String,
    #[serde(rename = "notas", default)]
    pub notes: String,
    #[serde(rename = "estado", default)]
    pub state: InterviewState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InterviewRecord {
    /// Parsed scheduled time. Unparsable values yield `None`, which sorts first.
    pub fn scheduled_at(&self) -> Option<NaiveDateTime> {
        parse_schedule(&self.datetime)
    }
}

const SCHEDULE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Accepts RFC 3339, HTML `datetime-local` values, and bare dates (midnight).
pub fn parse_schedule(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_utc());
    }
    SCHEDULE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Payload accepted when scheduling an interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterviewDraft {
    #[serde(rename = "puesto", default)]
    pub opening: String,
    #[serde(rename = "candidato", default)]
    pub candidate: String,
    #[serde(rename = "fecha_hora", default)]
    pub datetime: String,
    #[serde(rename = "tipo", default)]
    pub kind: String,
    #[serde(rename = "medio", default)]
    pub medium: String,
    #[serde(rename = "notas", default)]
    pub notes: String,
    #[serde(rename = "estado", default)]
    pub state: InterviewState,
}

/// Mutable interview fields. Identity fields are rejected as unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterviewUpdate {
    #[serde(rename = "fecha_hora", default)]
    pub datetime: Option<String>,
    #[serde(rename = "tipo", default)]
    pub kind: Option<String>,
    #[serde(rename = "medio", default)]
    pub medium: Option<String>,
    #[serde(rename = "notas", default)]
    pub notes: Option<String>,
    #[serde(rename = "estado", default)]
    pub state: Option<InterviewState>,
}

/// Optional list filters; all present filters must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct InterviewFilter {
    #[serde(default)]
    pub opening: Option<String>,
    #[serde(default)]
    pub candidate: Option<String>,
    #[serde(default)]
    pub state: Option<InterviewState>,
}

impl InterviewFilter {
    pub fn matches(&self, record: &InterviewRecord) -> bool {
        self.opening
            .as_deref()
            .map_or(true, |opening| record.opening == opening)
            && self
                .candidate
                .as_deref()
                .map_or(true, |candidate| record.candidate == candidate)
            && self.state.map_or(true, |state| record.state == state)
    }
}

/// Boundary validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("field '{0}' is required and cannot be empty")]
    MissingField(&'static str),
}

pub(crate) fn required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}
