use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::normalizer::normalize_text;

/// A named skill area and the keywords that place a résumé in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaRule {
    #[serde(rename = "nombre_area")]
    pub name: String,
    #[serde(rename = "palabras_clave", default)]
    pub keywords: Vec<String>,
}

/// Ordered rule set. Rule order drives classification output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaRuleSet {
    areas: Vec<AreaRule>,
}

#[derive(Debug, Deserialize)]
struct RuleDocument {
    areas: Vec<AreaRule>,
}

/// Configuration errors raised while loading the rule set. Always fatal.
#[derive(Debug, thiserror::Error)]
pub enum RuleSetError {
    #[error("area rules file {path} could not be read: {source}")]
    Missing {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("area rules are malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("area rule #{index} has an empty name")]
    EmptyName { index: usize },
    #[error("area '{0}' is defined more than once")]
    DuplicateArea(String),
}

impl AreaRuleSet {
    /// Validates names and normalizes keywords the same way résumé text is normalized.
    pub fn new(areas: Vec<AreaRule>) -> Result<Self, RuleSetError> {
        let mut seen = HashSet::new();
        let mut sanitized = Vec::with_capacity(areas.len());

        for (index, rule) in areas.into_iter().enumerate() {
            let name = rule.name.trim().to_string();
            if name.is_empty() {
                return Err(RuleSetError::EmptyName { index });
            }
            if !seen.insert(name.clone()) {
                return Err(RuleSetError::DuplicateArea(name));
            }

            let keywords = rule
                .keywords
                .iter()
                .map(|keyword| normalize_text(keyword))
                .filter(|keyword| !keyword.is_empty())
                .collect();

            sanitized.push(AreaRule { name, keywords });
        }

        Ok(Self { areas: sanitized })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RuleSetError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| RuleSetError::Missing {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, RuleSetError> {
        let document: RuleDocument = serde_json::from_str(raw)?;
        Self::new(document.areas)
    }

    pub fn areas(&self) -> &[AreaRule] {
        &self.areas
    }

    pub fn names(&self) -> Vec<&str> {
        self.areas.iter().map(|rule| rule.name.as_str()).collect()
    }

    pub fn contains(&self, area: &str) -> bool {
        self.areas.iter().any(|rule| rule.name == area)
    }

    pub fn len(&self) -> usize {
        self.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}
