use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::storage::{DocumentStore, StorageError};

/// Areas matched by a single résumé.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationEntry {
    pub filename: String,
    pub areas: Vec<String>,
}

/// Insertion-ordered `filename -> areas` mapping, persisted as a flat JSON object.
///
/// Entry order is significant: ranking ties are broken by it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassificationMap {
    entries: Vec<ClassificationEntry>,
    positions: HashMap<String, usize>,
}

impl ClassificationMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the areas of an existing filename in place, or appends a new entry.
    /// Duplicate labels are dropped, keeping the first occurrence.
    pub fn upsert(&mut self, filename: impl Into<String>, areas: Vec<String>) {
        let filename = filename.into();
        let areas = dedup_preserving_order(areas);
        let existing = self
            .positions
            .get(&filename)
            .and_then(|&position| self.entries.get_mut(position));
        match existing {
            Some(entry) => entry.areas = areas,
            None => {
                self.positions.insert(filename.clone(), self.entries.len());
                self.entries.push(ClassificationEntry { filename, areas });
            }
        }
    }

    pub fn get(&self, filename: &str) -> Option<&[String]> {
        self.positions
            .get(filename)
            .and_then(|&position| self.entries.get(position))
            .map(|entry| entry.areas.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassificationEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<String>)> for ClassificationMap {
    fn from_iter<I: IntoIterator<Item = (S, Vec<String>)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (filename, areas) in iter {
            map.upsert(filename, areas);
        }
        map
    }
}

fn dedup_preserving_order(areas: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(areas.len());
    for area in areas {
        if !unique.contains(&area) {
            unique.push(area);
        }
    }
    unique
}

impl Serialize for ClassificationMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.filename, &entry.areas)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ClassificationMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = ClassificationMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object mapping file names to area lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = ClassificationMap::new();
                while let Some((filename, areas)) = access.next_entry::<String, Vec<String>>()? {
                    map.upsert(filename, areas);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClassificationStoreError {
    #[error("no classification stored for '{0}'")]
    NotFound(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Persistent `filename -> areas` registry backed by a whole-document store.
#[derive(Clone)]
pub struct ClassificationStore {
    documents: Arc<dyn DocumentStore<ClassificationMap>>,
}

impl ClassificationStore {
    pub fn new(documents: Arc<dyn DocumentStore<ClassificationMap>>) -> Self {
        Self { documents }
    }

    /// Overwrites the entry for `filename`; other entries are left untouched.
    pub fn upsert(
        &self,
        filename: &str,
        areas: Vec<String>,
    ) -> Result<Vec<String>, ClassificationStoreError> {
        let mut map = self.documents.load()?;
        map.upsert(filename, areas);
        self.documents.save(&map)?;
        Ok(map.get(filename).map(<[String]>::to_vec).unwrap_or_default())
    }

    /// Applies several upserts with a single load/save cycle.
    pub fn upsert_many<I>(&self, entries: I) -> Result<usize, ClassificationStoreError>
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut map = self.documents.load()?;
        let mut written = 0;
        for (filename, areas) in entries {
            map.upsert(filename, areas);
            written += 1;
        }
        if written > 0 {
            self.documents.save(&map)?;
        }
        Ok(written)
    }

    pub fn get(&self, filename: &str) -> Result<Vec<String>, ClassificationStoreError> {
        let map = self.documents.load()?;
        map.get(filename)
            .map(<[String]>::to_vec)
            .ok_or_else(|| ClassificationStoreError::NotFound(filename.to_string()))
    }

    pub fn get_all(&self) -> Result<ClassificationMap, ClassificationStoreError> {
        Ok(self.documents.load()?)
    }
}
