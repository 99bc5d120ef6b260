//! Whole-document persistence used by every registry in the crate.
//!
//! Each resource is a single JSON document that is loaded, mutated, and written back in
//! full. File writes go through a temporary sibling file that is renamed over the target
//! once the new content is completely serialized, so a failed write leaves the previous
//! document intact.

use std::fs;
use std::io::{BufWriter, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

/// Storage failures surfaced to callers as persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} does not contain a valid document: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to serialize document for {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Narrow load/save seam so business logic never touches the filesystem directly.
pub trait DocumentStore<T>: Send + Sync {
    fn load(&self) -> Result<T, StorageError>;
    fn save(&self, document: &T) -> Result<(), StorageError>;
}

/// JSON file backend. A missing file loads as `T::default()`.
#[derive(Debug)]
pub struct JsonFileStore<T> {
    path: PathBuf,
    _document: PhantomData<fn() -> T>,
}

impl<T> JsonFileStore<T> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _document: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<T> DocumentStore<T> for JsonFileStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    fn load(&self) -> Result<T, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(T::default()),
            Err(source) => {
                return Err(StorageError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if raw.trim().is_empty() {
            return Ok(T::default());
        }

        serde_json::from_str(&raw).map_err(|source| StorageError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    fn save(&self, document: &T) -> Result<(), StorageError> {
        let encoded =
            serde_json::to_vec_pretty(document).map_err(|source| StorageError::Encode {
                path: self.path.clone(),
                source,
            })?;
        write_atomically(&self.path, &encoded)
    }
}

/// Replaces `path` with `contents` via a temp file in the same directory.
pub fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), StorageError> {
    let write_err = |source: std::io::Error| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&parent).map_err(write_err)?;

    let temp = NamedTempFile::new_in(&parent).map_err(write_err)?;
    {
        let mut writer = BufWriter::new(temp.as_file());
        writer.write_all(contents).map_err(write_err)?;
        writer.flush().map_err(write_err)?;
    }
    temp.as_file().sync_all().map_err(write_err)?;
    temp.persist(path).map_err(|err| write_err(err.error))?;
    Ok(())
}

/// In-memory backend for tests and ephemeral deployments.
#[derive(Debug, Default)]
pub struct MemoryStore<T> {
    document: Mutex<T>,
}

impl<T> MemoryStore<T> {
    pub fn new(document: T) -> Self {
        Self {
            document: Mutex::new(document),
        }
    }
}

impl<T> DocumentStore<T> for MemoryStore<T>
where
    T: Clone + Send,
{
    fn load(&self) -> Result<T, StorageError> {
        let guard = self
            .document
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store mutex poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn save(&self, document: &T) -> Result<(), StorageError> {
        let mut guard = self
            .document
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store mutex poisoned".to_string()))?;
        *guard = document.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn missing_file_loads_default_document() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store: JsonFileStore<Vec<String>> = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load().expect("loads").is_empty());
    }

    #[test]
    fn save_creates_parent_directories_and_round_trips() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("doc.json");
        let store: JsonFileStore<BTreeMap<String, u32>> = JsonFileStore::new(&path);

        let mut document = BTreeMap::new();
        document.insert("cv.pdf".to_string(), 2);
        store.save(&document).expect("saves");

        assert!(path.exists());
        assert_eq!(store.load().expect("loads"), document);
    }

    #[test]
    fn corrupt_document_is_reported_not_replaced() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("doc.json");
        fs::write(&path, "{ not json").expect("write fixture");
        let store: JsonFileStore<Vec<String>> = JsonFileStore::new(&path);

        assert!(matches!(store.load(), Err(StorageError::Decode { .. })));
        assert_eq!(
            fs::read_to_string(&path).expect("fixture intact"),
            "{ not json"
        );
    }

    #[test]
    fn atomic_write_leaves_no_temp_files_behind() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("doc.json");
        write_atomically(&path, b"[1]").expect("first write");
        write_atomically(&path, b"[1,2]").expect("second write");

        let entries: Vec<_> = fs::read_dir(dir.path())
            .expect("list dir")
            .filter_map(Result::ok)
            .collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(fs::read_to_string(&path).expect("read"), "[1,2]");
    }

    #[test]
    fn memory_store_returns_last_saved_document() {
        let store = MemoryStore::new(vec![1u8]);
        store.save(&vec![4, 5]).expect("saves");
        assert_eq!(store.load().expect("loads"), vec![4, 5]);
    }
}
