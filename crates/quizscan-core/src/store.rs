//! Per-class question sets.
//!
//! The whole map is held in memory and rewritten wholesale on every save,
//! which is fine for the handful of classes a single school deploys.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;

use crate::Question;

type ClassMap = BTreeMap<String, Vec<Question>>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to write question store {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize questions: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("question store lock poisoned")]
    Poisoned,
}

/// Storage for normalized question sets, keyed by class identifier.
pub trait QuestionStore: Send + Sync {
    /// The saved questions for `class`, if any were ever saved.
    fn questions(&self, class: &str) -> Option<Vec<Question>>;

    /// Replace the question set for `class` and persist it.
    fn replace(&self, class: &str, questions: Vec<Question>) -> Result<(), StoreError>;
}

/// A JSON file holding `{ "<class>": [Question, ...] }`.
pub struct JsonFileStore {
    path: PathBuf,
    classes: RwLock<ClassMap>,
}

impl JsonFileStore {
    /// Load the store at `path`, creating an empty `{}` file if none exists.
    ///
    /// Never fails. A file that can't be created, read or parsed is logged
    /// and the store starts empty; a persistent problem surfaces on the first
    /// save.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if !path.exists()
            && let Err(e) = write_atomic(&path, &ClassMap::new())
        {
            tracing::warn!(path = %path.display(), error = %e, "could not create question store");
        }
        let classes = match read_classes(&path) {
            Ok(classes) => classes,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "question store unreadable, starting empty");
                ClassMap::new()
            }
        };
        tracing::info!(path = %path.display(), classes = classes.len(), "loaded question store");
        Self {
            path,
            classes: RwLock::new(classes),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QuestionStore for JsonFileStore {
    fn questions(&self, class: &str) -> Option<Vec<Question>> {
        self.classes.read().ok()?.get(class).cloned()
    }

    fn replace(&self, class: &str, questions: Vec<Question>) -> Result<(), StoreError> {
        let mut classes = self.classes.write().map_err(|_| StoreError::Poisoned)?;
        let previous = classes.insert(class.to_string(), questions);
        if let Err(e) = write_atomic(&self.path, &classes) {
            // Keep memory consistent with what's on disk.
            match previous {
                Some(old) => classes.insert(class.to_string(), old),
                None => classes.remove(class),
            };
            return Err(e);
        }
        Ok(())
    }
}

fn read_classes(path: &Path) -> Result<ClassMap, String> {
    let raw = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    if raw.trim().is_empty() {
        return Ok(ClassMap::new());
    }
    serde_json::from_str(&raw).map_err(|e| e.to_string())
}

fn write_atomic(path: &Path, classes: &ClassMap) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(classes)?;
    let tmp = path.with_extension("json.tmp");
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }
    std::fs::write(&tmp, json).map_err(write_err)?;
    std::fs::rename(&tmp, path).map_err(write_err)
}

/// Non-persistent store for tests and dry runs.
#[derive(Default)]
pub struct MemoryStore {
    classes: RwLock<ClassMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl QuestionStore for MemoryStore {
    fn questions(&self, class: &str) -> Option<Vec<Question>> {
        self.classes.read().ok()?.get(class).cloned()
    }

    fn replace(&self, class: &str, questions: Vec<Question>) -> Result<(), StoreError> {
        self.classes
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(class.to_string(), questions);
        Ok(())
    }
}
