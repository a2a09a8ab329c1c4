//! Persisted dashboard state: recent searches and the dark-mode flag.
//!
//! Both values live in one small JSON document keyed the same way the values
//! are named on screen (`searchHistory`, `darkMode`). The document is read
//! once when the [`Store`] is opened and rewritten by every [`Store::persist`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::history::{self, HistoryEntry};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state file I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("state file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Persisted {
    #[serde(rename = "searchHistory", default)]
    pub search_history: Vec<HistoryEntry>,

    #[serde(rename = "darkMode", default)]
    pub dark_mode: bool,
}

#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    state: Persisted,
}

impl Store {
    /// Opens the state file at `path`. A missing file yields defaults; an
    /// unreadable or corrupt one is logged and also yields defaults.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match Self::read(&path) {
            Ok(state) => state,
            Err(err) => {
                warn!(path = %path.display(), %err, "discarding saved state");
                Persisted::default()
            }
        };
        debug!(
            path = %path.display(),
            history = state.search_history.len(),
            dark_mode = state.dark_mode,
            "loaded state"
        );
        Self { path, state }
    }

    fn read(path: &Path) -> Result<Persisted, StoreError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Persisted::default()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.state.search_history
    }

    pub fn dark_mode(&self) -> bool {
        self.state.dark_mode
    }

    pub fn record_search(&mut self, city: &str) {
        self.state.search_history = history::record_search(&self.state.search_history, city);
    }

    pub fn set_dark_mode(&mut self, dark: bool) {
        self.state.dark_mode = dark;
    }

    /// Writes the whole document, replacing the previous file atomically.
    pub fn persist(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&self.state)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("state.json"));
        assert!(store.history().is_empty());
        assert!(!store.dark_mode());
    }

    #[test]
    fn test_persist_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let mut store = Store::open(&path);
        store.record_search("London");
        store.record_search("Paris");
        store.set_dark_mode(true);
        store.persist().unwrap();

        let reloaded = Store::open(&path);
        assert!(reloaded.dark_mode());
        let cities: Vec<_> = reloaded.history().iter().map(|e| e.city.as_str()).collect();
        assert_eq!(cities, ["Paris", "London"]);
    }

    #[test]
    fn test_document_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let mut store = Store::open(&path);
        store.record_search("Tokyo");
        store.persist().unwrap();

        let doc: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["darkMode"], serde_json::Value::Bool(false));
        assert_eq!(doc["searchHistory"][0]["city"], "Tokyo");
        assert!(doc["searchHistory"][0]["timestamp"].is_i64());
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{not json").unwrap();
        let store = Store::open(&path);
        assert!(store.history().is_empty());
        assert!(!store.dark_mode());
    }

    #[test]
    fn test_partial_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, r#"{"darkMode": true}"#).unwrap();
        let store = Store::open(&path);
        assert!(store.dark_mode());
        assert!(store.history().is_empty());
    }
}
