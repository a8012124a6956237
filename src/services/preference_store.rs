// Preference Store Service
// Persistence for the site-wide appearance preference. The preference is
// a single externally-owned key-value slot: written whole on every
// change, re-read on every page load. Nothing else crosses navigations.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde_json::Value;
use thiserror::Error;

/// Well-known slot the theme preference round-trips through.
pub const THEME_STORAGE_KEY: &str = "theme";

const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to write preferences: {0}")]
    Write(#[from] std::io::Error),

    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("preference storage is unavailable")]
    Unavailable,
}

/// String-keyed preference storage. Reads are infallible by contract:
/// absent, unreadable, and corrupt all surface as `None` so callers can
/// fall back to their defaults without branching on the cause.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str);
}

/// Session-only storage. The fallback when persistent storage is
/// unavailable (privacy mode, quota exhaustion), and the test double.
#[derive(Default)]
pub struct MemoryPreferenceStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        match self.values.read() {
            Ok(guard) => guard.get(key).cloned(),
            Err(_) => None,
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut guard = self.values.write().map_err(|_| StoreError::Unavailable)?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        if let Ok(mut guard) = self.values.write() {
            guard.remove(key);
        }
    }
}

/// File-backed storage: one flat JSON object per install, cached behind
/// an RwLock so repeated reads during a page load touch the disk once.
pub struct FilePreferenceStore {
    path: PathBuf,
    cache: RwLock<Option<HashMap<String, String>>>,
}

impl FilePreferenceStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            cache: RwLock::new(None),
        }
    }

    /// Conventional location under the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|dir| dir.join("quillshell").join(PREFERENCES_FILE))
    }

    /// Loads the backing file tolerantly. A missing or malformed file is
    /// an empty map; per-key corruption (non-string values) is dropped.
    fn load(&self) -> HashMap<String, String> {
        if let Ok(guard) = self.cache.read() {
            if let Some(ref values) = *guard {
                return values.clone();
            }
        }

        let values = match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(Value::Object(map)) => map
                    .into_iter()
                    .filter_map(|(key, value)| match value {
                        Value::String(s) => Some((key, s)),
                        _ => None,
                    })
                    .collect(),
                Ok(_) | Err(_) => {
                    log::warn!("Preferences file {:?} is malformed, treating as empty", self.path);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };

        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(values.clone());
        }

        values
    }

    fn persist(&self, values: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, content)?;

        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(values.clone());
        }

        Ok(())
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.load().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.load();
        values.insert(key.to_string(), value.to_string());
        self.persist(&values)
    }

    fn remove(&self, key: &str) {
        let mut values = self.load();
        if values.remove(key).is_some() {
            if let Err(e) = self.persist(&values) {
                log::warn!("Failed to remove preference '{key}': {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryPreferenceStore::new();
        assert_eq!(store.get(THEME_STORAGE_KEY), None);

        store.set(THEME_STORAGE_KEY, "dark").unwrap();
        assert_eq!(store.get(THEME_STORAGE_KEY), Some("dark".to_string()));

        store.remove(THEME_STORAGE_KEY);
        assert_eq!(store.get(THEME_STORAGE_KEY), None);
    }

    #[test]
    fn test_file_store_round_trip_across_instances() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(PREFERENCES_FILE);

        let store = FilePreferenceStore::new(path.clone());
        store.set(THEME_STORAGE_KEY, "auto").unwrap();

        // Fresh instance, as after a navigation to another page.
        let reloaded = FilePreferenceStore::new(path);
        assert_eq!(reloaded.get(THEME_STORAGE_KEY), Some("auto".to_string()));
    }

    #[test]
    fn test_file_store_treats_corrupt_file_as_empty() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(PREFERENCES_FILE);
        std::fs::write(&path, "{not json").unwrap();

        let store = FilePreferenceStore::new(path);
        assert_eq!(store.get(THEME_STORAGE_KEY), None);
    }

    #[test]
    fn test_file_store_drops_non_string_values() {
        let temp = tempdir().unwrap();
        let path = temp.path().join(PREFERENCES_FILE);
        std::fs::write(&path, r#"{"theme": 42, "other": "kept"}"#).unwrap();

        let store = FilePreferenceStore::new(path);
        assert_eq!(store.get(THEME_STORAGE_KEY), None);
        assert_eq!(store.get("other"), Some("kept".to_string()));
    }

    #[test]
    fn test_missing_file_reads_as_absent() {
        let temp = tempdir().unwrap();
        let store = FilePreferenceStore::new(temp.path().join("never-written.json"));
        assert_eq!(store.get(THEME_STORAGE_KEY), None);
    }
}
