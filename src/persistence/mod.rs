use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::core::TopicError;

const APP_NAME: &str = "topicdeck";

pub const PREFERENCES_FILE: &str = "preferences.json";

/// Opaque string-keyed store the preferences are written through.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), TopicError>;
    fn remove(&mut self, key: &str) -> Result<(), TopicError>;
}

pub fn get_app_data_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        let app_dir = data_dir.join(APP_NAME);
        let _ = fs::create_dir_all(&app_dir);
        app_dir
    } else {
        PathBuf::from(".")
    }
}

pub fn get_data_file_path(filename: &str) -> PathBuf {
    get_app_data_dir().join(filename)
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), TopicError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), TopicError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// A store kept as a single JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    file_path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let file_path = path.into();
        let entries = if file_path.exists() {
            match Self::read_entries(&file_path) {
                Ok(entries) => {
                    debug!(path = %file_path.display(), "Preferences loaded");
                    entries
                }
                Err(e) => {
                    warn!(path = %file_path.display(), error = %e, "Ignoring unreadable store");
                    BTreeMap::new()
                }
            }
        } else {
            BTreeMap::new()
        };

        Self { file_path, entries }
    }

    /// Opens the default store under the user's data directory.
    pub fn open_default() -> Self {
        Self::open(get_data_file_path(PREFERENCES_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<String, String>, TopicError> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn save(&self) -> Result<(), TopicError> {
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    TopicError::Custom(format!("Failed to create store directory: {}", e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.file_path, json)?;
        debug!(path = %self.file_path.display(), "Preferences saved");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), TopicError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    fn remove(&mut self, key: &str) -> Result<(), TopicError> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}
