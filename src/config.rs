use std::path::PathBuf;

use crate::{
    core::{Dataset, TopicError},
    persistence::{get_data_file_path, JsonFileStore, PREFERENCES_FILE},
};

/// Where the dataset and preferences live, and how draws are seeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `None` uses the bundled sample dataset.
    pub dataset: Option<PathBuf>,
    pub store: PathBuf,
    /// `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { dataset: None, store: get_data_file_path(PREFERENCES_FILE), seed: None }
    }
}

impl AppConfig {
    pub fn load_dataset(&self) -> Result<Dataset, TopicError> {
        match &self.dataset {
            Some(path) => Dataset::load(path),
            None => Dataset::bundled(),
        }
    }

    pub fn open_store(&self) -> JsonFileStore {
        JsonFileStore::open(&self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_bundled_dataset() {
        let config = AppConfig::default();
        assert!(config.dataset.is_none());
        assert!(config.store.ends_with(PREFERENCES_FILE));
        assert!(config.load_dataset().is_ok());
    }

    #[test]
    fn test_missing_dataset_file_is_an_error() {
        let config = AppConfig {
            dataset: Some(PathBuf::from("does/not/exist.json")),
            ..AppConfig::default()
        };
        assert!(matches!(config.load_dataset(), Err(TopicError::Custom(_))));
    }
}
