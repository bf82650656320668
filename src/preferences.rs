use std::collections::{BTreeMap, HashMap};

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::{
    core::{Dataset, DisplayLanguage, Level, TopicError},
    persistence::KeyValueStore,
};

pub const LEVEL_KEY: &str = "selectedLevel";
pub const CATEGORIES_KEY: &str = "categories";
pub const LANGUAGE_KEY: &str = "isKoreanMode";

/// User choices that survive between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PreferenceState {
    pub active_level: Option<String>,
    /// Always holds exactly the active level's categories (empty when no level).
    pub category_enabled: BTreeMap<String, bool>,
    pub display_language: DisplayLanguage,
}

impl PreferenceState {
    pub fn is_category_enabled(&self, name: &str) -> bool {
        self.category_enabled.get(name).copied().unwrap_or(false)
    }
}

/// Rebuilds the mapping for `level`, keeping flags of same-named categories.
fn merge_categories<'a, I>(level: &Level, previous: I) -> BTreeMap<String, bool>
where
    I: IntoIterator<Item = (&'a String, &'a bool)>,
{
    let previous: HashMap<&str, bool> =
        previous.into_iter().map(|(name, enabled)| (name.as_str(), *enabled)).collect();

    level
        .category_names()
        .map(|name| (name.to_string(), previous.get(name).copied().unwrap_or(true)))
        .collect()
}

fn read_field<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
) -> Result<Option<T>, TopicError> {
    match store.get(key) {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| TopicError::corrupt(key, e)),
    }
}

/// Owns the preference state and writes every change through to `S`.
#[derive(Debug)]
pub struct PreferenceStore<S: KeyValueStore> {
    store: S,
    state: PreferenceState,
}

impl<S: KeyValueStore> PreferenceStore<S> {
    /// Starts from defaults without reading the store.
    pub fn new(store: S) -> Self {
        Self { store, state: PreferenceState::default() }
    }

    /// Reads each field from the store. Corrupt fields fall back to their defaults.
    pub fn restore(store: S, dataset: &Dataset) -> Self {
        let active_level = match read_field::<Option<String>>(&store, LEVEL_KEY) {
            Ok(Some(Some(name))) if dataset.level(&name).is_some() => Some(name),
            Ok(Some(Some(name))) => {
                let e = TopicError::corrupt(LEVEL_KEY, format!("unknown level '{}'", name));
                warn!(error = %e, "Using default level");
                None
            }
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Using default level");
                None
            }
        };

        let stored_categories = read_field::<HashMap<String, bool>>(&store, CATEGORIES_KEY)
            .unwrap_or_else(|e| {
                warn!(error = %e, "Using default categories");
                None
            })
            .unwrap_or_default();

        let category_enabled = active_level
            .as_deref()
            .and_then(|name| dataset.level(name))
            .map(|level| merge_categories(level, &stored_categories))
            .unwrap_or_default();

        let display_language = read_field::<bool>(&store, LANGUAGE_KEY)
            .unwrap_or_else(|e| {
                warn!(error = %e, "Using default display language");
                None
            })
            .map(DisplayLanguage::from_flag)
            .unwrap_or_default();

        debug!(level = ?active_level, language = ?display_language, "Preferences restored");
        Self {
            store,
            state: PreferenceState { active_level, category_enabled, display_language },
        }
    }

    pub fn state(&self) -> &PreferenceState {
        &self.state
    }

    pub fn active_level(&self) -> Option<&str> {
        self.state.active_level.as_deref()
    }

    pub fn display_language(&self) -> DisplayLanguage {
        self.state.display_language
    }

    pub fn is_category_enabled(&self, name: &str) -> bool {
        self.state.is_category_enabled(name)
    }

    /// Enabled categories of the active level, in the level's declared order.
    pub fn enabled_categories<'d>(&self, dataset: &'d Dataset) -> Vec<&'d str> {
        self.active_level()
            .and_then(|name| dataset.level(name))
            .map(|level| {
                level.category_names().filter(|name| self.state.is_category_enabled(name)).collect()
            })
            .unwrap_or_default()
    }

    /// Selects `level` and rebuilds the category flags by name.
    pub fn set_active_level(&mut self, dataset: &Dataset, level: &str) -> Result<(), TopicError> {
        let Some(found) = dataset.level(level) else {
            return Err(TopicError::InvalidLevel(level.to_string()));
        };

        self.state.category_enabled = merge_categories(found, &self.state.category_enabled);
        self.state.active_level = Some(found.name.clone());
        debug!(level, categories = self.state.category_enabled.len(), "Active level changed");
        self.persist();
        Ok(())
    }

    pub fn toggle_category(&mut self, name: &str) -> Result<(), TopicError> {
        let Some(enabled) = self.state.category_enabled.get_mut(name) else {
            return Err(TopicError::InvalidCategory(name.to_string()));
        };

        *enabled = !*enabled;
        debug!(category = name, enabled = *enabled, "Category toggled");
        self.persist();
        Ok(())
    }

    /// Enables or disables every category of the active level at once.
    pub fn set_all_categories(&mut self, enabled: bool) {
        if self.state.category_enabled.is_empty() {
            return;
        }
        self.state.category_enabled.values_mut().for_each(|flag| *flag = enabled);
        self.persist();
    }

    pub fn set_display_language(&mut self, language: DisplayLanguage) {
        self.state.display_language = language;
        self.persist();
    }

    /// Back to no level, no categories and LanguageA.
    pub fn reset(&mut self) {
        self.state = PreferenceState::default();
        self.persist();
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) {
        let level = serde_json::to_string(&self.state.active_level);
        let categories = serde_json::to_string(&self.state.category_enabled);
        let language = serde_json::to_string(&self.state.display_language.as_flag());

        for (key, value) in [(LEVEL_KEY, level), (CATEGORIES_KEY, categories), (LANGUAGE_KEY, language)]
        {
            let result = value.map_err(TopicError::from).and_then(|v| self.store.set(key, &v));
            if let Err(e) = result {
                warn!(key, error = %e, "Failed to persist preference");
            }
        }
    }
}
