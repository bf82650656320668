use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::{
    core::{Dataset, DisplayLanguage, TopicError},
    persistence::KeyValueStore,
    preferences::PreferenceStore,
    selector::{self, CurrentTopic},
};

/// What the presentation layer shows for the current topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicView<'a> {
    pub category: &'a str,
    pub primary: &'a str,
    /// Present only while the translation is revealed.
    pub translation: Option<&'a str>,
    /// `(primary, secondary)` per entry.
    pub vocabulary: Vec<(&'a str, &'a str)>,
}

/// Dataset, preferences, random source and the transient display state in one owner.
pub struct TopicSession<S: KeyValueStore, R: Rng = StdRng> {
    dataset: Dataset,
    prefs: PreferenceStore<S>,
    rng: R,
    current: Option<CurrentTopic>,
    translation_visible: bool,
}

impl<S: KeyValueStore> TopicSession<S, StdRng> {
    /// Restores preferences from `store`. A `seed` makes draws reproducible.
    pub fn open(dataset: Dataset, store: S, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(dataset, store, rng)
    }
}

impl<S: KeyValueStore, R: Rng> TopicSession<S, R> {
    pub fn with_rng(dataset: Dataset, store: S, rng: R) -> Self {
        let prefs = PreferenceStore::restore(store, &dataset);
        Self { dataset, prefs, rng, current: None, translation_visible: false }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn preferences(&self) -> &PreferenceStore<S> {
        &self.prefs
    }

    pub fn current_topic(&self) -> Option<&CurrentTopic> {
        self.current.as_ref()
    }

    pub fn translation_visible(&self) -> bool {
        self.translation_visible
    }

    pub fn display_language(&self) -> DisplayLanguage {
        self.prefs.display_language()
    }

    pub fn set_active_level(&mut self, level: &str) -> Result<(), TopicError> {
        self.prefs.set_active_level(&self.dataset, level)
    }

    pub fn toggle_category(&mut self, name: &str) -> Result<(), TopicError> {
        self.prefs.toggle_category(name)
    }

    pub fn set_all_categories(&mut self, enabled: bool) {
        self.prefs.set_all_categories(enabled);
    }

    pub fn set_display_language(&mut self, language: DisplayLanguage) {
        self.prefs.set_display_language(language);
    }

    pub fn reset_preferences(&mut self) {
        self.prefs.reset();
    }

    /// False when a draw would come back empty; the trigger can be disabled.
    pub fn can_draw(&self) -> bool {
        selector::eligible_categories(&self.dataset, self.prefs.state()).is_ok()
    }

    /// Replaces the current topic and hides the translation again.
    pub fn new_topic(&mut self) -> Option<&CurrentTopic> {
        self.current = selector::draw_random_topic(&self.dataset, self.prefs.state(), &mut self.rng);
        self.translation_visible = false;
        self.current.as_ref()
    }

    /// Same as [`Self::new_topic`] but keeps the reason for an empty draw.
    pub fn try_new_topic(&mut self) -> Result<&CurrentTopic, TopicError> {
        self.translation_visible = false;
        match selector::try_draw_topic(&self.dataset, self.prefs.state(), &mut self.rng) {
            Ok(topic) => Ok(&*self.current.insert(topic)),
            Err(e) => {
                self.current = None;
                Err(e)
            }
        }
    }

    pub fn toggle_translation(&mut self) -> bool {
        self.translation_visible = !self.translation_visible;
        debug!(visible = self.translation_visible, "Translation toggled");
        self.translation_visible
    }

    pub fn view(&self) -> Option<TopicView<'_>> {
        let topic = self.current.as_ref()?;
        let language = self.display_language();

        Some(TopicView {
            category: &topic.category,
            primary: topic.question.text(language),
            translation: self.translation_visible.then(|| topic.question.text(language.other())),
            vocabulary: topic.vocabulary.iter().map(|entry| entry.pair(language)).collect(),
        })
    }

    pub fn into_store(self) -> S {
        self.prefs.into_store()
    }
}
