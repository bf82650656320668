use std::{
    collections::HashSet,
    fmt,
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use tracing::{debug, warn};

use super::TopicError;

const BUNDLED_TOPICS: &str = include_str!("../../data/topics.json");

/// The two fixed display languages. LanguageA is English, LanguageB is Korean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayLanguage {
    #[default]
    LanguageA,
    LanguageB,
}

impl DisplayLanguage {
    pub fn label(&self) -> &'static str {
        match self {
            DisplayLanguage::LanguageA => "English",
            DisplayLanguage::LanguageB => "한국어",
        }
    }

    pub fn other(&self) -> Self {
        match self {
            DisplayLanguage::LanguageA => DisplayLanguage::LanguageB,
            DisplayLanguage::LanguageB => DisplayLanguage::LanguageA,
        }
    }

    /// Stored as the `isKoreanMode` flag.
    pub fn from_flag(is_language_b: bool) -> Self {
        if is_language_b {
            DisplayLanguage::LanguageB
        } else {
            DisplayLanguage::LanguageA
        }
    }

    pub fn as_flag(&self) -> bool {
        matches!(self, DisplayLanguage::LanguageB)
    }
}

/// A prompt and its direct translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub english: String,
    pub korean: String,
}

impl Question {
    pub fn text(&self, language: DisplayLanguage) -> &str {
        match language {
            DisplayLanguage::LanguageA => &self.english,
            DisplayLanguage::LanguageB => &self.korean,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    pub english: String,
    pub korean: String,
}

impl VocabularyEntry {
    /// `(primary, secondary)` for the given display language.
    pub fn pair(&self, language: DisplayLanguage) -> (&str, &str) {
        match language {
            DisplayLanguage::LanguageA => (&self.english, &self.korean),
            DisplayLanguage::LanguageB => (&self.korean, &self.english),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "category")]
    pub name: String,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default, alias = "koreanVocabulary")]
    pub vocabulary: Vec<VocabularyEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Level {
    pub name: String,
    pub categories: Vec<Category>,
}

impl Level {
    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }
}

/// The topic taxonomy, immutable once loaded. Levels keep document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    levels: Vec<Level>,
}

impl Dataset {
    /// Validates and builds a dataset. Categories without questions are dropped.
    pub fn from_levels(levels: Vec<(String, Vec<Category>)>) -> Result<Self, TopicError> {
        let mut seen_levels = HashSet::new();
        let mut built = Vec::with_capacity(levels.len());

        for (name, categories) in levels {
            if !seen_levels.insert(name.clone()) {
                return Err(TopicError::Custom(format!("Duplicate level: {}", name)));
            }

            let mut seen_categories = HashSet::new();
            let mut kept = Vec::with_capacity(categories.len());
            for category in categories {
                if !seen_categories.insert(category.name.clone()) {
                    return Err(TopicError::DuplicateCategory {
                        level: name,
                        category: category.name,
                    });
                }
                if category.questions.is_empty() {
                    warn!(level = %name, category = %category.name, "Skipping category with no questions");
                    continue;
                }
                kept.push(category);
            }

            if kept.is_empty() {
                return Err(TopicError::EmptyLevel(name));
            }
            built.push(Level { name, categories: kept });
        }

        debug!(levels = built.len(), "Dataset loaded");
        Ok(Self { levels: built })
    }

    /// Skips validation so tests can reach states loading never produces.
    #[cfg(test)]
    pub(crate) fn from_levels_unchecked(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    pub fn from_json_str(json: &str) -> Result<Self, TopicError> {
        let raw: RawLevels = serde_json::from_str(json)?;
        Self::from_levels(raw.0)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, TopicError> {
        let raw: RawLevels = serde_json::from_reader(reader)?;
        Self::from_levels(raw.0)
    }

    pub fn load(path: &Path) -> Result<Self, TopicError> {
        let file = File::open(path).map_err(|e| {
            TopicError::Custom(format!("Failed to open dataset {}: {}", path.display(), e))
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// The sample dataset shipped with the crate.
    pub fn bundled() -> Result<Self, TopicError> {
        Self::from_json_str(BUNDLED_TOPICS)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn level(&self, name: &str) -> Option<&Level> {
        self.levels.iter().find(|l| l.name == name)
    }

    pub fn level_names(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|l| l.name.as_str())
    }

    pub fn category(&self, level: &str, name: &str) -> Option<&Category> {
        self.level(level).and_then(|l| l.category(name))
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Level entries in the order they appear in the document.
struct RawLevels(Vec<(String, Vec<Category>)>);

impl<'de> Deserialize<'de> for RawLevels {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LevelsVisitor;

        impl<'de> Visitor<'de> for LevelsVisitor {
            type Value = RawLevels;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping level names to category lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut levels = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, categories)) = map.next_entry::<String, Vec<Category>>()? {
                    levels.push((name, categories));
                }
                Ok(RawLevels(levels))
            }
        }

        deserializer.deserialize_map(LevelsVisitor)
    }
}
