pub mod config;
pub mod core;
pub mod logging;
pub mod persistence;
pub mod preferences;
pub mod selector;
pub mod session;

pub use crate::core::{
    Category, Dataset, DisplayLanguage, EmptyReason, Level, Question, TopicError, VocabularyEntry,
};
pub use config::AppConfig;
pub use persistence::{JsonFileStore, KeyValueStore, MemoryStore};
pub use preferences::{PreferenceState, PreferenceStore};
pub use selector::{draw_random_topic, try_draw_topic, CurrentTopic};
pub use session::{TopicSession, TopicView};
