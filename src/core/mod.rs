pub mod errors;
pub mod models;

pub use errors::{EmptyReason, TopicError};
pub use models::{Category, Dataset, DisplayLanguage, Level, Question, VocabularyEntry};
