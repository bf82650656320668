use std::fmt;

use thiserror::Error;

/// Why a draw produced no topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyReason {
    NoActiveLevel,
    NoEnabledCategories,
    NoQuestions(String),
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::NoActiveLevel => write!(f, "no level selected"),
            EmptyReason::NoEnabledCategories => write!(f, "no categories enabled"),
            EmptyReason::NoQuestions(category) => {
                write!(f, "category '{}' has no questions", category)
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum TopicError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown level: {0}")]
    InvalidLevel(String),

    #[error("Unknown category for the active level: {0}")]
    InvalidCategory(String),

    #[error("No eligible topic: {0}")]
    EmptySelection(EmptyReason),

    #[error("Corrupt stored value for '{key}': {reason}")]
    CorruptPersistedValue { key: String, reason: String },

    #[error("Level '{0}' has no categories with questions")]
    EmptyLevel(String),

    #[error("Duplicate category '{category}' in level '{level}'")]
    DuplicateCategory { level: String, category: String },

    #[error("TopicError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for TopicError {
    fn from(error: std::io::Error) -> Self {
        TopicError::Io(Box::new(error))
    }
}

impl TopicError {
    pub fn corrupt(key: &str, reason: impl fmt::Display) -> Self {
        TopicError::CorruptPersistedValue { key: key.to_string(), reason: reason.to_string() }
    }

    /// Whether this is the "nothing to draw" condition rather than bad input.
    pub fn is_empty_selection(&self) -> bool {
        matches!(self, TopicError::EmptySelection(_))
    }
}
