use std::fs;

use topicdeck::{
    preferences::{CATEGORIES_KEY, LANGUAGE_KEY, LEVEL_KEY},
    Dataset, DisplayLanguage, JsonFileStore, KeyValueStore, PreferenceState, TopicSession,
};

const DATASET: &str = r#"{
    "Beginner": [{
        "category": "Food",
        "questions": [{ "english": "What do you eat?", "korean": "뭐 먹어요?" }],
        "vocabulary": [{ "english": "eat", "korean": "먹다" }]
    }]
}"#;

#[test]
fn test_session_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    let dataset = Dataset::from_json_str(DATASET).unwrap();

    let mut session = TopicSession::open(dataset.clone(), JsonFileStore::open(&path), Some(1));
    session.set_active_level("Beginner").unwrap();
    session.toggle_category("Food").unwrap();
    session.set_display_language(DisplayLanguage::LanguageB);
    let saved = session.preferences().state().clone();
    drop(session);

    let reopened = TopicSession::open(dataset, JsonFileStore::open(&path), Some(1));
    assert_eq!(reopened.preferences().state(), &saved);
    assert!(!reopened.can_draw());
}

#[test]
fn test_stored_values_are_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    let dataset = Dataset::from_json_str(DATASET).unwrap();

    let mut session = TopicSession::open(dataset, JsonFileStore::open(&path), None);
    session.set_active_level("Beginner").unwrap();
    let store = session.into_store();

    assert_eq!(store.get(LEVEL_KEY).as_deref(), Some("\"Beginner\""));
    assert_eq!(store.get(CATEGORIES_KEY).as_deref(), Some(r#"{"Food":true}"#));
    assert_eq!(store.get(LANGUAGE_KEY).as_deref(), Some("false"));

    let on_disk: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk[LEVEL_KEY], "\"Beginner\"");
}

#[test]
fn test_corrupt_file_starts_from_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    fs::write(&path, r#"{ "selectedLevel": "\"Beginner\"", "isKoreanMode": "maybe" "#).unwrap();

    let session =
        TopicSession::open(Dataset::from_json_str(DATASET).unwrap(), JsonFileStore::open(&path), None);
    assert_eq!(session.preferences().state(), &PreferenceState::default());
}

#[test]
fn test_corrupt_field_only_resets_that_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    fs::write(
        &path,
        r#"{ "selectedLevel": "\"Beginner\"", "categories": "[1,2]", "isKoreanMode": "maybe" }"#,
    )
    .unwrap();

    let session =
        TopicSession::open(Dataset::from_json_str(DATASET).unwrap(), JsonFileStore::open(&path), None);
    let prefs = session.preferences();
    assert_eq!(prefs.active_level(), Some("Beginner"));
    assert!(prefs.is_category_enabled("Food"));
    assert_eq!(prefs.display_language(), DisplayLanguage::LanguageA);
}
