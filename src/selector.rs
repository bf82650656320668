use rand::{seq::IndexedRandom, Rng};
use tracing::debug;

use crate::{
    core::{Category, Dataset, EmptyReason, Question, TopicError, VocabularyEntry},
    preferences::PreferenceState,
};

/// One drawn prompt with the vocabulary of its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentTopic {
    pub category: String,
    pub question: Question,
    /// The whole list, in dataset order.
    pub vocabulary: Vec<VocabularyEntry>,
}

/// Categories of the active level that may be drawn from, in declared order.
///
/// Flags for names outside the active level are ignored.
pub fn eligible_categories<'d>(
    dataset: &'d Dataset,
    prefs: &PreferenceState,
) -> Result<Vec<&'d Category>, TopicError> {
    let level_name = prefs
        .active_level
        .as_deref()
        .ok_or(TopicError::EmptySelection(EmptyReason::NoActiveLevel))?;
    let level =
        dataset.level(level_name).ok_or_else(|| TopicError::InvalidLevel(level_name.to_string()))?;

    let enabled: Vec<&Category> =
        level.categories.iter().filter(|c| prefs.is_category_enabled(&c.name)).collect();

    if enabled.is_empty() {
        return Err(TopicError::EmptySelection(EmptyReason::NoEnabledCategories));
    }
    Ok(enabled)
}

/// Picks a category uniformly, then a question uniformly within it.
pub fn try_draw_topic<R: Rng + ?Sized>(
    dataset: &Dataset,
    prefs: &PreferenceState,
    rng: &mut R,
) -> Result<CurrentTopic, TopicError> {
    let candidates = eligible_categories(dataset, prefs)?;
    let category = candidates
        .choose(rng)
        .ok_or(TopicError::EmptySelection(EmptyReason::NoEnabledCategories))?;

    let question = category
        .questions
        .choose(rng)
        .ok_or_else(|| TopicError::EmptySelection(EmptyReason::NoQuestions(category.name.clone())))?;

    debug!(category = %category.name, candidates = candidates.len(), "Topic drawn");
    Ok(CurrentTopic {
        category: category.name.clone(),
        question: question.clone(),
        vocabulary: category.vocabulary.clone(),
    })
}

/// Like [`try_draw_topic`], but any failure is just "no topic".
pub fn draw_random_topic<R: Rng + ?Sized>(
    dataset: &Dataset,
    prefs: &PreferenceState,
    rng: &mut R,
) -> Option<CurrentTopic> {
    match try_draw_topic(dataset, prefs, rng) {
        Ok(topic) => Some(topic),
        Err(e) => {
            debug!(reason = %e, "No topic drawn");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashSet};

    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::core::{DisplayLanguage, Level};

    fn food_dataset() -> Dataset {
        Dataset::from_json_str(
            r#"{ "Beginner": [{
                "category": "Food",
                "questions": [{ "english": "What do you eat?", "korean": "뭐 먹어요?" }],
                "vocabulary": [{ "english": "eat", "korean": "먹다" }]
            }] }"#,
        )
        .unwrap()
    }

    fn prefs(level: Option<&str>, flags: &[(&str, bool)]) -> PreferenceState {
        PreferenceState {
            active_level: level.map(str::to_string),
            category_enabled: flags.iter().map(|(n, e)| (n.to_string(), *e)).collect(),
            display_language: DisplayLanguage::LanguageA,
        }
    }

    #[test]
    fn test_draw_single_topic() {
        let dataset = food_dataset();
        let mut rng = StdRng::seed_from_u64(7);
        let topic = draw_random_topic(&dataset, &prefs(Some("Beginner"), &[("Food", true)]), &mut rng)
            .unwrap();

        assert_eq!(topic.category, "Food");
        assert_eq!(topic.question.english, "What do you eat?");
        assert_eq!(topic.question.korean, "뭐 먹어요?");
        assert_eq!(topic.vocabulary, vec![VocabularyEntry { english: "eat".into(), korean: "먹다".into() }]);
    }

    #[test]
    fn test_empty_selection_reasons() {
        let dataset = food_dataset();
        let mut rng = StdRng::seed_from_u64(1);

        let err = try_draw_topic(&dataset, &prefs(None, &[]), &mut rng).unwrap_err();
        assert!(matches!(err, TopicError::EmptySelection(EmptyReason::NoActiveLevel)));

        let err =
            try_draw_topic(&dataset, &prefs(Some("Beginner"), &[("Food", false)]), &mut rng).unwrap_err();
        assert!(matches!(err, TopicError::EmptySelection(EmptyReason::NoEnabledCategories)));

        // A stale flag for another level's category does not count.
        let stale = prefs(Some("Beginner"), &[("Food", false), ("Work", true)]);
        assert!(draw_random_topic(&dataset, &stale, &mut rng).is_none());
    }

    #[test]
    fn test_category_without_questions_is_not_a_fault() {
        let dataset = Dataset::from_levels_unchecked(vec![Level {
            name: "Beginner".into(),
            categories: vec![Category { name: "Food".into(), questions: vec![], vocabulary: vec![] }],
        }]);
        let mut rng = StdRng::seed_from_u64(3);

        let err =
            try_draw_topic(&dataset, &prefs(Some("Beginner"), &[("Food", true)]), &mut rng).unwrap_err();
        assert!(matches!(err, TopicError::EmptySelection(EmptyReason::NoQuestions(ref c)) if c == "Food"));
        assert!(err.is_empty_selection());
    }

    #[test]
    fn test_only_enabled_categories_are_drawn() {
        let dataset = Dataset::bundled().unwrap();
        let state = prefs(
            Some("Beginner"),
            &[("Food", true), ("Hobbies", false), ("Family", true)],
        );
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();

        for _ in 0..200 {
            let topic = draw_random_topic(&dataset, &state, &mut rng).unwrap();
            let category = dataset.category("Beginner", &topic.category).unwrap();
            assert!(category.questions.contains(&topic.question));
            seen.insert(topic.category);
        }

        let expected: HashSet<String> = ["Food", "Family"].iter().map(|s| s.to_string()).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let dataset = Dataset::bundled().unwrap();
        let flags: BTreeMap<String, bool> = dataset
            .level("Intermediate")
            .unwrap()
            .category_names()
            .map(|n| (n.to_string(), true))
            .collect();
        let state = PreferenceState {
            active_level: Some("Intermediate".into()),
            category_enabled: flags,
            display_language: DisplayLanguage::LanguageA,
        };

        let draw = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..10).map(|_| draw_random_topic(&dataset, &state, &mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(draw(99), draw(99));
    }
}
