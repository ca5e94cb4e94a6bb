use language_utils::text_cleanup::answers_match;

use crate::question::Prompt;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Grade {
    Correct,
    /// The learner typed the plural form of a word; accepted as correct.
    CorrectPlural,
    Incorrect,
}

impl Grade {
    pub fn is_correct(self) -> bool {
        !matches!(self, Grade::Incorrect)
    }
}

impl Prompt<'_> {
    /// Check a typed answer. Case, surrounding whitespace and typographic
    /// quote variants are ignored.
    pub fn grade(&self, answer: &str) -> Grade {
        if answers_match(answer, self.expected_answer) {
            Grade::Correct
        } else if self
            .item
            .plural_form()
            .is_some_and(|plural| answers_match(answer, plural))
        {
            Grade::CorrectPlural
        } else {
            Grade::Incorrect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemDetails, ItemId, PracticeItem};
    use crate::question::{AudioPlayLimit, Direction, QuestionConfig};
    use crate::score::{LearningState, Level};
    use language_utils::LanguageDescriptor;

    fn chien() -> PracticeItem {
        PracticeItem {
            id: ItemId("w1".to_string()),
            details: ItemDetails::Word {
                plural_form: Some("les chiens".to_string()),
                example_sentence: None,
            },
            target_text: "le chien".to_string(),
            translation_text: "the dog".to_string(),
            audio_url: None,
            learning: LearningState::default(),
            source_language: LanguageDescriptor::new("en", "English"),
            target_language: LanguageDescriptor::new("fr", "French"),
            categories: Default::default(),
        }
    }

    fn config(direction: Direction) -> QuestionConfig {
        QuestionConfig {
            level: Level::MIN,
            direction,
            show_examples: false,
            show_plural_form: false,
            audio_auto_play: true,
            audio_play_limit: AudioPlayLimit::Unlimited,
        }
    }

    #[test]
    fn grades_translation_ignoring_case_and_space() {
        let item = chien();
        let prompt = Prompt::new(&item, &config(Direction::TargetToSource), false);
        assert_eq!(prompt.grade("  The Dog "), Grade::Correct);
        assert_eq!(prompt.grade("the cat"), Grade::Incorrect);
        assert_eq!(prompt.grade(""), Grade::Incorrect);
    }

    #[test]
    fn accepts_plural_form() {
        let item = chien();
        let prompt = Prompt::new(&item, &config(Direction::SourceToTarget), false);
        assert_eq!(prompt.grade("le chien"), Grade::Correct);
        assert_eq!(prompt.grade("Les Chiens"), Grade::CorrectPlural);
        assert!(Grade::CorrectPlural.is_correct());
    }

    #[test]
    fn verbs_have_no_plural_fallback() {
        let mut item = chien();
        item.details = ItemDetails::Verb {
            is_irregular: false,
        };
        let prompt = Prompt::new(&item, &config(Direction::SourceToTarget), false);
        assert_eq!(prompt.grade("les chiens"), Grade::Incorrect);
    }
}
