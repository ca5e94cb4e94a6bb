use language_utils::LanguageDescriptor;
use serde::{Deserialize, Serialize};

use crate::item::PracticeItem;
use crate::random::Chooser;
use crate::score::Level;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Show the target-language text, ask for the translation.
    TargetToSource,
    /// Show the translation, ask for the target-language text.
    SourceToTarget,
}

impl Direction {
    fn random(chooser: &mut impl Chooser) -> Self {
        if chooser.coin_flip() {
            Direction::SourceToTarget
        } else {
            Direction::TargetToSource
        }
    }
}

/// How many times the learner may play the audio for one question.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<u32>", into = "Option<u32>")]
pub enum AudioPlayLimit {
    Unlimited,
    Times(u32),
}

impl AudioPlayLimit {
    pub fn allows(self, plays_so_far: u32) -> bool {
        match self {
            AudioPlayLimit::Unlimited => true,
            AudioPlayLimit::Times(limit) => plays_so_far < limit,
        }
    }
}

impl From<Option<u32>> for AudioPlayLimit {
    fn from(limit: Option<u32>) -> Self {
        limit.map_or(AudioPlayLimit::Unlimited, AudioPlayLimit::Times)
    }
}

impl From<AudioPlayLimit> for Option<u32> {
    fn from(limit: AudioPlayLimit) -> Self {
        match limit {
            AudioPlayLimit::Unlimited => None,
            AudioPlayLimit::Times(limit) => Some(limit),
        }
    }
}

/// Presentation parameters for one question. Never stored.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionConfig {
    pub level: Level,
    pub direction: Direction,
    pub show_examples: bool,
    pub show_plural_form: bool,
    /// Always true here; the UI only honors it up to level 3. See
    /// [`crate::audio::autoplay_enabled`].
    pub audio_auto_play: bool,
    pub audio_play_limit: AudioPlayLimit,
}

/// Build the question parameters for an item at `level`.
///
/// Levels 0 and 1 always ask target-to-source; from level 2 on the
/// direction is a coin flip. The plural hint is a coin flip at levels 1 and
/// 2 (only for items that have a plural) and disappears from level 3. Level
/// 4 allows a single audio play.
pub fn generate_config(
    level: Level,
    has_plural: bool,
    chooser: &mut impl Chooser,
) -> QuestionConfig {
    let base = QuestionConfig {
        level,
        direction: Direction::TargetToSource,
        show_examples: true,
        show_plural_form: true,
        audio_auto_play: true,
        audio_play_limit: AudioPlayLimit::Unlimited,
    };

    match level.value() {
        0 => base,
        1 => QuestionConfig {
            show_examples: false,
            show_plural_form: has_plural && chooser.coin_flip(),
            ..base
        },
        2 => {
            let show_plural_form = has_plural && chooser.coin_flip();
            QuestionConfig {
                show_examples: false,
                show_plural_form,
                direction: Direction::random(chooser),
                ..base
            }
        }
        3 => QuestionConfig {
            show_examples: false,
            show_plural_form: false,
            direction: Direction::random(chooser),
            ..base
        },
        _ => QuestionConfig {
            show_examples: false,
            show_plural_form: false,
            direction: Direction::random(chooser),
            audio_play_limit: AudioPlayLimit::Times(1),
            ..base
        },
    }
}

/// What the learner sees and is expected to type, resolved from an item and
/// its config.
#[derive(Clone, Debug, PartialEq)]
pub struct Prompt<'a> {
    pub item: &'a PracticeItem,
    pub direction: Direction,
    pub shown_text: &'a str,
    pub expected_answer: &'a str,
    pub shown_language: &'a LanguageDescriptor,
    pub answer_language: &'a LanguageDescriptor,
    pub plural_hint: Option<&'a str>,
    pub example: Option<&'a str>,
    /// Text and hints are hidden; the learner only hears the item.
    pub audio_only: bool,
}

impl<'a> Prompt<'a> {
    pub fn new(item: &'a PracticeItem, config: &QuestionConfig, audio_only: bool) -> Self {
        let (shown_text, expected_answer, shown_language, answer_language) =
            match config.direction {
                Direction::TargetToSource => (
                    item.target_text.as_str(),
                    item.translation_text.as_str(),
                    &item.target_language,
                    &item.source_language,
                ),
                Direction::SourceToTarget => (
                    item.translation_text.as_str(),
                    item.target_text.as_str(),
                    &item.source_language,
                    &item.target_language,
                ),
            };

        let plural_hint = item
            .plural_form()
            .filter(|_| config.show_plural_form && !audio_only);
        let example = item
            .example_sentence()
            .filter(|_| config.show_examples && !audio_only);

        Prompt {
            item,
            direction: config.direction,
            shown_text,
            expected_answer,
            shown_language,
            answer_language,
            plural_hint,
            example,
            audio_only,
        }
    }

    /// The text to display, or `None` for an audio-only question.
    pub fn visible_text(&self) -> Option<&'a str> {
        (!self.audio_only).then_some(self.shown_text)
    }
}
