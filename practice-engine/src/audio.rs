use crate::item::PracticeItem;
use crate::question::{AudioPlayLimit, Direction, Prompt, QuestionConfig};
use crate::random::Chooser;

/// Where the audio for a question comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioSource<'a> {
    /// An uploaded recording of the target-language text.
    Recording { url: &'a str },
    /// No recording: speak the shown text with the platform's speech
    /// synthesizer.
    Synthesized { text: &'a str, locale: &'a str },
}

impl<'a> AudioSource<'a> {
    pub fn for_prompt(prompt: &Prompt<'a>) -> Self {
        match prompt.item.audio_url.as_deref() {
            Some(url) => AudioSource::Recording { url },
            None => AudioSource::Synthesized {
                text: prompt.shown_text,
                locale: &prompt.shown_language.code,
            },
        }
    }
}

/// From level 3 up, half of the target-to-source questions about items with
/// a recording are asked by ear only.
pub fn presents_audio_only(
    config: &QuestionConfig,
    item: &PracticeItem,
    chooser: &mut impl Chooser,
) -> bool {
    config.level.value() >= 3
        && config.direction == Direction::TargetToSource
        && item.audio_url.is_some()
        && chooser.coin_flip()
}

/// Whether the audio should start on its own when the question appears.
/// Mastery-level questions make the learner ask for it.
pub fn autoplay_enabled(config: &QuestionConfig) -> bool {
    config.audio_auto_play && config.level.value() <= 3
}

/// Counts plays of one question's audio against its limit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioPlayback {
    limit: AudioPlayLimit,
    plays: u32,
}

impl AudioPlayback {
    pub fn new(config: &QuestionConfig) -> Self {
        Self {
            limit: config.audio_play_limit,
            plays: 0,
        }
    }

    pub fn can_play(&self) -> bool {
        self.limit.allows(self.plays)
    }

    /// Registers a play if one is left. Returns whether the audio may play.
    pub fn try_play(&mut self) -> bool {
        if !self.can_play() {
            return false;
        }
        self.plays += 1;
        true
    }

    pub fn plays(&self) -> u32 {
        self.plays
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemDetails, ItemId};
    use crate::random::ScriptedChooser;
    use crate::score::{LearningState, Level};
    use language_utils::LanguageDescriptor;

    fn item(audio_url: Option<&str>) -> PracticeItem {
        PracticeItem {
            id: ItemId("v1".to_string()),
            details: ItemDetails::Verb {
                is_irregular: false,
            },
            target_text: "parler".to_string(),
            translation_text: "to speak".to_string(),
            audio_url: audio_url.map(str::to_string),
            learning: LearningState::default(),
            source_language: LanguageDescriptor::new("en", "English"),
            target_language: LanguageDescriptor::new("fr", "French"),
            categories: Default::default(),
        }
    }

    fn config(level: u8, direction: Direction, limit: AudioPlayLimit) -> QuestionConfig {
        QuestionConfig {
            level: Level::new(level).unwrap(),
            direction,
            show_examples: false,
            show_plural_form: false,
            audio_auto_play: true,
            audio_play_limit: limit,
        }
    }

    #[test]
    fn audio_only_needs_level_direction_and_recording() {
        let recorded = item(Some("https://cdn.example/parler.mp3"));
        let unrecorded = item(None);
        let t2s = config(3, Direction::TargetToSource, AudioPlayLimit::Unlimited);
        let s2t = config(3, Direction::SourceToTarget, AudioPlayLimit::Unlimited);
        let low = config(2, Direction::TargetToSource, AudioPlayLimit::Unlimited);

        assert!(presents_audio_only(&t2s, &recorded, &mut ScriptedChooser::new([1])));
        assert!(!presents_audio_only(&t2s, &recorded, &mut ScriptedChooser::new([0])));
        assert!(!presents_audio_only(&s2t, &recorded, &mut ScriptedChooser::new([1])));
        assert!(!presents_audio_only(&t2s, &unrecorded, &mut ScriptedChooser::new([1])));
        assert!(!presents_audio_only(&low, &recorded, &mut ScriptedChooser::new([1])));
    }

    #[test]
    fn autoplay_stops_above_level_three() {
        for level in 0..=3 {
            let config = config(level, Direction::TargetToSource, AudioPlayLimit::Unlimited);
            assert!(autoplay_enabled(&config));
        }
        let config = config(4, Direction::TargetToSource, AudioPlayLimit::Times(1));
        assert!(!autoplay_enabled(&config));
    }

    #[test]
    fn playback_respects_limit() {
        let mut playback =
            AudioPlayback::new(&config(4, Direction::TargetToSource, AudioPlayLimit::Times(1)));
        assert!(playback.can_play());
        assert!(playback.try_play());
        assert!(!playback.can_play());
        assert!(!playback.try_play());
        assert_eq!(playback.plays(), 1);

        let mut unlimited =
            AudioPlayback::new(&config(0, Direction::TargetToSource, AudioPlayLimit::Unlimited));
        for _ in 0..10 {
            assert!(unlimited.try_play());
        }
        assert_eq!(unlimited.plays(), 10);
    }

    #[test]
    fn source_prefers_recording_then_speech_in_shown_language() {
        let recorded = item(Some("https://cdn.example/parler.mp3"));
        let t2s = config(0, Direction::TargetToSource, AudioPlayLimit::Unlimited);
        let prompt = Prompt::new(&recorded, &t2s, false);
        assert_eq!(
            AudioSource::for_prompt(&prompt),
            AudioSource::Recording {
                url: "https://cdn.example/parler.mp3"
            }
        );

        let unrecorded = item(None);
        let prompt = Prompt::new(&unrecorded, &t2s, false);
        assert_eq!(
            AudioSource::for_prompt(&prompt),
            AudioSource::Synthesized {
                text: "parler",
                locale: "fr"
            }
        );

        let s2t = config(2, Direction::SourceToTarget, AudioPlayLimit::Unlimited);
        let prompt = Prompt::new(&unrecorded, &s2t, false);
        assert_eq!(
            AudioSource::for_prompt(&prompt),
            AudioSource::Synthesized {
                text: "to speak",
                locale: "en"
            }
        );
    }
}
