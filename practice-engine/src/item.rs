use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use language_utils::{CategoryId, LanguageDescriptor};
use serde::{Deserialize, Serialize};

use crate::score::LearningState;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Word,
    Verb,
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemType::Word => write!(f, "word"),
            ItemType::Verb => write!(f, "verb"),
        }
    }
}

/// Record id, unique within its item type only.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies an item across both tables.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemKey {
    pub item_type: ItemType,
    pub id: ItemId,
}

impl ItemKey {
    pub fn word(id: &str) -> Self {
        Self {
            item_type: ItemType::Word,
            id: ItemId(id.to_string()),
        }
    }

    pub fn verb(id: &str) -> Self {
        Self {
            item_type: ItemType::Verb,
            id: ItemId(id.to_string()),
        }
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.item_type, self.id)
    }
}

/// A row of the `words` table, with its languages and categories joined in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRecord {
    pub id: ItemId,
    pub word: String,
    pub translation: String,
    #[serde(default)]
    pub plural_form: Option<String>,
    #[serde(default)]
    pub example_sentence: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    /// Kept signed: rows written by older clients can hold negative scores.
    #[serde(default)]
    pub learning_score: i64,
    #[serde(default)]
    pub last_practiced: Option<DateTime<Utc>>,
    #[serde(default)]
    pub practice_count: u32,
    pub source_language: LanguageDescriptor,
    pub target_language: LanguageDescriptor,
    #[serde(default)]
    pub categories: Vec<CategoryId>,
}

/// A row of the `verbs` table. Conjugation tables are managed elsewhere and
/// not needed for practice.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerbRecord {
    pub id: ItemId,
    pub infinitive: String,
    pub translation: String,
    #[serde(default)]
    pub is_irregular: bool,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub learning_score: i64,
    #[serde(default)]
    pub last_practiced: Option<DateTime<Utc>>,
    #[serde(default)]
    pub practice_count: u32,
    pub source_language: LanguageDescriptor,
    pub target_language: LanguageDescriptor,
    #[serde(default)]
    pub categories: Vec<CategoryId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ItemRecord {
    Word(WordRecord),
    Verb(VerbRecord),
}

impl ItemRecord {
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemRecord::Word(_) => ItemType::Word,
            ItemRecord::Verb(_) => ItemType::Verb,
        }
    }

    pub fn key(&self) -> ItemKey {
        let id = match self {
            ItemRecord::Word(word) => word.id.clone(),
            ItemRecord::Verb(verb) => verb.id.clone(),
        };
        ItemKey {
            item_type: self.item_type(),
            id,
        }
    }

    pub fn categories(&self) -> &[CategoryId] {
        match self {
            ItemRecord::Word(word) => &word.categories,
            ItemRecord::Verb(verb) => &verb.categories,
        }
    }

    /// The stored learning state, with negative scores clamped to zero.
    pub fn learning_state(&self) -> LearningState {
        let (score, last_practiced, practice_count) = match self {
            ItemRecord::Word(w) => (w.learning_score, w.last_practiced, w.practice_count),
            ItemRecord::Verb(v) => (v.learning_score, v.last_practiced, v.practice_count),
        };
        LearningState {
            learning_score: u32::try_from(score.max(0)).unwrap_or(u32::MAX),
            last_practiced,
            practice_count,
        }
    }

    /// Overwrite the practice fields, as a store does on write-back.
    pub fn set_learning_state(&mut self, state: &LearningState) {
        let (score, last_practiced, practice_count) = match self {
            ItemRecord::Word(w) => (
                &mut w.learning_score,
                &mut w.last_practiced,
                &mut w.practice_count,
            ),
            ItemRecord::Verb(v) => (
                &mut v.learning_score,
                &mut v.last_practiced,
                &mut v.practice_count,
            ),
        };
        *score = i64::from(state.learning_score);
        *last_practiced = state.last_practiced;
        *practice_count = state.practice_count;
    }
}

/// Which records a practice session draws from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PracticeFilters {
    /// Empty means every category, including uncategorized items.
    pub category_ids: BTreeSet<CategoryId>,
    pub include_words: bool,
    pub include_verbs: bool,
}

impl Default for PracticeFilters {
    fn default() -> Self {
        Self {
            category_ids: BTreeSet::new(),
            include_words: true,
            include_verbs: true,
        }
    }
}

impl PracticeFilters {
    pub fn admits(&self, record: &ItemRecord) -> bool {
        let type_allowed = match record.item_type() {
            ItemType::Word => self.include_words,
            ItemType::Verb => self.include_verbs,
        };
        if !type_allowed {
            return false;
        }
        self.category_ids.is_empty()
            || record
                .categories()
                .iter()
                .any(|category| self.category_ids.contains(category))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemDetails {
    Word {
        plural_form: Option<String>,
        example_sentence: Option<String>,
    },
    Verb {
        is_irregular: bool,
    },
}

/// A word or verb in the uniform shape the scheduler works with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PracticeItem {
    pub id: ItemId,
    pub details: ItemDetails,
    pub target_text: String,
    pub translation_text: String,
    pub audio_url: Option<String>,
    pub learning: LearningState,
    pub source_language: LanguageDescriptor,
    pub target_language: LanguageDescriptor,
    pub categories: BTreeSet<CategoryId>,
}

impl PracticeItem {
    pub fn item_type(&self) -> ItemType {
        match self.details {
            ItemDetails::Word { .. } => ItemType::Word,
            ItemDetails::Verb { .. } => ItemType::Verb,
        }
    }

    pub fn key(&self) -> ItemKey {
        ItemKey {
            item_type: self.item_type(),
            id: self.id.clone(),
        }
    }

    pub fn plural_form(&self) -> Option<&str> {
        match &self.details {
            ItemDetails::Word { plural_form, .. } => plural_form.as_deref(),
            ItemDetails::Verb { .. } => None,
        }
    }

    pub fn example_sentence(&self) -> Option<&str> {
        match &self.details {
            ItemDetails::Word {
                example_sentence, ..
            } => example_sentence.as_deref(),
            ItemDetails::Verb { .. } => None,
        }
    }

    pub fn has_plural(&self) -> bool {
        self.plural_form().is_some()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

impl From<ItemRecord> for PracticeItem {
    fn from(record: ItemRecord) -> Self {
        let learning = record.learning_state();
        match record {
            ItemRecord::Word(word) => PracticeItem {
                id: word.id,
                details: ItemDetails::Word {
                    plural_form: non_blank(word.plural_form),
                    example_sentence: non_blank(word.example_sentence),
                },
                target_text: word.word,
                translation_text: word.translation,
                audio_url: non_blank(word.audio_url),
                learning,
                source_language: word.source_language,
                target_language: word.target_language,
                categories: word.categories.into_iter().collect(),
            },
            ItemRecord::Verb(verb) => PracticeItem {
                id: verb.id,
                details: ItemDetails::Verb {
                    is_irregular: verb.is_irregular,
                },
                target_text: verb.infinitive,
                translation_text: verb.translation,
                audio_url: non_blank(verb.audio_url),
                learning,
                source_language: verb.source_language,
                target_language: verb.target_language,
                categories: verb.categories.into_iter().collect(),
            },
        }
    }
}
