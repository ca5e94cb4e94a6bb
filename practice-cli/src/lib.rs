pub mod drill;
pub mod json_store;

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use language_utils::CategoryId;
use practice_engine::{PracticeFilters, ScoringRules};

pub use json_store::JsonFileStore;

/// Options shared by every command that builds a session.
#[derive(Args, Debug, Clone, Default)]
pub struct PracticeOptions {
    /// Only practice items in this category (repeatable)
    #[arg(short, long = "category")]
    pub categories: Vec<String>,

    /// Leave words out
    #[arg(long)]
    pub no_words: bool,

    /// Leave verbs out
    #[arg(long)]
    pub no_verbs: bool,

    /// JSON file overriding the default scoring rules
    #[arg(long)]
    pub rules: Option<PathBuf>,
}

impl PracticeOptions {
    pub fn filters(&self) -> PracticeFilters {
        PracticeFilters {
            category_ids: self.categories.iter().map(|c| CategoryId::new(c)).collect(),
            include_words: !self.no_words,
            include_verbs: !self.no_verbs,
        }
    }

    pub async fn load_rules(&self) -> anyhow::Result<ScoringRules> {
        let Some(path) = &self.rules else {
            return Ok(ScoringRules::default());
        };
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        ScoringRules::from_json(&json).with_context(|| format!("Bad rules in {}", path.display()))
    }
}
