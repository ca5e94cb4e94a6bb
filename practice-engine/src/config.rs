use serde::{Deserialize, Serialize};

/// Tunables for scoring, leveling and selection.
///
/// The defaults are the values the app ships with; a partial JSON document
/// overrides only the fields it names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringRules {
    /// Subtracted from the learning score of items that were never practiced.
    pub unpracticed_offset: i64,
    /// One point of decay per full period elapsed since the last practice.
    pub decay_period_hours: i64,
    pub bonus_per_practice: i64,
    pub max_practice_bonus: i64,
    pub correct_reward: u32,
    pub incorrect_penalty: u32,
    /// How many of the highest-priority items `select_next` chooses among.
    pub selection_window: usize,
    /// Learning score lower bounds for levels 1 through 4.
    pub level_thresholds: [u32; 4],
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            unpracticed_offset: 1000,
            decay_period_hours: 24,
            bonus_per_practice: 2,
            max_practice_bonus: 20,
            correct_reward: 5,
            incorrect_penalty: 3,
            selection_window: 5,
            level_thresholds: [5, 15, 30, 50],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not parse scoring rules: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid scoring rules: {0}")]
    Invalid(&'static str),
}

impl ScoringRules {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let rules: ScoringRules = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.decay_period_hours <= 0 {
            return Err(ConfigError::Invalid("decayPeriodHours must be positive"));
        }
        if self.selection_window == 0 {
            return Err(ConfigError::Invalid("selectionWindow must be at least 1"));
        }
        if self.bonus_per_practice < 0 || self.max_practice_bonus < 0 {
            return Err(ConfigError::Invalid("practice bonus must not be negative"));
        }
        if self.level_thresholds.windows(2).any(|w| w[0] > w[1]) {
            return Err(ConfigError::Invalid("levelThresholds must be ascending"));
        }
        Ok(())
    }
}
