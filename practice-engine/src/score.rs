use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ScoringRules;

/// The part of an item that practice changes, and the only part written back
/// to the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningState {
    pub learning_score: u32,
    pub last_practiced: Option<DateTime<Utc>>,
    pub practice_count: u32,
}

impl LearningState {
    pub fn never_practiced(learning_score: u32) -> Self {
        Self {
            learning_score,
            last_practiced: None,
            practice_count: 0,
        }
    }
}

/// Sort key for the pool. Lower sorts first and is practiced sooner.
///
/// Never-practiced items always come before practiced ones, whatever their
/// numeric scores are. Within each group the effective score decides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Unpracticed(i64),
    Practiced(i64),
}

impl Priority {
    /// The numeric effective score, e.g. `learning_score - 1000` for an item
    /// that was never practiced.
    pub fn effective_score(self) -> i64 {
        match self {
            Priority::Unpracticed(score) | Priority::Practiced(score) => score,
        }
    }
}

/// Difficulty tier 0..=4 derived from the learning score.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: Level = Level(0);
    pub const MAX: Level = Level(4);

    pub fn new(value: u8) -> Option<Self> {
        (value <= Self::MAX.0).then_some(Level(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Level::new(value).ok_or_else(|| format!("level {value} is out of range 0..=4"))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ScoringRules {
    pub fn practice_bonus(&self, practice_count: u32) -> i64 {
        (i64::from(practice_count) * self.bonus_per_practice).min(self.max_practice_bonus)
    }

    /// Whole decay periods between `last_practiced` and `now`. A timestamp in
    /// the future yields a negative decay, which only delays the item.
    pub fn decay(&self, last_practiced: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        let period_ms = self.decay_period_hours.max(1) * 3_600_000;
        (now - last_practiced).num_milliseconds().div_euclid(period_ms)
    }

    pub fn priority(&self, state: &LearningState, now: DateTime<Utc>) -> Priority {
        let score = i64::from(state.learning_score);
        match state.last_practiced {
            None => Priority::Unpracticed(score - self.unpracticed_offset),
            Some(last_practiced) => Priority::Practiced(
                score - self.decay(last_practiced, now) + self.practice_bonus(state.practice_count),
            ),
        }
    }

    pub fn effective_score(&self, state: &LearningState, now: DateTime<Utc>) -> i64 {
        self.priority(state, now).effective_score()
    }

    pub fn level(&self, learning_score: u32) -> Level {
        let reached = self
            .level_thresholds
            .iter()
            .take_while(|threshold| learning_score >= **threshold)
            .count();
        Level(reached as u8)
    }

    /// The state after one answer. The score never drops below zero.
    pub fn apply_outcome(
        &self,
        state: &LearningState,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> LearningState {
        let learning_score = if is_correct {
            state.learning_score.saturating_add(self.correct_reward)
        } else {
            state.learning_score.saturating_sub(self.incorrect_penalty)
        };
        LearningState {
            learning_score,
            last_practiced: Some(now),
            practice_count: state.practice_count.saturating_add(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap()
    }

    fn practiced(score: u32, hours_ago: i64, count: u32) -> LearningState {
        LearningState {
            learning_score: score,
            last_practiced: Some(now() - Duration::hours(hours_ago)),
            practice_count: count,
        }
    }

    #[test]
    fn never_practiced_is_offset_by_a_thousand() {
        let rules = ScoringRules::default();
        for score in [0, 1, 17, 999, 5000] {
            let state = LearningState::never_practiced(score);
            assert_eq!(rules.effective_score(&state, now()), i64::from(score) - 1000);
        }
    }

    #[test]
    fn never_practiced_outranks_practiced_with_same_score() {
        let rules = ScoringRules::default();
        for score in [0, 10, 50, 2000] {
            let fresh = rules.priority(&LearningState::never_practiced(score), now());
            for (hours, count) in [(0, 0), (1, 0), (24 * 400, 0), (0, 100)] {
                let seen = rules.priority(&practiced(score, hours, count), now());
                assert!(fresh < seen, "score {score}, {hours}h, count {count}");
            }
        }
    }

    #[test]
    fn never_practiced_wins_even_when_arithmetic_would_invert() {
        let rules = ScoringRules::default();
        let fresh = rules.priority(&LearningState::never_practiced(3000), now());
        // Neglected for ten years, so its effective score is far below the fresh one.
        let stale = rules.priority(&practiced(0, 24 * 3650, 0), now());
        assert!(fresh.effective_score() > stale.effective_score());
        assert!(fresh < stale);
    }

    #[test]
    fn decay_counts_whole_days() {
        let rules = ScoringRules::default();
        assert_eq!(rules.effective_score(&practiced(20, 0, 0), now()), 20);
        assert_eq!(rules.effective_score(&practiced(20, 23, 0), now()), 20);
        assert_eq!(rules.effective_score(&practiced(20, 24, 0), now()), 19);
        assert_eq!(rules.effective_score(&practiced(20, 47, 0), now()), 19);
        assert_eq!(rules.effective_score(&practiced(20, 48, 0), now()), 18);
        assert_eq!(rules.effective_score(&practiced(20, 24 * 30, 0), now()), -10);
    }

    #[test]
    fn effective_score_is_non_increasing_over_time() {
        let rules = ScoringRules::default();
        let state = practiced(30, 0, 4);
        let mut previous = i64::MAX;
        for hour in 0..24 * 20 {
            let score = rules.effective_score(&state, now() + Duration::hours(hour));
            assert!(score <= previous, "score rose at hour {hour}");
            previous = score;
        }
    }

    #[test]
    fn practice_bonus_is_capped() {
        let rules = ScoringRules::default();
        for count in (0..=20).chain([100, u32::MAX]) {
            let bonus = rules.practice_bonus(count);
            assert_eq!(bonus, (2 * i64::from(count)).min(20));
            assert!(bonus <= 20);
        }
    }

    #[test]
    fn level_step_points() {
        let rules = ScoringRules::default();
        let cases = [
            (0, 0),
            (4, 0),
            (5, 1),
            (14, 1),
            (15, 2),
            (29, 2),
            (30, 3),
            (49, 3),
            (50, 4),
            (1000, 4),
        ];
        for (score, level) in cases {
            assert_eq!(rules.level(score).value(), level, "score {score}");
        }
    }

    #[test]
    fn correct_answer_adds_five() {
        let rules = ScoringRules::default();
        let state = practiced(20, 72, 4);
        let next = rules.apply_outcome(&state, true, now());
        assert_eq!(next.learning_score, 25);
        assert_eq!(next.practice_count, 5);
        assert_eq!(next.last_practiced, Some(now()));
    }

    #[test]
    fn incorrect_answer_subtracts_three() {
        let rules = ScoringRules::default();
        let next = rules.apply_outcome(&practiced(20, 72, 4), false, now());
        assert_eq!(next.learning_score, 17);
        assert_eq!(next.practice_count, 5);
    }

    #[test]
    fn score_is_floored_at_zero() {
        let rules = ScoringRules::default();
        let next = rules.apply_outcome(&LearningState::never_practiced(0), false, now());
        assert_eq!(next.learning_score, 0);
        let next = rules.apply_outcome(&LearningState::never_practiced(2), false, now());
        assert_eq!(next.learning_score, 0);
    }

    #[test]
    fn level_serializes_as_number() {
        let json = serde_json::to_string(&Level::MAX).unwrap();
        assert_eq!(json, "4");
        assert!(serde_json::from_str::<Level>("5").is_err());
    }
}
