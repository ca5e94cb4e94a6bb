//! Simulated practice over many days, for tuning the scoring rules and for
//! checking that the schedule behaves over time.

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::clock::{Clock, ManualClock};
use crate::config::ScoringRules;
use crate::item::{PracticeFilters, PracticeItem};
use crate::question::QuestionConfig;
use crate::random::RngChooser;
use crate::score::Level;
use crate::session::{Session, SessionState};
use crate::store::ItemStore;

/// Stands in for the person answering.
pub trait Learner {
    fn answers_correctly(&mut self, item: &PracticeItem, config: &QuestionConfig) -> bool;
}

/// Gets easy questions right more often than hard ones: 50% at level 0,
/// rising by 10 points per level.
#[derive(Clone, Debug)]
pub struct SeededLearner {
    rng: ChaCha8Rng,
}

impl SeededLearner {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Learner for SeededLearner {
    fn answers_correctly(&mut self, _item: &PracticeItem, config: &QuestionConfig) -> bool {
        let p = 0.5 + 0.1 * f64::from(config.level.value());
        self.rng.random_bool(p.min(1.0))
    }
}

/// Always right or always wrong.
#[derive(Clone, Copy, Debug)]
pub struct ConstantLearner(pub bool);

impl Learner for ConstantLearner {
    fn answers_correctly(&mut self, _item: &PracticeItem, _config: &QuestionConfig) -> bool {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaySummary {
    pub day: u32,
    pub date: DateTime<Utc>,
    pub answered: u32,
    pub correct: u32,
    /// Items per level at the end of the day, index = level.
    pub level_counts: [usize; 5],
    /// Outcomes the store had not accepted by the end of the day.
    pub pending_writes: usize,
}

impl DaySummary {
    pub fn accuracy_percent(&self) -> u32 {
        if self.answered == 0 {
            return 0;
        }
        (f64::from(self.correct) / f64::from(self.answered) * 100.0).round() as u32
    }
}

/// Plays a session day by day: each day refetches the pool, answers up to
/// `answers_per_day` questions a minute apart, then jumps to the next
/// morning.
pub struct DailySimulation<S, L> {
    session: Session<S, RngChooser<ChaCha8Rng>, ManualClock>,
    clock: ManualClock,
    learner: L,
    start: DateTime<Utc>,
    day: u32,
    answers_per_day: u32,
}

impl<S: ItemStore, L: Learner> DailySimulation<S, L> {
    pub fn new(
        store: S,
        rules: ScoringRules,
        learner: L,
        start: DateTime<Utc>,
        seed: u64,
        answers_per_day: u32,
    ) -> Self {
        let clock = ManualClock::new(start);
        let session =
            Session::with_parts(store, RngChooser::seeded(seed), clock.clone(), rules);
        Self {
            session,
            clock,
            learner,
            start,
            day: 0,
            answers_per_day,
        }
    }

    pub async fn next_day(&mut self, filters: &PracticeFilters) -> DaySummary {
        let date = self.start + Duration::days(i64::from(self.day));
        self.clock.set(date);

        let mut answered = 0;
        let mut correct = 0;
        if self.session.start(filters.clone()).await == SessionState::Presenting {
            while answered < self.answers_per_day {
                let Some(is_correct) = self.answer_current() else {
                    break;
                };
                if self.session.submit_answer(is_correct).await.is_err() {
                    break;
                }
                answered += 1;
                correct += u32::from(is_correct);
                self.clock.advance(Duration::minutes(1));
            }
        }

        let summary = DaySummary {
            day: self.day,
            date,
            answered,
            correct,
            level_counts: self.level_counts(),
            pending_writes: self.session.pending_writes(),
        };
        log::debug!(
            "Day {}: {} answered, {}% correct",
            summary.day,
            summary.answered,
            summary.accuracy_percent()
        );
        self.day += 1;
        summary
    }

    fn answer_current(&mut self) -> Option<bool> {
        let item = self.session.current_item()?;
        let config = self.session.current_config()?;
        Some(self.learner.answers_correctly(item, config))
    }

    fn level_counts(&self) -> [usize; 5] {
        let rules = self.session.rules();
        let mut counts = [0; 5];
        for item in self.session.pool().iter() {
            let level: Level = rules.level(item.learning.learning_score);
            counts[usize::from(level.value())] += 1;
        }
        counts
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn session(&self) -> &Session<S, RngChooser<ChaCha8Rng>, ManualClock> {
        &self.session
    }
}
