use std::collections::BTreeMap;

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::audio::presents_audio_only;
use crate::clock::{Clock, SystemClock};
use crate::config::ScoringRules;
use crate::item::{ItemKey, PracticeFilters, PracticeItem};
use crate::pool::ItemPool;
use crate::question::{Prompt, QuestionConfig, generate_config};
use crate::random::{Chooser, RngChooser};
use crate::score::LearningState;
use crate::store::{ItemStore, ScoreUpdate, StoreError};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing to ask: not started, or no item matched the filters.
    Idle,
    Presenting,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStats {
    pub correct: u32,
    pub incorrect: u32,
    pub total_practiced: u32,
}

impl SessionStats {
    fn record(&mut self, is_correct: bool) {
        if is_correct {
            self.correct += 1;
        } else {
            self.incorrect += 1;
        }
        self.total_practiced += 1;
    }

    /// Fraction of answers that were correct, 0 before the first answer.
    pub fn accuracy(&self) -> f64 {
        if self.total_practiced == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.total_practiced)
    }

    /// Accuracy as a whole percentage, the way the practice screen shows it.
    pub fn accuracy_percent(&self) -> u32 {
        (self.accuracy() * 100.0).round() as u32
    }
}

/// Things the UI should hear about that don't interrupt practice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    FetchFailed { error: String },
    PersistFailed { key: ItemKey, error: String },
    /// There was nothing to present.
    SessionComplete,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no question is being presented")]
    NotPresenting,
    #[error("{0} is no longer in the pool")]
    MissingItem(ItemKey),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PresentedQuestion {
    pub key: ItemKey,
    pub config: QuestionConfig,
    /// Decided once per presentation so a re-render shows the same thing.
    pub audio_only: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnswerRecord {
    pub key: ItemKey,
    pub is_correct: bool,
    pub previous: LearningState,
    pub update: ScoreUpdate,
}

#[derive(Debug)]
pub struct PersistFailure {
    pub key: ItemKey,
    pub error: StoreError,
}

#[derive(Debug)]
pub struct SubmitReport {
    pub answer: AnswerRecord,
    /// Writes that failed during this submission. They stay queued for the
    /// next flush; the local scores are kept either way.
    pub persist_failures: Vec<PersistFailure>,
}

/// One practice session over a pool of words and verbs.
///
/// Answers are applied to the in-memory pool first and queued for the store
/// afterwards, so a slow or failing store never holds up the next question.
/// All mutating operations take `&mut self`, which keeps two submissions
/// for the same session from overlapping.
pub struct Session<S, R = RngChooser<StdRng>, C = SystemClock> {
    store: S,
    chooser: R,
    clock: C,
    rules: ScoringRules,
    filters: PracticeFilters,
    pool: ItemPool,
    current: Option<PresentedQuestion>,
    stats: SessionStats,
    /// Latest unsaved outcome per item.
    pending: BTreeMap<ItemKey, ScoreUpdate>,
    events: Vec<SessionEvent>,
}

impl<S: ItemStore> Session<S> {
    pub fn new(store: S) -> Self {
        Session::with_parts(
            store,
            RngChooser::from_os_rng(),
            SystemClock,
            ScoringRules::default(),
        )
    }
}

impl<S: ItemStore, R: Chooser, C: Clock> Session<S, R, C> {
    pub fn with_parts(store: S, chooser: R, clock: C, rules: ScoringRules) -> Self {
        Self {
            store,
            chooser,
            clock,
            pool: ItemPool::new(rules.clone()),
            rules,
            filters: PracticeFilters::default(),
            current: None,
            stats: SessionStats::default(),
            pending: BTreeMap::new(),
            events: Vec::new(),
        }
    }

    /// Swap the scoring rules. Builds a fresh session, so call it before
    /// [`Session::start`].
    pub fn with_rules(self, rules: ScoringRules) -> Self {
        Session::with_parts(self.store, self.chooser, self.clock, rules)
    }

    /// Fetch the items matching `filters` and present the first question.
    /// A failed fetch leaves the session idle with an empty pool.
    pub async fn start(&mut self, filters: PracticeFilters) -> SessionState {
        self.filters = filters;
        self.refetch().await
    }

    /// Rebuild the pool with the current filters.
    pub async fn refetch(&mut self) -> SessionState {
        // Queued writes go first, otherwise the fetch would return stale rows.
        self.flush_pending().await;
        self.current = None;

        match self.store.fetch_eligible_items(&self.filters).await {
            Ok(records) => {
                let now = self.clock.now();
                self.pool = ItemPool::from_records(records, self.rules.clone(), now);
                // The store missed these writes; the local outcome still wins.
                for (key, update) in &self.pending {
                    self.pool.set_learning(key, LearningState::from(*update));
                }
                if !self.pending.is_empty() {
                    self.pool.resort(now);
                }
                log::info!("Practice pool rebuilt with {} items", self.pool.len());
            }
            Err(error) => {
                log::error!("Failed to fetch practice items: {error}");
                self.events.push(SessionEvent::FetchFailed {
                    error: error.to_string(),
                });
                self.pool = ItemPool::new(self.rules.clone());
            }
        }

        self.present_next();
        self.state()
    }

    /// Apply an answer to the presented item and move on, then try to save
    /// every queued outcome.
    pub async fn submit_answer(&mut self, is_correct: bool) -> Result<SubmitReport, SessionError> {
        let answer = self.record_answer(is_correct)?;
        let persist_failures = self.flush_pending().await;
        Ok(SubmitReport {
            answer,
            persist_failures,
        })
    }

    /// The local half of [`Session::submit_answer`]: update the pool and the
    /// stats, queue the write, present the next question.
    pub fn record_answer(&mut self, is_correct: bool) -> Result<AnswerRecord, SessionError> {
        let key = self
            .current
            .as_ref()
            .map(|question| question.key.clone())
            .ok_or(SessionError::NotPresenting)?;

        let now = self.clock.now();
        let (previous, update) = self
            .pool
            .apply_answer_outcome(&key, is_correct, now)
            .ok_or_else(|| SessionError::MissingItem(key.clone()))?;

        self.stats.record(is_correct);
        self.pending.insert(key.clone(), update);
        self.present_next();

        Ok(AnswerRecord {
            key,
            is_correct,
            previous,
            update,
        })
    }

    /// Write queued outcomes to the store. Failed writes stay queued, except
    /// for items the store doesn't know.
    pub async fn flush_pending(&mut self) -> Vec<PersistFailure> {
        let pending = std::mem::take(&mut self.pending);
        let mut failures = Vec::new();

        for (key, update) in pending {
            let Err(error) = self.store.persist_outcome(&key, &update).await else {
                continue;
            };
            log::warn!("Failed to persist practice outcome for {key}: {error}");
            self.events.push(SessionEvent::PersistFailed {
                key: key.clone(),
                error: error.to_string(),
            });
            if !matches!(error, StoreError::UnknownItem(_)) {
                self.pending.entry(key.clone()).or_insert(update);
            }
            failures.push(PersistFailure { key, error });
        }

        failures
    }

    /// Move on without answering. Scores and stats are untouched; the same
    /// item may come up again.
    pub fn skip(&mut self) -> Result<(), SessionError> {
        let Some(current) = &self.current else {
            return Err(SessionError::NotPresenting);
        };
        log::debug!("Skipped {}", current.key);
        self.present_next();
        Ok(())
    }

    fn present_next(&mut self) {
        let Some(item) = self.pool.select_next(&mut self.chooser) else {
            self.current = None;
            self.events.push(SessionEvent::SessionComplete);
            return;
        };

        let level = self.rules.level(item.learning.learning_score);
        let config = generate_config(level, item.has_plural(), &mut self.chooser);
        let audio_only = presents_audio_only(&config, item, &mut self.chooser);
        log::debug!(
            "Presenting {} at level {level} ({:?})",
            item.key(),
            config.direction
        );

        self.current = Some(PresentedQuestion {
            key: item.key(),
            config,
            audio_only,
        });
    }

    pub fn state(&self) -> SessionState {
        if self.current.is_some() {
            SessionState::Presenting
        } else {
            SessionState::Idle
        }
    }

    pub fn current_question(&self) -> Option<&PresentedQuestion> {
        self.current.as_ref()
    }

    pub fn current_item(&self) -> Option<&PracticeItem> {
        self.current
            .as_ref()
            .and_then(|question| self.pool.get(&question.key))
    }

    pub fn current_config(&self) -> Option<&QuestionConfig> {
        self.current.as_ref().map(|question| &question.config)
    }

    pub fn prompt(&self) -> Option<Prompt<'_>> {
        let question = self.current.as_ref()?;
        let item = self.pool.get(&question.key)?;
        Some(Prompt::new(item, &question.config, question.audio_only))
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn total_items(&self) -> usize {
        self.pool.len()
    }

    pub fn pool(&self) -> &ItemPool {
        &self.pool
    }

    pub fn filters(&self) -> &PracticeFilters {
        &self.filters
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    /// Outcomes not yet confirmed by the store.
    pub fn pending_writes(&self) -> usize {
        self.pending.len()
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}
