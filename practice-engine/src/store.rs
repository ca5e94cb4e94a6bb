//! The seam to the persistence layer that owns word and verb records.

use std::cell::{Cell, RefCell};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::item::{ItemKey, ItemRecord, PracticeFilters};
use crate::score::LearningState;

/// The fields written back after an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreUpdate {
    pub learning_score: u32,
    pub last_practiced: DateTime<Utc>,
    pub practice_count: u32,
}

impl From<ScoreUpdate> for LearningState {
    fn from(update: ScoreUpdate) -> Self {
        LearningState {
            learning_score: update.learning_score,
            last_practiced: Some(update.last_practiced),
            practice_count: update.practice_count,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("malformed store data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0} is not in the store")]
    UnknownItem(ItemKey),
}

/// Read and write access to practice records.
///
/// Sessions are single-threaded and own their store handle, so the futures
/// are not required to be `Send`.
#[allow(async_fn_in_trait)]
pub trait ItemStore {
    /// All records admitted by `filters`.
    async fn fetch_eligible_items(
        &self,
        filters: &PracticeFilters,
    ) -> Result<Vec<ItemRecord>, StoreError>;

    async fn persist_outcome(&self, key: &ItemKey, update: &ScoreUpdate) -> Result<(), StoreError>;
}

impl<S: ItemStore + ?Sized> ItemStore for &S {
    async fn fetch_eligible_items(
        &self,
        filters: &PracticeFilters,
    ) -> Result<Vec<ItemRecord>, StoreError> {
        (**self).fetch_eligible_items(filters).await
    }

    async fn persist_outcome(&self, key: &ItemKey, update: &ScoreUpdate) -> Result<(), StoreError> {
        (**self).persist_outcome(key, update).await
    }
}

/// An in-process store. Failures can be switched on to exercise the
/// session's degraded paths.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RefCell<Vec<ItemRecord>>,
    fail_fetches: Cell<bool>,
    fail_writes: Cell<bool>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new(records: Vec<ItemRecord>) -> Self {
        Self {
            records: RefCell::new(records),
            ..Self::default()
        }
    }

    pub fn set_fail_fetches(&self, fail: bool) {
        self.fail_fetches.set(fail);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Successful writes so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn records(&self) -> Vec<ItemRecord> {
        self.records.borrow().clone()
    }

    pub fn learning_state(&self, key: &ItemKey) -> Option<LearningState> {
        self.records
            .borrow()
            .iter()
            .find(|record| record.key() == *key)
            .map(ItemRecord::learning_state)
    }
}

impl ItemStore for MemoryStore {
    async fn fetch_eligible_items(
        &self,
        filters: &PracticeFilters,
    ) -> Result<Vec<ItemRecord>, StoreError> {
        if self.fail_fetches.get() {
            return Err(StoreError::Unavailable("fetches disabled".to_string()));
        }
        Ok(self
            .records
            .borrow()
            .iter()
            .filter(|record| filters.admits(record))
            .cloned()
            .collect())
    }

    async fn persist_outcome(&self, key: &ItemKey, update: &ScoreUpdate) -> Result<(), StoreError> {
        if self.fail_writes.get() {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        let mut records = self.records.borrow_mut();
        let record = records
            .iter_mut()
            .find(|record| record.key() == *key)
            .ok_or_else(|| StoreError::UnknownItem(key.clone()))?;
        record.set_learning_state(&LearningState::from(*update));
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}
