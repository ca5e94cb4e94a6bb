//! A store backed by one JSON file holding an array of word and verb records.

use std::path::PathBuf;

use practice_engine::{
    ItemKey, ItemRecord, ItemStore, LearningState, PracticeFilters, ScoreUpdate, StoreError,
};

#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub async fn load(&self) -> Result<Vec<ItemRecord>, StoreError> {
        let contents = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Replace the file's contents via a sibling temp file and a rename.
    pub async fn save(&self, records: &[ItemRecord]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

impl ItemStore for JsonFileStore {
    async fn fetch_eligible_items(
        &self,
        filters: &PracticeFilters,
    ) -> Result<Vec<ItemRecord>, StoreError> {
        let mut records = self.load().await?;
        records.retain(|record| filters.admits(record));
        log::debug!(
            "{} records in {} match the filters",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    async fn persist_outcome(&self, key: &ItemKey, update: &ScoreUpdate) -> Result<(), StoreError> {
        let mut records = self.load().await?;
        let record = records
            .iter_mut()
            .find(|record| record.key() == *key)
            .ok_or_else(|| StoreError::UnknownItem(key.clone()))?;
        record.set_learning_state(&LearningState::from(*update));
        self.save(&records).await
    }
}
