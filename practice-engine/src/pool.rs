use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::config::ScoringRules;
use crate::item::{ItemKey, ItemRecord, PracticeItem};
use crate::random::Chooser;
use crate::score::{LearningState, Priority};
use crate::store::ScoreUpdate;

#[derive(Clone, Debug)]
struct PoolEntry {
    item: PracticeItem,
    priority: Priority,
}

/// The items eligible for the current session, kept in practice order
/// (lowest effective score first).
#[derive(Clone, Debug)]
pub struct ItemPool {
    entries: Vec<PoolEntry>,
    rules: ScoringRules,
}

impl ItemPool {
    pub fn new(rules: ScoringRules) -> Self {
        Self {
            entries: Vec::new(),
            rules,
        }
    }

    /// Project `records` into practice items and sort them as of `now`.
    /// Records are assumed to be filtered already. Ties keep the store's
    /// order. A record whose key was already seen is dropped.
    pub fn from_records(
        records: impl IntoIterator<Item = ItemRecord>,
        rules: ScoringRules,
        now: DateTime<Utc>,
    ) -> Self {
        let mut seen = BTreeSet::new();
        let entries = records
            .into_iter()
            .filter(|record| {
                let fresh = seen.insert(record.key());
                if !fresh {
                    log::warn!("Dropping duplicate record {}", record.key());
                }
                fresh
            })
            .map(|record| {
                let item = PracticeItem::from(record);
                let priority = rules.priority(&item.learning, now);
                PoolEntry { item, priority }
            })
            .collect();

        let mut pool = Self { entries, rules };
        pool.sort();
        pool
    }

    pub fn rules(&self) -> &ScoringRules {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Items in practice order.
    pub fn iter(&self) -> impl Iterator<Item = &PracticeItem> {
        self.entries.iter().map(|entry| &entry.item)
    }

    /// Items paired with the priority they were last sorted by.
    pub fn iter_with_priority(&self) -> impl Iterator<Item = (&PracticeItem, Priority)> {
        self.entries.iter().map(|entry| (&entry.item, entry.priority))
    }

    pub fn get(&self, key: &ItemKey) -> Option<&PracticeItem> {
        self.position(key).map(|index| &self.entries[index].item)
    }

    fn position(&self, key: &ItemKey) -> Option<usize> {
        self.entries.iter().position(|entry| {
            entry.item.item_type() == key.item_type && entry.item.id == key.id
        })
    }

    /// A uniformly random pick among the highest-priority items, or `None`
    /// for an empty pool. The window keeps the same item from coming up
    /// every time without giving up the ordering.
    pub fn select_next(&self, chooser: &mut impl Chooser) -> Option<&PracticeItem> {
        if self.entries.is_empty() {
            return None;
        }
        let window = self.rules.selection_window.max(1).min(self.entries.len());
        let index = chooser.index(window);
        self.entries.get(index).map(|entry| &entry.item)
    }

    /// Record an answer for `key` and re-sort the whole pool as of `now`.
    ///
    /// Returns the previous state and the update to persist, or `None` when
    /// the item is not in the pool.
    pub fn apply_answer_outcome(
        &mut self,
        key: &ItemKey,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> Option<(LearningState, ScoreUpdate)> {
        let index = self.position(key)?;
        let entry = &mut self.entries[index];
        let previous = entry.item.learning;
        entry.item.learning = self.rules.apply_outcome(&previous, is_correct, now);

        let update = ScoreUpdate {
            learning_score: entry.item.learning.learning_score,
            last_practiced: now,
            practice_count: entry.item.learning.practice_count,
        };

        // Time moved for every item, not just this one.
        self.resort(now);
        Some((previous, update))
    }

    /// Overwrite the learning state of `key` without re-sorting. Returns
    /// whether the item is in the pool.
    pub fn set_learning(&mut self, key: &ItemKey, state: LearningState) -> bool {
        let Some(index) = self.position(key) else {
            return false;
        };
        self.entries[index].item.learning = state;
        true
    }

    /// Recompute every priority as of `now` and sort.
    pub fn resort(&mut self, now: DateTime<Utc>) {
        for entry in &mut self.entries {
            entry.priority = self.rules.priority(&entry.item.learning, now);
        }
        self.sort();
    }

    fn sort(&mut self) {
        // stable: ties keep their current relative order
        self.entries.sort_by_key(|entry| entry.priority);
    }
}
