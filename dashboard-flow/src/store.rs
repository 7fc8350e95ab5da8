use dashmap::DashMap;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use crate::record::Record;

struct Slot<R> {
    position: usize,
    record: R,
}

/// In-memory store of one record kind.
///
/// Records keep the order they were first inserted in, so listings match the
/// seed order. Cloning the store shares the underlying map.
pub struct InMemoryRecordStore<R: Record> {
    records: Arc<DashMap<String, Slot<R>>>,
    next_position: Arc<AtomicUsize>,
}

impl<R: Record> Clone for InMemoryRecordStore<R> {
    fn clone(&self) -> Self {
        Self {
            records: self.records.clone(),
            next_position: self.next_position.clone(),
        }
    }
}

impl<R: Record> InMemoryRecordStore<R> {
    pub fn new() -> Self {
        Self {
            records: Arc::new(DashMap::new()),
            next_position: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = R>) -> Self {
        let store = Self::new();
        for record in records {
            store.insert(record);
        }
        store
    }

    /// Insert or replace a record. A replaced record keeps its list position.
    pub fn insert(&self, record: R) -> Option<R> {
        let id = record.id().to_string();
        if let Some(mut slot) = self.records.get_mut(&id) {
            return Some(std::mem::replace(&mut slot.record, record));
        }
        let position = self.next_position.fetch_add(1, Ordering::Relaxed);
        self.records
            .insert(id, Slot { position, record })
            .map(|slot| slot.record)
    }

    pub fn get(&self, id: &str) -> Option<R> {
        self.records.get(id).map(|slot| slot.record.clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Apply `f` to the record in place, returning its result, or `None` if
    /// the record does not exist.
    pub fn update<T>(&self, id: &str, f: impl FnOnce(&mut R) -> T) -> Option<T> {
        self.records.get_mut(id).map(|mut slot| f(&mut slot.record))
    }

    pub fn remove(&self, id: &str) -> Option<R> {
        self.records.remove(id).map(|(_, slot)| slot.record)
    }

    /// All records in insertion order
    pub fn list(&self) -> Vec<R> {
        let mut slots: Vec<(usize, R)> = self
            .records
            .iter()
            .map(|entry| (entry.position, entry.record.clone()))
            .collect();
        slots.sort_by_key(|(position, _)| *position);
        slots.into_iter().map(|(_, record)| record).collect()
    }

    /// Records matching the search text, in insertion order
    pub fn search(&self, needle: &str) -> Vec<R> {
        self.list()
            .into_iter()
            .filter(|record| record.matches(needle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<R: Record> Default for InMemoryRecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}
