use std::collections::HashMap;

use crate::store::DocumentId;
use crate::submissions::{Moderated, SubmissionKind};

/// Ordered local copy of a collection, indexed by record id.
#[derive(Debug, Clone)]
pub struct RecordCache<K> {
    records: Vec<K>,
    index: HashMap<DocumentId, usize>,
}

impl<K> Default for RecordCache<K> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: SubmissionKind> RecordCache<K> {
    pub fn new(records: Vec<K>) -> Self {
        let mut cache = Self::default();
        cache.replace_all(records);
        cache
    }

    /// Swap in a freshly fetched collection, keeping the order it arrived in.
    pub fn replace_all(&mut self, records: Vec<K>) {
        self.index = records
            .iter()
            .enumerate()
            .map(|(position, record)| (record.id().clone(), position))
            .collect();
        self.records = records;
    }

    pub fn get(&self, id: &DocumentId) -> Option<&K> {
        self.index
            .get(id)
            .and_then(|position| self.records.get(*position))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.records.iter()
    }

    pub fn records(&self) -> &[K] {
        &self.records
    }
}

impl<K: Moderated> RecordCache<K> {
    /// Replace one record's status in place. Returns `false` when the id is not cached.
    pub fn merge_status(&mut self, id: &DocumentId, status: K::Status) -> bool {
        match self.index.get(id) {
            Some(position) => {
                self.records[*position].set_status(status);
                true
            }
            None => false,
        }
    }
}
