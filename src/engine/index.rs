//! Key index: composite key to record lookup with deterministic iteration

use std::collections::HashMap;

use crate::types::*;

/// Lookup from composite key to invoice record for one side
///
/// Built in one linear pass. When a key repeats, the last row in input
/// order wins the map slot; the key list keeps first-seen order so that
/// iteration does not depend on hash ordering.
#[derive(Debug, Clone)]
pub struct KeyIndex<'a> {
    keys: Vec<CompositeKey>,
    map: HashMap<CompositeKey, &'a InvoiceRecord>,
}

impl<'a> KeyIndex<'a> {
    /// Index a record set by composite key
    pub fn build(set: &'a RecordSet) -> Self {
        let mut keys = Vec::new();
        let mut map: HashMap<CompositeKey, &InvoiceRecord> = HashMap::new();

        for record in &set.records {
            let key = record.key();
            if !map.contains_key(&key) {
                keys.push(key.clone());
            }
            // last write wins
            map.insert(key, record);
        }

        Self { keys, map }
    }

    /// Record for a key, if present
    pub fn get(&self, key: &CompositeKey) -> Option<&'a InvoiceRecord> {
        self.map.get(key).copied()
    }

    /// Whether the index holds the key
    pub fn contains(&self, key: &CompositeKey) -> bool {
        self.map.contains_key(key)
    }

    /// Keys in first-seen input order
    pub fn keys(&self) -> impl Iterator<Item = &CompositeKey> {
        self.keys.iter()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
