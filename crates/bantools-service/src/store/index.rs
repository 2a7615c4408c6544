//! Active record index
//!
//! Readers take a cheap `Arc` snapshot; a reload builds a complete new map
//! and swaps it in, so nobody ever sees a half-rebuilt index.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use bantools_core::{name_key, RestrictionRecord};

/// Snapshot-swapped map of active records keyed by lowercase name
pub struct ActiveIndex<R> {
    records: RwLock<Arc<HashMap<String, R>>>,
}

impl<R: RestrictionRecord> ActiveIndex<R> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Arc::new(HashMap::new())),
        }
    }

    /// Replace the whole index
    pub fn replace(&self, records: HashMap<String, R>) {
        *self.records.write() = Arc::new(records);
    }

    /// Current contents; unaffected by later swaps
    pub fn snapshot(&self) -> Arc<HashMap<String, R>> {
        Arc::clone(&*self.records.read())
    }

    pub fn get(&self, name: &str) -> Option<R> {
        self.records.read().get(&name_key(name)).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl<R: RestrictionRecord> Default for ActiveIndex<R> {
    fn default() -> Self {
        Self::new()
    }
}
