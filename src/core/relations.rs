//! Relation identifiers mapped to the time they were last seen.
//!
//! The map is computed in bulk by a collector pass and installed whole.
//! Readers get an `Arc` to the installed snapshot, never a half-written map.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::util::clock::Timestamp;

/// Relation id to last-seen timestamp.
pub type RelationMap = HashMap<String, Timestamp>;

/// Lock-guarded slot holding the current [`RelationMap`] snapshot.
#[derive(Debug, Default)]
pub struct RelationStore {
    current: Mutex<Arc<RelationMap>>,
}

impl RelationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The installed snapshot.
    pub fn get(&self) -> Arc<RelationMap> {
        Arc::clone(&self.current.lock())
    }

    /// Replace the whole map.
    pub fn set(&self, relations: RelationMap) {
        let relations = Arc::new(relations);
        let previous = std::mem::replace(&mut *self.current.lock(), relations);
        // Free the old map outside the critical section.
        drop(previous);
    }
}
