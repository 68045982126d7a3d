//! Best known arrival time per physical configuration.
//!
//! Entries are created on first admission and only ever lowered. All
//! access goes through `&mut self` from the single search loop, so a
//! lookup and the update that follows it can never interleave with
//! another candidate's.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::state::ConfigKey;

#[derive(Debug, Default)]
pub struct VisitedRegistry {
    best: HashMap<ConfigKey, f64>,
}

impl VisitedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, key: &ConfigKey) -> Option<f64> {
        self.best.get(key).copied()
    }

    /// Record `time` for `key` if it beats the stored time.
    ///
    /// Returns whether the entry changed. Equal times leave it alone.
    pub fn update(&mut self, key: ConfigKey, time: f64) -> bool {
        match self.best.entry(key) {
            Entry::Occupied(mut entry) if time < *entry.get() => {
                entry.insert(time);
                true
            }
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(time);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}
