//! Capacity-bounded multiset of the best scores seen so far

use std::collections::BTreeMap;

use crate::core::fragment::Score;

/// Keeps the `capacity` largest scores inserted, evicting the minimum
#[derive(Debug, Clone)]
pub struct BestK {
    capacity: usize,
    counts: BTreeMap<Score, usize>,
    len: usize,
}

impl BestK {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            counts: BTreeMap::new(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Smallest retained score
    pub fn min(&self) -> Option<Score> {
        self.counts.keys().next().copied()
    }

    /// Insert a score. When full, the score replaces the current minimum
    /// if it is larger and is dropped otherwise.
    pub fn insert(&mut self, score: Score) {
        if self.capacity == 0 {
            return;
        }
        if self.len == self.capacity {
            match self.min() {
                Some(min) if score > min => self.remove_one(min),
                _ => return,
            }
        }
        *self.counts.entry(score).or_insert(0) += 1;
        self.len += 1;
    }

    fn remove_one(&mut self, score: Score) {
        if let Some(count) = self.counts.get_mut(&score) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&score);
            }
            self.len -= 1;
        }
    }
}
