//! Dominance staircase for the sweep-line solver
//!
//! Maps an end position to the best-priority fragment activated with that
//! end position. Only non-dominated entries are kept, so priorities strictly
//! increase with the key and the best entry at or below any position is the
//! one with the largest key, found with a single range query.

use std::collections::BTreeMap;
use std::ops::Bound;

use crate::core::fragment::{Position, Score};

/// A fragment activated in the staircase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activated {
    pub priority: Score,
    pub fragment: usize,
}

#[derive(Debug, Default)]
pub struct Staircase {
    entries: BTreeMap<Position, Activated>,
}

impl Staircase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry with the largest key `<= bound`, which carries the best priority
    /// among all keys `<= bound`
    pub fn best_at_or_below(&self, bound: Position) -> Option<(Position, Activated)> {
        self.entries
            .range(..=bound)
            .next_back()
            .map(|(&key, &entry)| (key, entry))
    }

    /// Entry with the overall best priority
    pub fn best(&self) -> Option<(Position, Activated)> {
        self.entries.last_key_value().map(|(&key, &entry)| (key, entry))
    }

    /// Activate `fragment` at `key` unless an entry at or below `key` already
    /// has a priority `>= priority`. Returns whether it was inserted.
    pub fn activate(&mut self, key: Position, priority: Score, fragment: usize) -> bool {
        if let Some((_, existing)) = self.best_at_or_below(key) {
            if existing.priority >= priority {
                return false;
            }
        }
        self.entries.insert(key, Activated { priority, fragment });
        self.remove_dominated(key, priority);
        true
    }

    /// Remove entries with key `> key` whose priority is `<= priority`.
    ///
    /// Stops at the first entry with a larger priority; everything past it
    /// is larger still.
    pub fn remove_dominated(&mut self, key: Position, priority: Score) -> usize {
        let dominated: Vec<Position> = self
            .entries
            .range((Bound::Excluded(key), Bound::Unbounded))
            .take_while(|(_, entry)| entry.priority <= priority)
            .map(|(&k, _)| k)
            .collect();
        for k in &dominated {
            self.entries.remove(k);
        }
        dominated.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, Activated)> + '_ {
        self.entries.iter().map(|(&key, &entry)| (key, entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys_and_priorities(staircase: &Staircase) -> Vec<(Position, Score)> {
        staircase.iter().map(|(k, e)| (k, e.priority)).collect()
    }

    #[test]
    fn test_empty_queries() {
        let staircase = Staircase::new();
        assert!(staircase.is_empty());
        assert_eq!(staircase.best_at_or_below(100), None);
        assert_eq!(staircase.best(), None);
    }

    #[test]
    fn test_activate_rejects_dominated() {
        let mut staircase = Staircase::new();
        assert!(staircase.activate(5, 10, 0));
        // later key, not better
        assert!(!staircase.activate(8, 10, 1));
        assert!(!staircase.activate(9, 3, 2));
        // same key, worse
        assert!(!staircase.activate(5, 9, 3));
        assert_eq!(keys_and_priorities(&staircase), vec![(5, 10)]);
    }

    #[test]
    fn test_activate_replaces_same_key() {
        let mut staircase = Staircase::new();
        staircase.activate(5, 10, 0);
        assert!(staircase.activate(5, 11, 1));
        assert_eq!(staircase.len(), 1);
        assert_eq!(staircase.best().unwrap().1.fragment, 1);
    }

    #[test]
    fn test_activate_prunes_later_entries() {
        let mut staircase = Staircase::new();
        staircase.activate(10, 1, 0);
        staircase.activate(20, 5, 1);
        staircase.activate(30, 8, 2);
        staircase.activate(40, 20, 3);
        assert!(staircase.activate(15, 8, 4));
        assert_eq!(keys_and_priorities(&staircase), vec![(10, 1), (15, 8), (40, 20)]);
    }

    #[test]
    fn test_remove_dominated_stops_at_better_entry() {
        let mut staircase = Staircase::new();
        staircase.activate(1, 1, 0);
        staircase.activate(2, 2, 1);
        staircase.activate(3, 7, 2);
        staircase.activate(4, 9, 3);
        assert_eq!(staircase.remove_dominated(1, 5), 1);
        assert_eq!(keys_and_priorities(&staircase), vec![(1, 1), (3, 7), (4, 9)]);
        assert_eq!(staircase.remove_dominated(4, 100), 0);
    }

    #[test]
    fn test_best_at_or_below() {
        let mut staircase = Staircase::new();
        staircase.activate(10, 1, 0);
        staircase.activate(20, 4, 1);
        assert_eq!(staircase.best_at_or_below(9), None);
        assert_eq!(staircase.best_at_or_below(10).unwrap().1.fragment, 0);
        assert_eq!(staircase.best_at_or_below(19).unwrap().1.fragment, 0);
        assert_eq!(staircase.best_at_or_below(25).unwrap().1.fragment, 1);
        assert_eq!(staircase.best().unwrap(), (20, Activated { priority: 4, fragment: 1 }));
    }

    #[test]
    fn test_priorities_strictly_increase() {
        let mut staircase = Staircase::new();
        let inserts = [(7, 3), (2, 5), (9, 4), (4, 1), (12, 6), (3, 6), (15, 2)];
        for (i, &(key, priority)) in inserts.iter().enumerate() {
            staircase.activate(key, priority, i);
        }
        let pairs = keys_and_priorities(&staircase);
        for w in pairs.windows(2) {
            assert!(w[0].0 < w[1].0);
            assert!(w[0].1 < w[1].1);
        }
        assert_eq!(pairs, vec![(2, 5), (3, 6)]);
    }
}
