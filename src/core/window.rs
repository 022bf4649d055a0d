//! Gap-bounded predecessor queries for the sweep-line solver
//!
//! With a bound on gap widths a predecessor must end inside a window before
//! the fragment in both dimensions, so a far endpoint with a high priority
//! must not hide a nearer one. Every activated endpoint is kept in a range
//! maximum tree over the end positions in the other dimension; endpoints
//! that fall out of the window in the presort dimension are cleared as the
//! sweep advances.

use std::collections::VecDeque;

use crate::core::dominance::Activated;
use crate::core::fragment::{Dimension, Fragment, Position, Score};

/// Left operand wins ties
#[inline]
fn better(left: Option<Activated>, right: Option<Activated>) -> Option<Activated> {
    match (left, right) {
        (Some(l), Some(r)) => Some(if r.priority > l.priority { r } else { l }),
        (l, None) => l,
        (None, r) => r,
    }
}

/// Bottom-up segment tree answering the best priority in a slot range
#[derive(Debug, Clone)]
pub struct RangeMax {
    slots: usize,
    /// Leaf count, a power of two
    size: usize,
    nodes: Vec<Option<Activated>>,
}

impl RangeMax {
    pub fn new(slots: usize) -> Self {
        let size = slots.next_power_of_two();
        Self {
            slots,
            size,
            nodes: vec![None; 2 * size],
        }
    }

    pub fn len(&self) -> usize {
        self.slots
    }

    pub fn is_empty(&self) -> bool {
        self.slots == 0
    }

    /// Set or clear `slot`
    pub fn set(&mut self, slot: usize, value: Option<Activated>) {
        let mut node = slot + self.size;
        self.nodes[node] = value;
        while node > 1 {
            node /= 2;
            self.nodes[node] = better(self.nodes[2 * node], self.nodes[2 * node + 1]);
        }
    }

    /// Best entry in slots `from..to`; on equal priorities the lowest slot
    pub fn query(&self, from: usize, to: usize) -> Option<Activated> {
        let (mut lo, mut hi) = (from + self.size, to + self.size);
        let (mut left, mut right) = (None, None);
        while lo < hi {
            if lo % 2 == 1 {
                left = better(left, self.nodes[lo]);
                lo += 1;
            }
            if hi % 2 == 1 {
                hi -= 1;
                right = better(self.nodes[hi], right);
            }
            lo /= 2;
            hi /= 2;
        }
        better(left, right)
    }
}

/// Activated endpoints reachable within `width` positions in both dimensions
#[derive(Debug)]
pub struct GapWindow {
    width: Position,
    presort: Dimension,
    other: Dimension,
    /// End positions in the other dimension, ascending by slot
    slot_ends: Vec<Position>,
    /// Slot of each fragment
    slots: Vec<usize>,
    tree: RangeMax,
    /// Activated fragments in activation order, which is ascending end in
    /// the presort dimension
    active: VecDeque<usize>,
    best: Option<(Position, Activated)>,
}

impl GapWindow {
    pub fn new(fragments: &[Fragment], presort: Dimension, width: Position) -> Self {
        let other = presort.other();
        let mut order: Vec<usize> = (0..fragments.len()).collect();
        order.sort_by_key(|&i| (fragments[i].end_in(other), i));

        let mut slots = vec![0; fragments.len()];
        for (slot, &i) in order.iter().enumerate() {
            slots[i] = slot;
        }
        Self {
            width,
            presort,
            other,
            slot_ends: order.iter().map(|&i| fragments[i].end_in(other)).collect(),
            slots,
            tree: RangeMax::new(fragments.len()),
            active: VecDeque::new(),
            best: None,
        }
    }

    pub fn width(&self) -> Position {
        self.width
    }

    /// Make `fragment` available to later queries
    pub fn activate(&mut self, fragments: &[Fragment], fragment: usize, priority: Score) {
        let entry = Activated { priority, fragment };
        self.tree.set(self.slots[fragment], Some(entry));
        self.active.push_back(fragment);

        let key = fragments[fragment].end_in(self.other);
        let replaces = match self.best {
            None => true,
            Some((best_key, best)) => {
                priority > best.priority || (priority == best.priority && key < best_key)
            }
        };
        if replaces {
            self.best = Some((key, entry));
        }
    }

    /// Best activated fragment ending within the window before `index`.
    ///
    /// Queries must come in ascending start order in the presort dimension.
    pub fn best_before(&mut self, fragments: &[Fragment], index: usize) -> Option<usize> {
        let fragment = &fragments[index];
        let start = fragment.start_in(self.presort);
        while let Some(&front) = self.active.front() {
            if fragments[front].end_in(self.presort) + self.width + 1 >= start {
                break;
            }
            self.tree.set(self.slots[front], None);
            self.active.pop_front();
        }

        let start_other = fragment.start_in(self.other);
        if start_other == 0 {
            return None;
        }
        let lowest = start_other.saturating_sub(self.width + 1);
        let from = self.slot_ends.partition_point(|&end| end < lowest);
        let to = self.slot_ends.partition_point(|&end| end < start_other);
        self.tree.query(from, to).map(|entry| entry.fragment)
    }

    /// Best priority activated so far, regardless of the window
    pub fn best(&self) -> Option<usize> {
        self.best.map(|(_, entry)| entry.fragment)
    }

    /// Number of endpoints currently inside the window
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fragment::FragmentTable;

    fn entry(priority: Score, fragment: usize) -> Option<Activated> {
        Some(Activated { priority, fragment })
    }

    #[test]
    fn test_range_max_queries() {
        let mut tree = RangeMax::new(5);
        assert_eq!(tree.query(0, 5), None);
        tree.set(0, entry(3, 0));
        tree.set(2, entry(9, 2));
        tree.set(4, entry(5, 4));
        assert_eq!(tree.query(0, 5), entry(9, 2));
        assert_eq!(tree.query(3, 5), entry(5, 4));
        assert_eq!(tree.query(0, 2), entry(3, 0));
        assert_eq!(tree.query(1, 2), None);
        assert_eq!(tree.query(2, 2), None);

        tree.set(2, None);
        assert_eq!(tree.query(0, 5), entry(5, 4));
    }

    #[test]
    fn test_range_max_ties_take_lowest_slot() {
        let mut tree = RangeMax::new(7);
        for slot in [6, 1, 3] {
            tree.set(slot, entry(4, slot));
        }
        assert_eq!(tree.query(0, 7), entry(4, 1));
        assert_eq!(tree.query(2, 7), entry(4, 3));
    }

    #[test]
    fn test_window_skips_distant_better_endpoint() {
        let mut table = FragmentTable::new(3);
        table.add(0, 1, 0, 1, 3).unwrap();
        table.add(50, 51, 50, 51, 2).unwrap();
        table.add(60, 61, 60, 61, 2).unwrap();
        let fragments = table.as_slice();

        let mut window = GapWindow::new(fragments, Dimension::Second, 20);
        window.activate(fragments, 0, 3);
        assert_eq!(window.best_before(fragments, 1), None);
        window.activate(fragments, 1, 2);
        assert_eq!(window.best_before(fragments, 2), Some(1));
        // the first endpoint left the window
        assert_eq!(window.len(), 1);
        assert_eq!(window.best(), Some(0));
    }
}
