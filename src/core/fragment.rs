//! Fragment table
//!
//! Owns the scored axis-aligned matches that are chained, together with the
//! running bounding box used for the initial/terminal gap values.
//!
//! A fragment spans the closed ranges `[start[0], end[0]]` and
//! `[start[1], end[1]]`. The solver fields (`score`, `previous`,
//! `first_in_chain`) are written by a chaining run; everything else is input.

use crate::core::error::FragmentError;

/// Position type for both dimensions
pub type Position = u64;

/// Signed score type for weights, chain scores and gap costs
pub type Score = i64;

/// One of the two coordinate dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dimension {
    First,
    #[default]
    Second,
}

impl Dimension {
    /// Index into the `[_; 2]` coordinate arrays
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Dimension::First => 0,
            Dimension::Second => 1,
        }
    }

    /// The other dimension
    #[inline]
    pub fn other(self) -> Self {
        match self {
            Dimension::First => Dimension::Second,
            Dimension::Second => Dimension::First,
        }
    }
}

/// A scored match between two coordinate spaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// Start positions (inclusive) in dimension 0 and 1
    pub start: [Position; 2],
    /// End positions (inclusive) in dimension 0 and 1
    pub end: [Position; 2],
    /// Input weight
    pub weight: Score,
    /// Best score of a chain ending in this fragment
    pub score: Score,
    /// Predecessor in the best chain, `None` if the chain starts here
    pub previous: Option<usize>,
    /// Earliest fragment of the best chain ending here
    pub first_in_chain: usize,
    /// `start[0] + start[1]`
    pub initial_gap: Score,
    /// Distance from the end point to the upper corner of the bounding box
    pub terminal_gap: Score,
}

impl Fragment {
    fn new(start: [Position; 2], end: [Position; 2], weight: Score) -> Self {
        Self {
            start,
            end,
            weight,
            score: 0,
            previous: None,
            first_in_chain: 0,
            initial_gap: 0,
            terminal_gap: 0,
        }
    }

    /// Start position in the given dimension
    #[inline]
    pub fn start_in(&self, dim: Dimension) -> Position {
        self.start[dim.index()]
    }

    /// End position in the given dimension
    #[inline]
    pub fn end_in(&self, dim: Dimension) -> Position {
        self.end[dim.index()]
    }
}

/// Append-only table of fragments
#[derive(Debug, Clone, Default)]
pub struct FragmentTable {
    fragments: Vec<Fragment>,
    largest: [Position; 2],
    gaps_filled: bool,
}

impl FragmentTable {
    /// Create an empty table with room for `capacity` fragments.
    ///
    /// The capacity is a hint only; the table grows as needed.
    pub fn new(capacity: usize) -> Self {
        Self {
            fragments: Vec::with_capacity(capacity),
            largest: [0, 0],
            gaps_filled: false,
        }
    }

    /// Append a fragment and return its index.
    ///
    /// Fails if `start > end` in either dimension. Adding a fragment after
    /// [`fill_gap_values`](Self::fill_gap_values) marks the gap values stale.
    pub fn add(
        &mut self,
        start0: Position,
        end0: Position,
        start1: Position,
        end1: Position,
        weight: Score,
    ) -> Result<usize, FragmentError> {
        if start0 > end0 {
            return Err(FragmentError::InvalidRange { dim: 0, start: start0, end: end0 });
        }
        if start1 > end1 {
            return Err(FragmentError::InvalidRange { dim: 1, start: start1, end: end1 });
        }
        self.largest[0] = self.largest[0].max(end0);
        self.largest[1] = self.largest[1].max(end1);
        let index = self.fragments.len();
        let mut fragment = Fragment::new([start0, start1], [end0, end1], weight);
        fragment.first_in_chain = index;
        self.fragments.push(fragment);
        self.gaps_filled = false;
        Ok(index)
    }

    /// Compute `initial_gap` and `terminal_gap` of every fragment from the
    /// final bounding box.
    pub fn fill_gap_values(&mut self) {
        let [largest0, largest1] = self.largest;
        for fragment in &mut self.fragments {
            fragment.initial_gap = (fragment.start[0] + fragment.start[1]) as Score;
            fragment.terminal_gap =
                ((largest0 - fragment.end[0]) + (largest1 - fragment.end[1])) as Score;
        }
        self.gaps_filled = true;
    }

    /// Whether the gap values reflect the current contents
    pub fn gaps_filled(&self) -> bool {
        self.gaps_filled
    }

    /// Remove all fragments, keeping the allocation
    pub fn clear(&mut self) {
        self.fragments.clear();
        self.largest = [0, 0];
        self.gaps_filled = false;
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Fragment> {
        self.fragments.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fragment> {
        self.fragments.iter()
    }

    pub fn as_slice(&self) -> &[Fragment] {
        &self.fragments
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Fragment] {
        &mut self.fragments
    }

    /// Largest end position seen in the given dimension
    pub fn largest(&self, dim: Dimension) -> Position {
        self.largest[dim.index()]
    }

    /// Whether fragments are ordered by start position in `dim`
    pub fn is_sorted_by_start(&self, dim: Dimension) -> bool {
        self.fragments
            .windows(2)
            .all(|w| w[0].start_in(dim) <= w[1].start_in(dim))
    }

    /// Stable sort by start position in `dim`.
    ///
    /// Fragments with equal start keep their insertion order. Solver fields
    /// are reset since they hold indices into the old order.
    pub fn sort_by_start(&mut self, dim: Dimension) {
        self.fragments.sort_by_key(|f| f.start_in(dim));
        for (index, fragment) in self.fragments.iter_mut().enumerate() {
            fragment.score = 0;
            fragment.previous = None;
            fragment.first_in_chain = index;
        }
    }

    /// Multiply every weight by `factor`, rounding to the nearest integer
    pub fn scale_weights(&mut self, factor: f64) {
        for fragment in &mut self.fragments {
            fragment.weight = (fragment.weight as f64 * factor).round() as Score;
        }
    }
}

impl std::ops::Index<usize> for FragmentTable {
    type Output = Fragment;

    fn index(&self, index: usize) -> &Fragment {
        &self.fragments[index]
    }
}

impl<'a> IntoIterator for &'a FragmentTable {
    type Item = &'a Fragment;
    type IntoIter = std::slice::Iter<'a, Fragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.fragments.iter()
    }
}
