//! Gap costs and compatibility tests between two fragments
//!
//! All functions take the predecessor first and the successor second.

use crate::core::fragment::{Fragment, Position, Score};
use crate::core::mode::GapMetric;

/// Successor starts after the predecessor ends, in both dimensions
#[inline]
pub fn strictly_precedes(pred: &Fragment, succ: &Fragment) -> bool {
    pred.end[0] < succ.start[0] && pred.end[1] < succ.start[1]
}

/// Both starts and both ends strictly increase from `pred` to `succ`
#[inline]
pub fn colinear(pred: &Fragment, succ: &Fragment) -> bool {
    pred.start[0] < succ.start[0]
        && pred.end[0] < succ.end[0]
        && pred.start[1] < succ.start[1]
        && pred.end[1] < succ.end[1]
}

/// Number of positions strictly between `pred` and `succ` in dimension `dim`,
/// 0 when they touch or overlap
#[inline]
pub fn gap_width(pred: &Fragment, succ: &Fragment, dim: usize) -> Position {
    if succ.start[dim] <= pred.end[dim] {
        0
    } else {
        succ.start[dim] - pred.end[dim] - 1
    }
}

/// Whether the gap in each dimension is at most `max_gap_width`.
///
/// A width of 0 means unbounded.
#[inline]
pub fn within_max_gap_width(pred: &Fragment, succ: &Fragment, max_gap_width: Position) -> bool {
    max_gap_width == 0
        || (gap_width(pred, succ, 0) <= max_gap_width && gap_width(pred, succ, 1) <= max_gap_width)
}

/// `(start0(succ) - end0(pred)) + (start1(succ) - end1(pred))`
#[inline]
pub fn gap_cost_l1(pred: &Fragment, succ: &Fragment) -> Score {
    debug_assert!(strictly_precedes(pred, succ));
    (succ.start[0] - pred.end[0]) as Score + (succ.start[1] - pred.end[1]) as Score
}

/// Larger of the two gap widths
#[inline]
pub fn gap_cost_chebyshev(pred: &Fragment, succ: &Fragment) -> Score {
    debug_assert!(strictly_precedes(pred, succ));
    let gap0 = succ.start[0] - pred.end[0] - 1;
    let gap1 = succ.start[1] - pred.end[1] - 1;
    gap0.max(gap1) as Score
}

/// Total overlap length of the two fragments over both dimensions
pub fn overlap_cost(pred: &Fragment, succ: &Fragment) -> Score {
    let mut overlap: Position = 0;
    for dim in 0..2 {
        if succ.start[dim] <= pred.end[dim] {
            overlap += pred.end[dim] - succ.start[dim] + 1;
        }
    }
    log::trace!("overlap cost {}", overlap);
    overlap as Score
}

/// Gap cost under the given metric
#[inline]
pub fn gap_cost(metric: GapMetric, pred: &Fragment, succ: &Fragment) -> Score {
    match metric {
        GapMetric::L1 => gap_cost_l1(pred, succ),
        GapMetric::Chebyshev => gap_cost_chebyshev(pred, succ),
    }
}
