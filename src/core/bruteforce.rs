//! Quadratic chaining for overlapping fragments
//!
//! Overlap costs do not decompose into a per-fragment priority, so chains
//! allowing overlaps are computed by comparing every pair of fragments.
//! Fragments must be sorted by start position in the presort dimension.

use crate::core::fragment::{Fragment, Position, Score};
use crate::core::gapcost::{colinear, overlap_cost, within_max_gap_width};
use crate::core::scoring::ScoreRule;

/// Score every fragment against all earlier colinear fragments.
///
/// The chain carries a predecessor's prefix only while
/// `score(pred) - overlap_cost(pred, succ)` is positive. Ties keep the
/// earliest candidate.
pub fn brute_force_chain(fragments: &mut [Fragment], max_gap_width: Position) {
    let rule = ScoreRule::Local;

    for j in 0..fragments.len() {
        let mut best: Option<(Score, Option<usize>)> = None;

        for i in 0..j {
            let (pred, succ) = (&fragments[i], &fragments[j]);
            if !within_max_gap_width(pred, succ, max_gap_width) || !colinear(pred, succ) {
                continue;
            }
            let candidate = match rule.extend(pred, succ, overlap_cost(pred, succ)) {
                Some(score) => (score, Some(i)),
                None => (rule.initial(succ), None),
            };
            if best.map_or(true, |(score, _)| score < candidate.0) {
                best = Some(candidate);
            }
        }

        let (score, previous) = best.unwrap_or_else(|| (rule.initial(&fragments[j]), None));
        let first_in_chain = previous.map_or(j, |p| fragments[p].first_in_chain);
        let fragment = &mut fragments[j];
        fragment.score = score;
        fragment.previous = previous;
        fragment.first_in_chain = first_in_chain;
    }

    log::debug!("brute force chaining finished: {} fragments", fragments.len());
}
