//! Chain selection and retracing
//!
//! After the solver has scored every fragment, the selector decides which
//! fragments end a reported chain and the retracer follows the `previous`
//! links back to the first fragment.
//!
//! Overlap chains may instead be selected by how much of the first sequence
//! they cover, see [`coverage_endpoints`].

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::core::bestk::BestK;
use crate::core::fragment::{Fragment, Position, Score};
use crate::core::mode::{ChainKind, CoverageFilter};
use crate::core::scoring::ScoreRule;

/// A chain of fragment indices, earliest first
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Chain {
    pub fragments: Vec<usize>,
    pub score: Score,
}

impl Chain {
    /// The chain with no fragments and score 0
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn first(&self) -> Option<usize> {
        self.fragments.first().copied()
    }

    pub fn last(&self) -> Option<usize> {
        self.fragments.last().copied()
    }
}

/// Whether `index` is not an inner fragment of an at-least-as-good chain
/// continuing with the next fragment
pub fn is_right_maximal(fragments: &[Fragment], index: usize) -> bool {
    match fragments.get(index + 1) {
        None => true,
        Some(next) => next.previous != Some(index) || next.score < fragments[index].score,
    }
}

/// Fragment indices of the chain ending in `last`, earliest first
pub fn retrace(fragments: &[Fragment], last: usize) -> Vec<usize> {
    let mut indices = Vec::new();
    let mut current = Some(last);
    while let Some(index) = current {
        indices.push(index);
        current = fragments[index].previous;
    }
    indices.reverse();
    indices
}

/// Build the chain ending in `last` with its reported score
pub fn retrace_chain(fragments: &[Fragment], last: usize, rule: ScoreRule) -> Chain {
    Chain {
        fragments: retrace(fragments, last),
        score: rule.reported(&fragments[last]),
    }
}

fn right_maximal(fragments: &[Fragment]) -> impl Iterator<Item = usize> + '_ {
    (0..fragments.len()).filter(move |&i| is_right_maximal(fragments, i))
}

/// First right-maximal fragment with the largest reported score. Later
/// fragments tying with it are not reported.
fn best_right_maximal(fragments: &[Fragment], rule: ScoreRule) -> Option<usize> {
    let mut best: Option<usize> = None;
    for i in right_maximal(fragments) {
        if best.map_or(true, |b| rule.reported(&fragments[b]) < rule.reported(&fragments[i])) {
            best = Some(i);
        }
    }
    best
}

/// One representative per equivalence class of right-maximal fragments.
///
/// Fragments whose best chains start at the same fragment form a class; the
/// first fragment with the highest score represents it. Returned in
/// ascending index order.
pub fn class_representatives(fragments: &[Fragment]) -> Vec<usize> {
    let mut best_of_class: HashMap<usize, usize> = HashMap::new();
    for i in right_maximal(fragments) {
        best_of_class
            .entry(fragments[i].first_in_chain)
            .and_modify(|rep| {
                if fragments[*rep].score < fragments[i].score {
                    *rep = i;
                }
            })
            .or_insert(i);
    }
    let mut representatives: Vec<usize> = best_of_class.into_values().collect();
    representatives.sort_unstable();
    representatives
}

/// `k`-th best score among right-maximal fragments, or the smallest one if
/// there are fewer than `k`
pub fn kth_best_score(fragments: &[Fragment], k: usize) -> Option<Score> {
    let mut best = BestK::new(k);
    for i in right_maximal(fragments) {
        best.insert(fragments[i].score);
    }
    best.min()
}

/// `max_score * (100 - percent) / 100`, truncated towards zero and never
/// above `max_score`, so a negative best still reports itself
pub fn percent_away_threshold(max_score: Score, percent: u32) -> Score {
    (max_score * (100 - Score::from(percent.min(100))) / 100).min(max_score)
}

fn threshold_endpoints(fragments: &[Fragment], min_score: Score) -> Vec<usize> {
    class_representatives(fragments)
        .into_iter()
        .filter(|&i| fragments[i].score >= min_score)
        .collect()
}

/// Length in the first dimension spanned by the best chain ending in each
/// fragment.
///
/// A fragment alone spans `end - start`; chaining adds the predecessor's span
/// minus the positions both share. Predecessors must precede their
/// successors in index order.
pub fn first_dimension_coverage(fragments: &[Fragment]) -> Vec<Position> {
    let mut spans: Vec<Position> = Vec::with_capacity(fragments.len());
    for fragment in fragments {
        let own = fragment.end[0] - fragment.start[0];
        let span = match fragment.previous {
            Some(p) => {
                let pred = &fragments[p];
                let shared = if fragment.start[0] <= pred.end[0] {
                    pred.end[0] - fragment.start[0] + 1
                } else {
                    0
                };
                own + spans[p].saturating_sub(shared)
            }
            None => own,
        };
        spans.push(span);
    }
    spans
}

/// Ends of the overlap chains covering enough of the first sequence.
///
/// Only fragments no other fragment continues can end a chain. Per origin
/// the first covering end is taken and later replaced by any end spanning
/// more. Chains are returned in the order their origins first qualified.
pub fn coverage_endpoints(fragments: &[Fragment], filter: &CoverageFilter) -> Vec<usize> {
    let spans = first_dimension_coverage(fragments);
    let mut continued = vec![false; fragments.len()];
    for fragment in fragments {
        if let Some(p) = fragment.previous {
            continued[p] = true;
        }
    }

    let mut end_of_origin: HashMap<usize, usize> = HashMap::new();
    let mut origins = Vec::new();
    for i in (0..fragments.len()).filter(|&i| !continued[i]) {
        let origin = fragments[i].first_in_chain;
        match end_of_origin.entry(origin) {
            Entry::Vacant(entry) => {
                if filter.is_covered(spans[i]) {
                    entry.insert(i);
                    origins.push(origin);
                }
            }
            Entry::Occupied(mut entry) => {
                if spans[i] > spans[*entry.get()] {
                    entry.insert(i);
                }
            }
        }
    }

    log::debug!(
        "{} of {} chain origins cover at least {}",
        origins.len(),
        fragments.len(),
        filter.min_coverage
    );
    origins.iter().map(|origin| end_of_origin[origin]).collect()
}

/// Fragments ending a reported chain, in ascending index order.
///
/// `global_best` is the best activated fragment of the sweep and is
/// only consulted for [`ChainKind::Global`].
pub fn select_endpoints(
    fragments: &[Fragment],
    kind: ChainKind,
    global_best: Option<usize>,
) -> Vec<usize> {
    let rule = ScoreRule::from(kind);
    match kind {
        ChainKind::Global => global_best.into_iter().collect(),
        ChainKind::GlobalWithGapCost | ChainKind::GlobalWithOverlaps | ChainKind::LocalMax => {
            best_right_maximal(fragments, rule).into_iter().collect()
        }
        ChainKind::LocalThreshold(min_score) => threshold_endpoints(fragments, min_score),
        ChainKind::LocalBestK(k) => match kth_best_score(fragments, k) {
            Some(min_score) => threshold_endpoints(fragments, min_score),
            None => Vec::new(),
        },
        ChainKind::LocalPercentAway(percent) => match best_right_maximal(fragments, rule) {
            Some(best) => {
                let min_score = percent_away_threshold(fragments[best].score, percent);
                threshold_endpoints(fragments, min_score)
            }
            None => Vec::new(),
        },
    }
}
