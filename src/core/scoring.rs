//! Score recurrences of the chain kinds
//!
//! The sweep and the selector only see a [`ScoreRule`]: the score a chain
//! starting at a fragment gets, how a predecessor extends into a successor,
//! the priority a finished fragment is activated with, and the score a
//! chain ending in a fragment is reported with.
//!
//! `GapCost` chaining stores `Σweights − initial_gap(first) − Σgapcosts` and
//! activates with `score − terminal_gap`, so priorities follow the
//! telescoping recurrence
//! `priority(p) + weight(f) − gapcost(p, f) + terminal_gap(p) − terminal_gap(f)`
//! and the reported score charges both corner gaps.

use crate::core::fragment::{Fragment, Score};
use crate::core::mode::ChainKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreRule {
    /// Free transitions
    Global,
    /// Gap costs including the initial and terminal gaps
    GapCost,
    /// Gap costs, restart on a non-positive prefix
    Local,
}

impl From<ChainKind> for ScoreRule {
    fn from(kind: ChainKind) -> Self {
        match kind {
            ChainKind::Global => ScoreRule::Global,
            ChainKind::GlobalWithGapCost => ScoreRule::GapCost,
            // overlap chaining carries a prefix only while it stays positive
            ChainKind::GlobalWithOverlaps => ScoreRule::Local,
            ChainKind::LocalMax
            | ChainKind::LocalThreshold(_)
            | ChainKind::LocalBestK(_)
            | ChainKind::LocalPercentAway(_) => ScoreRule::Local,
        }
    }
}

impl ScoreRule {
    /// Whether transitions are charged a gap cost
    pub fn charges_gaps(self) -> bool {
        self != ScoreRule::Global
    }

    /// Score of the chain consisting of `fragment` alone
    #[inline]
    pub fn initial(self, fragment: &Fragment) -> Score {
        match self {
            ScoreRule::GapCost => fragment.weight - fragment.initial_gap,
            ScoreRule::Global | ScoreRule::Local => fragment.weight,
        }
    }

    /// Score of `succ` when chained after `pred` at the given cost, or `None`
    /// if the chain should restart at `succ`
    #[inline]
    pub fn extend(self, pred: &Fragment, succ: &Fragment, cost: Score) -> Option<Score> {
        match self {
            ScoreRule::Global => Some(pred.score + succ.weight),
            ScoreRule::GapCost => Some(pred.score + succ.weight - cost),
            ScoreRule::Local => {
                let prefix = pred.score - cost;
                (prefix > 0).then_some(prefix + succ.weight)
            }
        }
    }

    /// Priority of a finished fragment in the dominance staircase
    #[inline]
    pub fn priority(self, fragment: &Fragment) -> Score {
        match self {
            ScoreRule::Global => fragment.score,
            ScoreRule::GapCost | ScoreRule::Local => fragment.score - fragment.terminal_gap,
        }
    }

    /// Score reported for a chain ending in `fragment`
    #[inline]
    pub fn reported(self, fragment: &Fragment) -> Score {
        match self {
            ScoreRule::GapCost => fragment.score - fragment.terminal_gap,
            ScoreRule::Global | ScoreRule::Local => fragment.score,
        }
    }
}
