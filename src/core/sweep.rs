//! Sweep-line chaining in O(n log n)
//!
//! Fragments produce a start event at their start and an end event at their
//! end in the presort dimension. Events are swept in ascending position,
//! start events before end events at equal positions, so a fragment only
//! sees predecessors ending strictly before it starts. A start event scores
//! the fragment against the best activated predecessor ending strictly
//! before it in the other dimension; an end event activates the fragment.
//!
//! Without a gap bound activated fragments live in the dominance staircase.
//! With one they live in a [`GapWindow`], which answers the best predecessor
//! inside the allowed window instead of the best one overall.

use crate::core::dominance::Staircase;
use crate::core::fragment::{Dimension, Fragment};
use crate::core::gapcost::{gap_cost, within_max_gap_width};
use crate::core::mode::{ChainMode, GapMetric};
use crate::core::scoring::ScoreRule;
use crate::core::window::GapWindow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Event {
    Start(usize),
    End(usize),
}

/// Event order for the sweep.
///
/// Each stream is sorted by its key with ties broken by fragment index.
fn sweep_events(fragments: &[Fragment], dim: Dimension) -> Vec<Event> {
    let mut starts: Vec<usize> = (0..fragments.len()).collect();
    starts.sort_by_key(|&i| (fragments[i].start_in(dim), i));
    let mut ends: Vec<usize> = (0..fragments.len()).collect();
    ends.sort_by_key(|&i| (fragments[i].end_in(dim), i));

    let mut events = Vec::with_capacity(2 * fragments.len());
    let (mut s, mut e) = (0, 0);
    while e < ends.len() {
        if s < starts.len() && fragments[starts[s]].start_in(dim) <= fragments[ends[e]].end_in(dim) {
            events.push(Event::Start(starts[s]));
            s += 1;
        } else {
            events.push(Event::End(ends[e]));
            e += 1;
        }
    }
    events
}

/// Activated fragments awaiting successors
enum Predecessors {
    Unbounded(Staircase),
    Bounded(GapWindow),
}

struct Sweep<'a> {
    fragments: &'a mut [Fragment],
    rule: ScoreRule,
    metric: GapMetric,
    other: Dimension,
    predecessors: Predecessors,
}

impl Sweep<'_> {
    fn predecessor(&mut self, index: usize) -> Option<usize> {
        let fragments = &*self.fragments;
        match &mut self.predecessors {
            Predecessors::Unbounded(staircase) => {
                let start = fragments[index].start_in(self.other);
                if start == 0 {
                    return None;
                }
                staircase.best_at_or_below(start - 1).map(|(_, activated)| activated.fragment)
            }
            Predecessors::Bounded(window) => {
                let pred = window.best_before(fragments, index)?;
                debug_assert!(within_max_gap_width(
                    &fragments[pred],
                    &fragments[index],
                    window.width()
                ));
                Some(pred)
            }
        }
    }

    fn start(&mut self, index: usize) {
        let extended = self.predecessor(index).and_then(|p| {
            let pred = &self.fragments[p];
            let succ = &self.fragments[index];
            let cost = if self.rule.charges_gaps() {
                gap_cost(self.metric, pred, succ)
            } else {
                0
            };
            self.rule
                .extend(pred, succ, cost)
                .map(|score| (p, score, pred.first_in_chain))
        });

        let rule = self.rule;
        let fragment = &mut self.fragments[index];
        match extended {
            Some((p, score, first)) => {
                fragment.score = score;
                fragment.previous = Some(p);
                fragment.first_in_chain = first;
            }
            None => {
                fragment.score = rule.initial(fragment);
                fragment.previous = None;
                fragment.first_in_chain = index;
            }
        }
        log::trace!(
            "fragment {}: score {} previous {:?}",
            index,
            fragment.score,
            fragment.previous
        );
    }

    fn end(&mut self, index: usize) {
        let fragments = &*self.fragments;
        let priority = self.rule.priority(&fragments[index]);
        match &mut self.predecessors {
            Predecessors::Unbounded(staircase) => {
                staircase.activate(fragments[index].end_in(self.other), priority, index);
            }
            Predecessors::Bounded(window) => window.activate(fragments, index, priority),
        }
    }

    fn best(&self) -> Option<usize> {
        match &self.predecessors {
            Predecessors::Unbounded(staircase) => {
                staircase.best().map(|(_, activated)| activated.fragment)
            }
            Predecessors::Bounded(window) => window.best(),
        }
    }
}

/// Score every fragment with the sweep-line recurrence of `mode`'s kind.
///
/// Returns the best activated fragment, which ends the best global chain.
pub fn sweep_chain(fragments: &mut [Fragment], mode: &ChainMode) -> Option<usize> {
    let presort = mode.presort_dim();
    let events = sweep_events(fragments, presort);
    let predecessors = match mode.max_gap_width() {
        0 => Predecessors::Unbounded(Staircase::new()),
        width => Predecessors::Bounded(GapWindow::new(fragments, presort, width)),
    };
    let mut sweep = Sweep {
        fragments,
        rule: ScoreRule::from(mode.kind()),
        metric: mode.gap_metric(),
        other: presort.other(),
        predecessors,
    };

    for event in events {
        match event {
            Event::Start(index) => sweep.start(index),
            Event::End(index) => sweep.end(index),
        }
    }

    match &sweep.predecessors {
        Predecessors::Unbounded(staircase) => log::debug!(
            "sweep finished: {} fragments, {} staircase entries",
            sweep.fragments.len(),
            staircase.len()
        ),
        Predecessors::Bounded(window) => log::debug!(
            "sweep finished: {} fragments, {} endpoints in the last window",
            sweep.fragments.len(),
            window.len()
        ),
    }
    sweep.best()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fragment::{FragmentTable, Position, Score};
    use crate::core::mode::ChainKind;

    fn table(rows: &[(Position, Position, Position, Position, Score)]) -> FragmentTable {
        let mut table = FragmentTable::new(rows.len());
        for &(s0, e0, s1, e1, w) in rows {
            table.add(s0, e0, s1, e1, w).unwrap();
        }
        table.sort_by_start(Dimension::Second);
        table.fill_gap_values();
        table
    }

    fn run(table: &mut FragmentTable, kind: ChainKind) -> Option<usize> {
        let mode = ChainMode::new(kind);
        sweep_chain(table.as_mut_slice(), &mode)
    }

    #[test]
    fn test_events_start_before_end_on_ties() {
        let t = table(&[(0, 2, 0, 2, 1), (3, 5, 2, 5, 1)]);
        let events = sweep_events(t.as_slice(), Dimension::Second);
        assert_eq!(
            events,
            vec![Event::Start(0), Event::Start(1), Event::End(0), Event::End(1)]
        );
    }

    #[test]
    fn test_global_pair() {
        let mut t = table(&[(0, 2, 0, 2, 5), (3, 5, 3, 5, 7)]);
        let best = run(&mut t, ChainKind::Global);
        assert_eq!(best, Some(1));
        assert_eq!(t[1].score, 12);
        assert_eq!(t[1].previous, Some(0));
        assert_eq!(t[1].first_in_chain, 0);
    }

    #[test]
    fn test_global_overlap_not_chained() {
        let mut t = table(&[(0, 2, 0, 2, 5), (1, 3, 1, 3, 9)]);
        let best = run(&mut t, ChainKind::Global);
        assert_eq!(t[1].previous, None);
        assert_eq!(best, Some(1));
        assert_eq!(t[1].score, 9);
    }

    #[test]
    fn test_touching_in_other_dimension_not_chained() {
        // end1 of the first equals start1 of the second
        let mut t = table(&[(0, 2, 0, 3, 5), (5, 6, 3, 6, 7)]);
        run(&mut t, ChainKind::Global);
        assert_eq!(t[1].previous, None);
    }

    #[test]
    fn test_global_picks_best_predecessor() {
        let mut t = table(&[
            (0, 1, 0, 1, 2),
            (0, 3, 2, 3, 10),
            (5, 6, 5, 6, 1),
        ]);
        run(&mut t, ChainKind::Global);
        assert_eq!(t[2].previous, Some(1));
        assert_eq!(t[2].score, 11);
    }

    #[test]
    fn test_gap_cost_prefers_small_gaps() {
        // two predecessors with equal weight, the nearer one wins
        let mut t = table(&[
            (0, 1, 0, 1, 10),
            (6, 7, 6, 7, 10),
            (10, 11, 10, 11, 10),
        ]);
        run(&mut t, ChainKind::GlobalWithGapCost);
        assert_eq!(t[2].previous, Some(1));
        // 30 - initial(0) - 5*2 - 3*2 - terminal(0)
        assert_eq!(ScoreRule::GapCost.reported(&t[2]), 30 - 10 - 6);
    }

    #[test]
    fn test_local_restarts() {
        let mut t = table(&[(0, 1, 0, 1, 3), (50, 51, 50, 51, 4)]);
        run(&mut t, ChainKind::LocalMax);
        assert_eq!(t[1].previous, None);
        assert_eq!(t[1].score, 4);
        assert_eq!(t[1].first_in_chain, 1);
    }

    #[test]
    fn test_local_extends_when_prefix_positive() {
        let mut t = table(&[(0, 1, 0, 1, 30), (5, 6, 5, 6, 4)]);
        run(&mut t, ChainKind::LocalMax);
        assert_eq!(t[1].previous, Some(0));
        assert_eq!(t[1].score, 30 - 8 + 4);
    }

    #[test]
    fn test_max_gap_width_blocks_distant_predecessor() {
        let mut t = table(&[(0, 1, 0, 1, 5), (20, 21, 20, 21, 5)]);
        let mode = ChainMode::builder(ChainKind::Global).max_gap_width(10).build().unwrap();
        sweep_chain(t.as_mut_slice(), &mode);
        assert_eq!(t[1].previous, None);

        let mode = ChainMode::builder(ChainKind::Global).max_gap_width(18).build().unwrap();
        sweep_chain(t.as_mut_slice(), &mode);
        assert_eq!(t[1].previous, Some(0));
    }

    #[test]
    fn test_max_gap_width_takes_nearer_weaker_predecessor() {
        // the heavier first fragment is out of reach of the third
        let mut t = table(&[(0, 1, 0, 1, 3), (50, 51, 50, 51, 2), (60, 61, 60, 61, 2)]);
        let mode = ChainMode::builder(ChainKind::Global).max_gap_width(20).build().unwrap();
        let best = sweep_chain(t.as_mut_slice(), &mode);
        assert_eq!(t[1].previous, None);
        assert_eq!(t[2].previous, Some(1));
        assert_eq!(t[2].score, 4);
        assert_eq!(best, Some(2));
    }

    #[test]
    fn test_presort_first_dimension() {
        let mut t = table(&[(0, 2, 0, 2, 5), (3, 5, 3, 5, 7)]);
        let mode = ChainMode::builder(ChainKind::Global)
            .presort_dim(Dimension::First)
            .build()
            .unwrap();
        assert_eq!(sweep_chain(t.as_mut_slice(), &mode), Some(1));
        assert_eq!(t[1].score, 12);
    }

    #[test]
    fn test_chebyshev_cost() {
        let mut t = table(&[(0, 1, 0, 1, 30), (5, 6, 10, 11, 4)]);
        let mode = ChainMode::builder(ChainKind::LocalMax)
            .gap_metric(GapMetric::Chebyshev)
            .build()
            .unwrap();
        sweep_chain(t.as_mut_slice(), &mode);
        assert_eq!(t[1].score, 30 - 8 + 4);
    }

    #[test]
    fn test_empty() {
        let mut t = FragmentTable::new(0);
        assert_eq!(run(&mut t, ChainKind::Global), None);
    }
}
