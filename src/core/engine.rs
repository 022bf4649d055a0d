//! Chaining runs
//!
//! A run prepares the table (presort, gap values), scores every fragment with
//! the solver for the chain kind, then hands each selected chain to the
//! caller's processor.

use std::convert::Infallible;

use rayon::prelude::*;

use crate::core::bruteforce::brute_force_chain;
use crate::core::fragment::{FragmentTable, Score};
use crate::core::mode::{ChainKind, ChainMode};
use crate::core::scoring::ScoreRule;
use crate::core::select::{coverage_endpoints, retrace_chain, select_endpoints, Chain};
use crate::core::sweep::sweep_chain;

/// Summary of one chaining run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainStats {
    /// Number of fragments chained
    pub fragments: usize,
    /// Number of chains handed to the processor
    pub chains: usize,
    /// Best score among the reported chains
    pub best_score: Option<Score>,
}

/// Sort by the presort dimension and fill gap values if needed
fn prepare(table: &mut FragmentTable, mode: &ChainMode) {
    let dim = mode.presort_dim();
    if !table.is_sorted_by_start(dim) {
        log::debug!("sorting {} fragments by start in {:?} dimension", table.len(), dim);
        table.sort_by_start(dim);
    }
    if !table.gaps_filled() {
        log::debug!("filling gap values of {} fragments", table.len());
        table.fill_gap_values();
    }
}

/// Chain the fragments of `table` and pass every selected chain to
/// `processor`.
///
/// The table is sorted by start position in the presort dimension first if
/// it is not already; chain indices refer to the sorted order. The first
/// error returned by `processor` stops the run and is returned unchanged.
pub fn chain_fragments<F, E>(
    table: &mut FragmentTable,
    mode: &ChainMode,
    mut processor: F,
) -> Result<ChainStats, E>
where
    F: FnMut(&FragmentTable, &Chain) -> Result<(), E>,
{
    let mut stats = ChainStats {
        fragments: table.len(),
        ..ChainStats::default()
    };
    if table.is_empty() {
        log::debug!("no fragments to chain");
        return Ok(stats);
    }

    prepare(table, mode);

    let kind = mode.kind();
    let global_best = match kind {
        ChainKind::GlobalWithOverlaps => {
            brute_force_chain(table.as_mut_slice(), mode.max_gap_width());
            None
        }
        _ => sweep_chain(table.as_mut_slice(), mode),
    };

    let fragments = table.as_slice();
    let endpoints = match mode.coverage() {
        Some(filter) => coverage_endpoints(fragments, &filter),
        None => select_endpoints(fragments, kind, global_best),
    };
    log::debug!("{} selected {} of {} fragments as chain ends", kind, endpoints.len(), fragments.len());

    let rule = ScoreRule::from(kind);
    for last in endpoints {
        let chain = retrace_chain(table.as_slice(), last, rule);
        processor(&*table, &chain)?;
        stats.chains += 1;
        stats.best_score = Some(stats.best_score.map_or(chain.score, |s| s.max(chain.score)));
    }

    Ok(stats)
}

/// All chains selected for `table`, in reporting order
pub fn collect_chains(table: &mut FragmentTable, mode: &ChainMode) -> Vec<Chain> {
    let mut chains = Vec::new();
    let result: Result<ChainStats, Infallible> = chain_fragments(table, mode, |_, chain| {
        chains.push(chain.clone());
        Ok(())
    });
    if let Err(never) = result {
        match never {}
    }
    chains
}

/// The highest-scoring reported chain, the earliest reported one on ties, or
/// the empty chain with score 0 if nothing is reported
pub fn best_chain(table: &mut FragmentTable, mode: &ChainMode) -> Chain {
    collect_chains(table, mode)
        .into_iter()
        .reduce(|best, chain| if chain.score > best.score { chain } else { best })
        .unwrap_or_else(Chain::empty)
}

/// Run independent chainings of several tables on a thread pool.
///
/// Every table is owned by exactly one worker for its run.
pub fn chain_tables_parallel(
    tables: &mut [FragmentTable],
    mode: &ChainMode,
    threads: usize,
) -> Result<Vec<Vec<Chain>>, rayon::ThreadPoolBuildError> {
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    log::debug!("chaining {} tables on {} threads", tables.len(), pool.current_num_threads());

    Ok(pool.install(|| {
        tables
            .par_iter_mut()
            .map(|table| collect_chains(table, mode))
            .collect()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fragment::Position;

    fn table(rows: &[(Position, Position, Position, Position, Score)]) -> FragmentTable {
        let mut table = FragmentTable::new(rows.len());
        for &(s0, e0, s1, e1, w) in rows {
            table.add(s0, e0, s1, e1, w).unwrap();
        }
        table
    }

    fn mode(kind: ChainKind) -> ChainMode {
        ChainMode::new(kind)
    }

    #[test]
    fn test_empty_input() {
        let mut t = FragmentTable::new(0);
        let mut calls = 0;
        let stats: Result<ChainStats, Infallible> = chain_fragments(&mut t, &mode(ChainKind::Global), |_, _| {
            calls += 1;
            Ok(())
        });
        let stats = stats.unwrap();
        assert_eq!(calls, 0);
        assert_eq!(stats, ChainStats::default());

        let chain = best_chain(&mut t, &mode(ChainKind::LocalMax));
        assert!(chain.is_empty());
        assert_eq!(chain.score, 0);
    }

    #[test]
    fn test_single_fragment() {
        let mut t = table(&[(3, 7, 1, 2, 42)]);
        let chains = collect_chains(&mut t, &mode(ChainKind::Global));
        assert_eq!(chains, vec![Chain { fragments: vec![0], score: 42 }]);
    }

    #[test]
    fn test_non_overlapping_pair() {
        let mut t = table(&[(0, 2, 0, 2, 5), (3, 5, 3, 5, 7)]);
        let chain = best_chain(&mut t, &mode(ChainKind::Global));
        assert_eq!(chain.fragments, vec![0, 1]);
        assert_eq!(chain.score, 12);
    }

    #[test]
    fn test_overlapping_pair() {
        let mut t = table(&[(0, 2, 0, 2, 5), (1, 3, 1, 3, 9)]);
        let chain = best_chain(&mut t, &mode(ChainKind::Global));
        assert_eq!(chain.fragments, vec![1]);
        assert_eq!(chain.score, 9);
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let mut t = table(&[(3, 5, 3, 5, 7), (0, 2, 0, 2, 5)]);
        let chain = best_chain(&mut t, &mode(ChainKind::Global));
        assert_eq!(t[0].weight, 5);
        assert_eq!(chain.fragments, vec![0, 1]);
    }

    #[test]
    fn test_gap_cost_score() {
        let mut t = table(&[(0, 1, 0, 1, 10), (6, 7, 6, 7, 10), (10, 11, 10, 11, 10)]);
        let chain = best_chain(&mut t, &mode(ChainKind::GlobalWithGapCost));
        assert_eq!(chain.fragments, vec![0, 1, 2]);
        // 30 - initial 0 - gaps 10 and 6 - terminal 0
        assert_eq!(chain.score, 14);
    }

    #[test]
    fn test_gap_cost_charges_corner_gaps() {
        let mut t = table(&[(4, 5, 2, 3, 10), (7, 8, 6, 9, 10)]);
        let chain = best_chain(&mut t, &mode(ChainKind::GlobalWithGapCost));
        assert_eq!(chain.fragments, vec![0, 1]);
        // initial 6, gap (7-5)+(6-3)=5, terminal 0
        assert_eq!(chain.score, 20 - 6 - 5);
    }

    #[test]
    fn test_overlap_mode() {
        let mut t = table(&[(0, 5, 0, 5, 10), (4, 9, 4, 9, 10), (2, 3, 20, 30, 1)]);
        let chain = best_chain(&mut t, &mode(ChainKind::GlobalWithOverlaps));
        assert_eq!(chain.fragments, vec![0, 1]);
        assert_eq!(chain.score, 16);
    }

    #[test]
    fn test_local_threshold_reports_separate_chains() {
        let mut t = table(&[
            (0, 9, 0, 9, 20),
            (10, 19, 10, 19, 20),
            (1000, 1009, 1000, 1009, 15),
            (5000, 5001, 5000, 5001, 2),
        ]);
        let chains = collect_chains(&mut t, &mode(ChainKind::LocalThreshold(10)));
        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].fragments, vec![0, 1]);
        assert_eq!(chains[0].score, 38);
        assert_eq!(chains[1].fragments, vec![2]);
        assert_eq!(chains[1].score, 15);
    }

    #[test]
    fn test_local_best_k() {
        let mut t = table(&[
            (0, 9, 0, 9, 20),
            (1000, 1009, 1000, 1009, 15),
            (5000, 5009, 5000, 5009, 30),
        ]);
        let chains = collect_chains(&mut t, &mode(ChainKind::LocalBestK(2)));
        let scores: Vec<Score> = chains.iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![20, 30]);
    }

    #[test]
    fn test_processor_error_stops_run() {
        let mut t = table(&[(0, 1, 0, 1, 5), (1000, 1001, 1000, 1001, 5), (5000, 5001, 5000, 5001, 5)]);
        let mut seen = 0;
        let result = chain_fragments(&mut t, &mode(ChainKind::LocalThreshold(1)), |_, _| {
            seen += 1;
            if seen == 2 {
                Err("stop")
            } else {
                Ok(())
            }
        });
        assert_eq!(result.unwrap_err(), "stop");
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_stats() {
        let mut t = table(&[(0, 1, 0, 1, 5), (1000, 1001, 1000, 1001, 7)]);
        let stats: Result<ChainStats, Infallible> =
            chain_fragments(&mut t, &mode(ChainKind::LocalThreshold(1)), |_, _| Ok(()));
        let stats = stats.unwrap();
        assert_eq!(stats.fragments, 2);
        assert_eq!(stats.chains, 2);
        assert_eq!(stats.best_score, Some(7));
    }

    #[test]
    fn test_best_chain_takes_highest_score() {
        let rows = [(0, 1, 0, 1, 5), (1000, 1001, 1000, 1001, 7), (2000, 2001, 2000, 2001, 7)];
        let mode = mode(ChainKind::LocalThreshold(1));
        assert_eq!(collect_chains(&mut table(&rows), &mode)[0].score, 5);

        let chain = best_chain(&mut table(&rows), &mode);
        assert_eq!(chain, Chain { fragments: vec![1], score: 7 });
    }

    #[test]
    fn test_coverage_selection() {
        let rows = [(0, 10, 0, 10, 10), (8, 20, 8, 20, 10), (100, 105, 100, 105, 50)];
        let covering = |min_coverage| {
            ChainMode::builder(ChainKind::GlobalWithOverlaps)
                .max_gap_width(20)
                .coverage(200, min_coverage)
                .build()
                .unwrap()
        };

        // spans 19 and 5 out of 200
        let chains = collect_chains(&mut table(&rows), &covering(0.05));
        assert_eq!(chains, vec![Chain { fragments: vec![0, 1], score: 14 }]);

        let chains = collect_chains(&mut table(&rows), &covering(0.02));
        assert_eq!(
            chains,
            vec![
                Chain { fragments: vec![0, 1], score: 14 },
                Chain { fragments: vec![2], score: 50 },
            ]
        );

        // score selection would only report the heavier chain
        let by_score = ChainMode::builder(ChainKind::GlobalWithOverlaps)
            .max_gap_width(20)
            .build()
            .unwrap();
        let chains = collect_chains(&mut table(&rows), &by_score);
        assert_eq!(chains, vec![Chain { fragments: vec![2], score: 50 }]);

        assert!(collect_chains(&mut table(&rows), &covering(0.5)).is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let rows = [(0, 2, 0, 2, 5), (3, 5, 3, 5, 7), (1, 3, 1, 3, 9)];
        let mut tables: Vec<FragmentTable> = (0..4).map(|_| table(&rows)).collect();
        let results = chain_tables_parallel(&mut tables, &mode(ChainKind::Global), 2).unwrap();
        let expected = collect_chains(&mut table(&rows), &mode(ChainKind::Global));
        assert_eq!(results.len(), 4);
        for chains in results {
            assert_eq!(chains, expected);
        }
    }
}
