//! Chain2Dim - two-dimensional fragment chaining
//!
//! Given scored axis-aligned matches ("fragments") between two sequences,
//! computes the highest-scoring colinear chains of fragments.
//!
//! # Features
//!
//! - Global chaining with or without gap costs, or allowing overlaps
//! - Local chaining: best chain, score threshold, best k, percent of best
//! - O(n log n) sweep-line solver over a dominance staircase
//! - Optional bound on the gap width between chained fragments
//! - Compressed fragment files (gzip, bzip2)
//!
//! # Example
//!
//! ```
//! use chain2dim::{best_chain, ChainKind, ChainMode, FragmentTable};
//!
//! let mut table = FragmentTable::new(2);
//! table.add(0, 2, 0, 2, 5).unwrap();
//! table.add(3, 5, 3, 5, 7).unwrap();
//!
//! let chain = best_chain(&mut table, &ChainMode::new(ChainKind::Global));
//! assert_eq!(chain.fragments, vec![0, 1]);
//! assert_eq!(chain.score, 12);
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use core::{
    best_chain, chain_fragments, chain_tables_parallel, collect_chains, Chain, Chain2DimError,
    ChainKind, ChainMode, ChainModeBuilder, ChainModeError, ChainStats, CoverageFilter, Dimension,
    Fragment, FragmentError, FragmentParseError, FragmentTable, GapMetric, Position, Score,
};
pub use formats::{read_fragment_file, read_fragments, ChainWriter};
