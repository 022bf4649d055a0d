//! Core chaining functionality
//!
//! This module contains the fragment table, the gap costs, the two solvers
//! and the chain selector.

mod bestk;
mod bruteforce;
mod dominance;
mod engine;
mod error;
pub mod fragment;
pub mod gapcost;
pub mod io;
mod mode;
mod scoring;
mod select;
mod sweep;
mod window;

pub use bestk::BestK;
pub use bruteforce::brute_force_chain;
pub use dominance::{Activated, Staircase};
pub use engine::{best_chain, chain_fragments, chain_tables_parallel, collect_chains, ChainStats};
pub use error::{
    Chain2DimError, ChainModeError, ChainModeResult, FragmentError, FragmentParseError,
    FragmentParseResult, Result,
};
pub use fragment::{Dimension, Fragment, FragmentTable, Position, Score};
pub use io::{Compression, FragmentInput, LineReader, ReadStrategy, MAP_THRESHOLD};
pub use mode::{ChainKind, ChainMode, ChainModeBuilder, CoverageFilter, GapMetric};
pub use scoring::ScoreRule;
pub use select::{
    class_representatives, coverage_endpoints, first_dimension_coverage, is_right_maximal, retrace,
    retrace_chain, select_endpoints, Chain,
};
pub use sweep::sweep_chain;
pub use window::{GapWindow, RangeMax};
