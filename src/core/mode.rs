//! Chain mode configuration
//!
//! A [`ChainMode`] packages the chaining policy: which of the seven chain
//! kinds to compute, the gap metric, the presort dimension, an optional
//! bound on gap widths, an optional weight factor and, for overlap chaining,
//! an optional coverage filter. Contradictory option combinations are
//! rejected when the mode is built.

use std::fmt;
use std::str::FromStr;

use crate::core::error::{ChainModeError, ChainModeResult};
use crate::core::fragment::{Dimension, Position, Score};

/// The chaining policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainKind {
    /// Highest-scoring chain of strictly separated fragments, no gap cost
    Global,
    /// Global chaining charging gaps, including the gaps to the box corners
    GlobalWithGapCost,
    /// Global chaining that allows overlaps at the price of their length
    GlobalWithOverlaps,
    /// The best local chain
    LocalMax,
    /// All local chains scoring at least the given value
    LocalThreshold(Score),
    /// The best `k` local chains
    LocalBestK(usize),
    /// All local chains at most the given percentage below the best one
    LocalPercentAway(u32),
}

impl ChainKind {
    pub fn is_global(&self) -> bool {
        matches!(
            self,
            ChainKind::Global | ChainKind::GlobalWithGapCost | ChainKind::GlobalWithOverlaps
        )
    }

    pub fn is_local(&self) -> bool {
        !self.is_global()
    }
}

impl fmt::Display for ChainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainKind::Global => write!(f, "global"),
            ChainKind::GlobalWithGapCost => write!(f, "global gc"),
            ChainKind::GlobalWithOverlaps => write!(f, "global ov"),
            ChainKind::LocalMax => write!(f, "local"),
            ChainKind::LocalThreshold(t) => write!(f, "local {}", t),
            ChainKind::LocalBestK(k) => write!(f, "local {}b", k),
            ChainKind::LocalPercentAway(p) => write!(f, "local {}p", p),
        }
    }
}

impl FromStr for ChainKind {
    type Err = ChainModeError;

    /// Parse `global`, `global gc`, `global ov`, `local`, `local <n>`,
    /// `local <k>b` or `local <p>p`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || ChainModeError::UnknownKind(s.to_string());
        let fields: Vec<&str> = s.split_whitespace().collect();

        match fields.as_slice() {
            ["global"] => Ok(ChainKind::Global),
            ["global", "gc"] => Ok(ChainKind::GlobalWithGapCost),
            ["global", "ov"] => Ok(ChainKind::GlobalWithOverlaps),
            ["local"] => Ok(ChainKind::LocalMax),
            ["local", arg] => {
                if let Some(k) = arg.strip_suffix('b') {
                    k.parse::<usize>().map(ChainKind::LocalBestK).map_err(|_| unknown())
                } else if let Some(p) = arg.strip_suffix('p') {
                    p.parse::<u32>().map(ChainKind::LocalPercentAway).map_err(|_| unknown())
                } else {
                    arg.parse::<Score>().map(ChainKind::LocalThreshold).map_err(|_| unknown())
                }
            }
            _ => Err(unknown()),
        }
    }
}

/// Gap cost between consecutive fragments of a chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GapMetric {
    /// Sum of the distances in both dimensions
    #[default]
    L1,
    /// Larger of the two distances
    Chebyshev,
}

/// Report overlap chains by their coverage of the first sequence instead of
/// by score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverageFilter {
    /// Length of the first sequence
    pub sequence_length: Position,
    /// Smallest covered fraction of the first sequence, in 0..=1
    pub min_coverage: f64,
}

impl CoverageFilter {
    pub fn new(sequence_length: Position, min_coverage: f64) -> Self {
        Self {
            sequence_length,
            min_coverage,
        }
    }

    /// Whether a chain spanning `length` positions in the first dimension
    /// covers enough of the sequence
    pub fn is_covered(&self, length: Position) -> bool {
        length as f64 / self.sequence_length as f64 >= self.min_coverage
    }
}

/// Validated chaining configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ChainMode {
    kind: ChainKind,
    max_gap_width: Position,
    weight_factor: Option<f64>,
    gap_metric: GapMetric,
    presort_dim: Dimension,
    coverage: Option<CoverageFilter>,
}

impl ChainMode {
    /// Mode with default options for `kind`
    pub fn new(kind: ChainKind) -> Self {
        Self {
            kind,
            max_gap_width: 0,
            weight_factor: None,
            gap_metric: GapMetric::L1,
            presort_dim: Dimension::Second,
            coverage: None,
        }
    }

    pub fn builder(kind: ChainKind) -> ChainModeBuilder {
        ChainModeBuilder::new(kind)
    }

    pub fn kind(&self) -> ChainKind {
        self.kind
    }

    /// Largest allowed gap between chained fragments, 0 for unbounded
    pub fn max_gap_width(&self) -> Position {
        self.max_gap_width
    }

    pub fn weight_factor(&self) -> Option<f64> {
        self.weight_factor
    }

    pub fn gap_metric(&self) -> GapMetric {
        self.gap_metric
    }

    /// Dimension fragments are sorted by before chaining
    pub fn presort_dim(&self) -> Dimension {
        self.presort_dim
    }

    /// Coverage filter replacing score-based selection, overlap chaining only
    pub fn coverage(&self) -> Option<CoverageFilter> {
        self.coverage
    }
}

/// Builder for [`ChainMode`]
#[derive(Debug, Clone)]
pub struct ChainModeBuilder {
    mode: ChainMode,
}

impl ChainModeBuilder {
    pub fn new(kind: ChainKind) -> Self {
        Self { mode: ChainMode::new(kind) }
    }

    pub fn max_gap_width(mut self, width: Position) -> Self {
        self.mode.max_gap_width = width;
        self
    }

    pub fn weight_factor(mut self, factor: f64) -> Self {
        self.mode.weight_factor = Some(factor);
        self
    }

    pub fn gap_metric(mut self, metric: GapMetric) -> Self {
        self.mode.gap_metric = metric;
        self
    }

    pub fn presort_dim(mut self, dim: Dimension) -> Self {
        self.mode.presort_dim = dim;
        self
    }

    /// Report every overlap chain covering at least `min_coverage` of a first
    /// sequence of `sequence_length` positions
    pub fn coverage(mut self, sequence_length: Position, min_coverage: f64) -> Self {
        self.mode.coverage = Some(CoverageFilter::new(sequence_length, min_coverage));
        self
    }

    /// Validate the option combination
    pub fn build(self) -> ChainModeResult<ChainMode> {
        let mode = self.mode;

        if let Some(factor) = mode.weight_factor {
            if mode.kind == ChainKind::Global {
                return Err(ChainModeError::WeightFactorWithGlobal);
            }
            if !factor.is_finite() || factor <= 0.0 {
                return Err(ChainModeError::InvalidWeightFactor(factor));
            }
        }

        match mode.kind {
            ChainKind::LocalBestK(0) => return Err(ChainModeError::ZeroBestK),
            ChainKind::LocalPercentAway(p) if p > 100 => {
                return Err(ChainModeError::InvalidPercentAway(p));
            }
            _ => {}
        }

        if let Some(filter) = mode.coverage {
            if mode.kind != ChainKind::GlobalWithOverlaps {
                return Err(ChainModeError::CoverageWithoutOverlaps);
            }
            if filter.sequence_length == 0 {
                return Err(ChainModeError::ZeroSequenceLength);
            }
            if !(0.0..=1.0).contains(&filter.min_coverage) {
                return Err(ChainModeError::InvalidMinCoverage(filter.min_coverage));
            }
        }

        Ok(mode)
    }
}
