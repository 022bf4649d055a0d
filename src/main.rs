//! Chain2Dim CLI entry point
//!
//! Chains the fragments of one or more fragment files and prints the chains.

use clap::{ArgGroup, Parser, ValueEnum};
use chain2dim::core::{
    chain_fragments, chain_tables_parallel, ChainKind, ChainMode, Dimension, FragmentTable,
    GapMetric,
};
use chain2dim::formats::{read_fragment_file, ChainWriter};
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
enum PresortArg {
    /// Sort fragments by start in the first dimension
    #[value(name = "first")]
    First,
    /// Sort fragments by start in the second dimension
    #[default]
    #[value(name = "second")]
    Second,
}

impl From<PresortArg> for Dimension {
    fn from(arg: PresortArg) -> Self {
        match arg {
            PresortArg::First => Dimension::First,
            PresortArg::Second => Dimension::Second,
        }
    }
}

#[derive(Parser)]
#[command(name = "chain2dim")]
#[command(about = "Compute global or local chains of two-dimensional fragments")]
#[command(version)]
#[command(author = "Chain2Dim Contributors")]
#[command(group(ArgGroup::new("kind").required(true).args(["global", "local"])))]
struct Cli {
    /// Fragment files: 5 integers per line (start0 end0 start1 end1 weight)
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Global chaining; --global=gc charges gap costs, --global=ov allows overlaps
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "", value_name = "gc|ov")]
    global: Option<String>,

    /// Local chaining; --local=n: score threshold, --local=kb: best k chains, --local=pp: within p% of best
    #[arg(long, num_args = 0..=1, require_equals = true, default_missing_value = "", value_name = "n|kb|pp")]
    local: Option<String>,

    /// Largest gap allowed between chained fragments (0: unbounded)
    #[arg(long = "maxgap", default_value = "0")]
    max_gap_width: u64,

    /// Multiply fragment weights by this factor
    #[arg(long = "wf")]
    weight_factor: Option<f64>,

    /// Charge the larger of the two gap widths instead of their sum
    #[arg(long)]
    chebyshev: bool,

    /// Dimension fragments are sorted by before chaining
    #[arg(long, value_enum, default_value = "second")]
    presort: PresortArg,

    /// With --global=ov, report every chain covering at least this percentage
    /// of the first sequence instead of the best chain
    #[arg(long = "mincoverage", requires = "seqlen", value_name = "PERCENT")]
    min_coverage: Option<f64>,

    /// Length of the first sequence, for --mincoverage
    #[arg(long = "seqlen", requires = "min_coverage", value_name = "LEN")]
    seqlen: Option<u64>,

    /// Print chain headers only
    #[arg(short = 's', long)]
    silent: bool,

    /// Number of threads for chaining several files
    #[arg(short = 't', long, default_value = "1")]
    threads: usize,
}

impl Cli {
    fn chain_mode(&self) -> anyhow::Result<ChainMode> {
        let text = match (&self.global, &self.local) {
            (Some(arg), _) => format!("global {}", arg),
            (None, Some(arg)) => format!("local {}", arg),
            (None, None) => anyhow::bail!("either --global or --local is required"),
        };
        let kind: ChainKind = text.parse()?;

        let mut builder = ChainMode::builder(kind)
            .max_gap_width(self.max_gap_width)
            .presort_dim(self.presort.into());
        if self.chebyshev {
            builder = builder.gap_metric(GapMetric::Chebyshev);
        }
        if let Some(factor) = self.weight_factor {
            builder = builder.weight_factor(factor);
        }
        if let (Some(percent), Some(seqlen)) = (self.min_coverage, self.seqlen) {
            builder = builder.coverage(seqlen, percent / 100.0);
        }
        Ok(builder.build()?)
    }
}

fn load_table(path: &PathBuf, mode: &ChainMode) -> anyhow::Result<FragmentTable> {
    let mut table = read_fragment_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to read fragment file {:?}: {}", path, e))?;
    if let Some(factor) = mode.weight_factor() {
        table.scale_weights(factor);
    }
    table.fill_gap_values();
    eprintln!("Read {} fragments from {:?}", table.len(), path);
    Ok(table)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();
    let mode = cli.chain_mode()?;
    eprintln!("Chain kind: {}", mode.kind());

    let stdout = io::stdout();
    let mut writer = ChainWriter::new(BufWriter::new(stdout.lock()), cli.silent);

    if cli.threads > 1 && cli.files.len() > 1 {
        let mut tables = cli
            .files
            .iter()
            .map(|path| load_table(path, &mode))
            .collect::<anyhow::Result<Vec<_>>>()?;
        let results = chain_tables_parallel(&mut tables, &mode, cli.threads)?;

        for ((path, table), chains) in cli.files.iter().zip(&tables).zip(results) {
            eprintln!("{:?}: {} chains", path, chains.len());
            for chain in &chains {
                writer.write(table, chain)?;
            }
        }
    } else {
        for path in &cli.files {
            let mut table = load_table(path, &mode)?;
            let stats = chain_fragments(&mut table, &mode, |table, chain| writer.write(table, chain))?;
            eprintln!(
                "{:?}: {} chains, best score {}",
                path,
                stats.chains,
                stats.best_score.map_or_else(|| "-".to_string(), |s| s.to_string())
            );
        }
    }

    writer.flush()?;
    eprintln!("Chains written:  {}", writer.written());
    eprintln!("Time elapsed:    {:.2}s", start.elapsed().as_secs_f64());
    io::stderr().flush()?;

    Ok(())
}
