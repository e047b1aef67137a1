//! Argument parsing and command execution for the `pwl` binary.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use pwl_core::{
    FeatureMatrix, FeatureOptions, FiltrationOrder, MetricKind, PipelineBuilder, PwlError,
    WeisfeilerLehman, subtree_features,
};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use crate::input::{InputError, MissingLabels, load_graphs};

const DEFAULT_ITERATIONS: usize = 3;
const DEFAULT_POWER: f64 = 2.0;
const DEFAULT_BASE_WEIGHT: f64 = 1.0;

/// Top-level options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "pwl",
    about = "Compute persistent Weisfeiler-Lehman features for a collection of graphs."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Write the persistence-based feature matrix as CSV.
    Features(FeaturesArgs),
    /// Write the WL subtree label-count matrix as CSV.
    Subtree(SubtreeArgs),
}

/// Options shared by every command that reads a graph collection.
#[derive(Debug, Args, Clone)]
pub struct InputArgs {
    /// JSON document holding the graph collection.
    pub path: PathBuf,

    /// Number of WL refinement iterations.
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: usize,

    /// Labels used for graphs without a `labels` entry.
    #[arg(long = "missing-labels", value_enum, default_value_t = MissingLabels::Uniform)]
    pub missing_labels: MissingLabels,
}

/// Options accepted by the `features` command.
#[derive(Debug, Args, Clone)]
pub struct FeaturesArgs {
    /// Graph collection and relabelling depth.
    #[command(flatten)]
    pub input: InputArgs,

    /// Label distance, e.g. `minkowski:2`, `jaccard` or `uniform`.
    #[arg(long, default_value_t = MetricKind::Minkowski(2.0))]
    pub metric: MetricKind,

    /// Exponent applied to persistence values.
    #[arg(long, default_value_t = DEFAULT_POWER)]
    pub power: f64,

    /// Constant added to every edge weight.
    #[arg(long = "base-weight", default_value_t = DEFAULT_BASE_WEIGHT)]
    pub base_weight: f64,

    /// Direction of the filtration: `sublevel` or `superlevel`.
    #[arg(long, default_value_t = FiltrationOrder::Sublevel)]
    pub order: FiltrationOrder,

    /// Add each iteration's weights to those of the previous iteration.
    #[arg(long)]
    pub accumulate: bool,

    /// Emit the infinity norm of each diagram.
    #[arg(long = "infinity-norm")]
    pub infinity_norm: bool,

    /// Emit the total persistence of each diagram.
    #[arg(long = "total-persistence")]
    pub total_persistence: bool,

    /// Drop the per-label persistence columns.
    #[arg(long = "no-label-persistence")]
    pub no_label_persistence: bool,

    /// Emit per-label persistence of cycle-closing edges.
    #[arg(long = "cycle-persistence")]
    pub cycle_persistence: bool,

    /// Emit per-label vertex counts.
    #[arg(long = "original-features")]
    pub original_features: bool,
}

impl FeaturesArgs {
    fn feature_options(&self) -> FeatureOptions {
        FeatureOptions::new()
            .with_infinity_norm(self.infinity_norm)
            .with_total_persistence(self.total_persistence)
            .with_label_persistence(!self.no_label_persistence)
            .with_cycle_persistence(self.cycle_persistence)
            .with_original_features(self.original_features)
            .with_power(self.power)
    }
}

/// Options accepted by the `subtree` command.
#[derive(Debug, Args, Clone)]
pub struct SubtreeArgs {
    /// Graph collection and relabelling depth.
    #[command(flatten)]
    pub input: InputArgs,
}

/// Errors surfaced while executing a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// The graph collection could not be loaded.
    #[error(transparent)]
    Input(#[from] InputError),
    /// Feature computation failed.
    #[error(transparent)]
    Core(#[from] PwlError),
}

/// A computed feature matrix ready for rendering.
#[derive(Debug, Clone)]
pub struct FeatureReport {
    /// Command that produced the matrix.
    pub command: &'static str,
    /// One row per input graph.
    pub matrix: FeatureMatrix,
}

/// Executes the command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading the graphs or computing features fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use pwl_cli::cli::{Cli, Command, InputArgs, SubtreeArgs, run_cli};
/// # use pwl_cli::input::MissingLabels;
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(
///     file.path(),
///     r#"{"graphs": [{"vertices": 2, "edges": [[0, 1]], "labels": [1, 1]}]}"#,
/// )?;
/// let cli = Cli {
///     command: Command::Subtree(SubtreeArgs {
///         input: InputArgs {
///             path: file.path().to_path_buf(),
///             iterations: 1,
///             missing_labels: MissingLabels::Uniform,
///         },
///     }),
/// };
/// let report = run_cli(cli)?;
/// assert_eq!(report.matrix.column_names(), ["it0_label_count_0", "it1_label_count_0"]);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<FeatureReport, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Features(args) => {
            span.record("command", "features");
            run_features(args)
        }
        Command::Subtree(args) => {
            span.record("command", "subtree");
            run_subtree(args)
        }
    }
}

#[instrument(
    name = "cli.features",
    err,
    skip(args),
    fields(iterations = args.input.iterations, metric = %args.metric, order = %args.order),
)]
pub(super) fn run_features(args: FeaturesArgs) -> Result<FeatureReport, CliError> {
    let pipeline = PipelineBuilder::new()
        .with_iterations(args.input.iterations)
        .with_metric(args.metric)
        .with_base_weight(args.base_weight)
        .with_accumulate(args.accumulate)
        .with_order(args.order)
        .with_features(args.feature_options())
        .build()?;
    let graphs = load_graphs(&args.input.path, args.input.missing_labels)?;
    let matrix = pipeline.transform(&graphs)?.into_features();
    info!(
        graphs = graphs.len(),
        columns = matrix.column_names().len(),
        "feature matrix computed"
    );
    Ok(FeatureReport {
        command: "features",
        matrix,
    })
}

#[instrument(
    name = "cli.subtree",
    err,
    skip(args),
    fields(iterations = args.input.iterations),
)]
pub(super) fn run_subtree(args: SubtreeArgs) -> Result<FeatureReport, CliError> {
    let graphs = load_graphs(&args.input.path, args.input.missing_labels)?;
    let result = WeisfeilerLehman::new(args.input.iterations).transform(&graphs)?;
    let matrix = subtree_features(&result)?;
    info!(
        graphs = graphs.len(),
        columns = matrix.column_names().len(),
        "subtree matrix computed"
    );
    Ok(FeatureReport {
        command: "subtree",
        matrix,
    })
}

/// Writes `report` to `writer` as CSV with a header row of column names.
///
/// Values use Rust's shortest round-trip float formatting.
///
/// # Errors
/// Returns [`io::Error`] if writing fails.
///
/// # Examples
/// ```
/// # use pwl_cli::cli::{FeatureReport, render_csv};
/// # use pwl_core::{Graph, Label, WeisfeilerLehman, subtree_features};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let graph = Graph::new(2, [(0, 1)])?.with_labels(vec![Label::Scalar(0); 2])?;
/// let result = WeisfeilerLehman::new(0).transform(&[graph])?;
/// let report = FeatureReport { command: "subtree", matrix: subtree_features(&result)? };
/// let mut buffer = Vec::new();
/// render_csv(&report, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "it0_label_count_0\n2\n");
/// # Ok(())
/// # }
/// ```
pub fn render_csv(report: &FeatureReport, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "{}", report.matrix.column_names().join(","))?;
    for row in report.matrix.values().rows() {
        let line: Vec<String> = row.iter().map(ToString::to_string).collect();
        writeln!(writer, "{}", line.join(","))?;
    }
    Ok(())
}
