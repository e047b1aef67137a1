//! Command-line interface for the persistent Weisfeiler-Lehman pipeline.
//!
//! `features` runs the full relabel, weight and persistence pipeline;
//! `subtree` emits plain WL label histograms. Both read a JSON graph
//! collection and render a CSV matrix with one row per graph.

mod commands;

pub use commands::{
    Cli, CliError, Command, FeatureReport, FeaturesArgs, InputArgs, SubtreeArgs, render_csv,
    run_cli,
};
