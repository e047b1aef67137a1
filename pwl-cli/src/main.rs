//! Entry point of the `pwl` binary.
//!
//! Logging is installed before anything else so failures are reported
//! through `tracing` with their stable error codes.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use pwl_cli::{
    cli::{Cli, CliError, render_csv, run_cli},
    input::InputError,
    logging::{self, LoggingError},
};
use tracing::{error, field};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let report = run_cli(cli).context("failed to compute features")?;
    let mut writer = BufWriter::new(io::stdout().lock());
    render_csv(&report, &mut writer).context("failed to write CSV")?;
    writer.flush().context("failed to flush stdout")?;
    Ok(())
}

fn error_codes(err: &anyhow::Error) -> (Option<&'static str>, Option<&'static str>) {
    match err.downcast_ref::<CliError>() {
        Some(CliError::Core(core)) => (
            Some(core.code().as_str()),
            core.graph_code().map(|code| code.as_str()),
        ),
        Some(CliError::Input(InputError::Graph { source, .. })) => {
            (None, Some(source.code().as_str()))
        }
        _ => (None, None),
    }
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main() {
        let (code, graph_code) = error_codes(&err);
        error!(
            error = %err,
            code = code.map(field::display),
            graph_code = graph_code.map(field::display),
            "command failed"
        );
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "tracing is unavailable when its own initialisation fails"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialise logging: {err}");
}
