//! Global `tracing` setup for the `pwl` binary.
//!
//! Diagnostics go to stderr so the CSV written to stdout stays clean. The
//! filter comes from `RUST_LOG` (default `info`) and the output format from
//! `PWL_LOG_FORMAT` (`human` or `json`).

use std::{env, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "PWL_LOG_FORMAT";

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Output format of the stderr log stream.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    /// Multi-line human-readable records.
    #[default]
    Human,
    /// One JSON object per record, with the active span list attached.
    Json,
}

/// Failures while installing the global subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// `PWL_LOG_FORMAT` was set to bytes that are not UTF-8.
    #[error("environment variable `{name}` is not valid UTF-8: {source}")]
    InvalidUnicode {
        /// Variable name.
        name: &'static str,
        /// Error returned by [`env::var`].
        #[source]
        source: env::VarError,
    },
    /// `PWL_LOG_FORMAT` named a format other than `human` or `json`.
    #[error("unknown log format `{provided}`, expected `human` or `json`")]
    UnsupportedFormat {
        /// Normalised value that was rejected.
        provided: String,
    },
    /// A global subscriber could not be installed.
    #[error("could not install the tracing subscriber: {source}")]
    InstallFailed {
        /// Error raised by `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Installs the global subscriber once per process.
///
/// Later calls return immediately. If another subscriber already owns the
/// global slot the existing one is kept.
///
/// # Errors
/// Returns [`LoggingError`] when `PWL_LOG_FORMAT` is not UTF-8 or names an
/// unknown format.
pub fn init_logging() -> Result<(), LoggingError> {
    if INSTALLED.get().is_some() {
        return Ok(());
    }
    match install(format_from_env()?) {
        Ok(()) | Err(LoggingError::InstallFailed { .. }) => {}
        Err(other) => return Err(other),
    }
    // A concurrent caller may have won the race; either way logging is set up.
    let _ = INSTALLED.set(());
    Ok(())
}

fn format_from_env() -> Result<LogFormat, LoggingError> {
    match env::var(LOG_FORMAT_ENV) {
        Ok(raw) => parse_log_format(&raw),
        Err(env::VarError::NotPresent) => Ok(LogFormat::default()),
        Err(source @ env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
            name: LOG_FORMAT_ENV,
            source,
        }),
    }
}

fn install(format: LogFormat) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let layer = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let layer = match format {
        LogFormat::Human => layer.boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    // The `log` bridge is optional; a logger installed elsewhere wins.
    let _ = LogTracer::init();

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}

fn parse_log_format(raw: &str) -> Result<LogFormat, LoggingError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "human" => Ok(LogFormat::Human),
        "json" => Ok(LogFormat::Json),
        other => Err(LoggingError::UnsupportedFormat {
            provided: other.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case("human", LogFormat::Human)]
    #[case("Human", LogFormat::Human)]
    #[case("JSON", LogFormat::Json)]
    #[case("  json\n", LogFormat::Json)]
    fn accepts_known_formats(#[case] raw: &str, #[case] expected: LogFormat) {
        assert_eq!(parse_log_format(raw).expect("known format"), expected);
    }

    #[rstest]
    #[case("xml", "xml")]
    #[case(" Pretty ", "pretty")]
    #[case("", "")]
    fn rejects_unknown_formats(#[case] raw: &str, #[case] provided_expected: &str) {
        match parse_log_format(raw) {
            Err(LoggingError::UnsupportedFormat { provided }) => {
                assert_eq!(provided, provided_expected);
            }
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }

    #[test]
    fn repeated_initialisation_is_a_no_op() {
        init_logging().expect("first call installs");
        init_logging().expect("second call returns early");
    }
}
