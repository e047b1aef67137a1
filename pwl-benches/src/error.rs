//! Benchmark setup error type.

use pwl_core::{GraphError, PwlError};

/// Errors raised while preparing benchmark inputs.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// A generated graph failed validation.
    #[error("graph generation failed: {0}")]
    Graph(#[from] GraphError),
    /// A pipeline stage failed during setup.
    #[error("pipeline setup failed: {0}")]
    Pwl(#[from] PwlError),
    /// A parameter that must be positive was zero.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// Parameter that was zero.
        context: &'static str,
    },
}
