//! Benchmark parameter labels.

use std::fmt;

/// Size of one benchmarked graph collection.
#[derive(Clone, Copy, Debug)]
pub struct CollectionBenchParams {
    /// Number of graphs.
    pub graph_count: usize,
    /// Vertices per graph.
    pub vertex_count: usize,
}

impl fmt::Display for CollectionBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "graphs={},n={}", self.graph_count, self.vertex_count)
    }
}

/// Size of one WL run.
#[derive(Clone, Copy, Debug)]
pub struct WlBenchParams {
    /// Collection dimensions.
    pub collection: CollectionBenchParams,
    /// Refinement iterations.
    pub iterations: usize,
}

impl fmt::Display for WlBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},h={}", self.collection, self.iterations)
    }
}
