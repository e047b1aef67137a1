//! Shared test utilities for `pwl-core`.

use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use pwl_test_support::ci::property_test_profile::ProptestRunProfile;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use test_strategy::Arbitrary;

use crate::graph::{Graph, Label};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROPTEST_CASES` and
/// `PWL_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Topology family for generated graphs.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Arbitrary)]
pub(crate) enum GraphShape {
    /// Roughly one and a half edges per vertex.
    #[weight(3)]
    Sparse,
    /// Edge probability between 0.5 and 0.9.
    #[weight(2)]
    Dense,
    /// Several components with no edges between them.
    #[weight(2)]
    Disconnected,
    /// Vertices only.
    #[weight(1)]
    Edgeless,
}

/// Generates a labelled graph with labels drawn from a small alphabet.
///
/// Small alphabets make repeated neighbourhoods, and therefore shared
/// compressed labels, likely.
pub(crate) fn generate_graph(shape: GraphShape, rng: &mut SmallRng) -> Graph {
    let vertex_count = rng.gen_range(1..=24);
    let edges = match shape {
        GraphShape::Sparse => {
            let target = vertex_count * 3 / 2;
            random_edges(vertex_count, target, rng)
        }
        GraphShape::Dense => {
            let probability = rng.gen_range(0.5..0.9);
            all_pairs(0..vertex_count)
                .filter(|_| rng.gen_bool(probability))
                .collect()
        }
        GraphShape::Disconnected => {
            let split = rng.gen_range(0..=vertex_count);
            all_pairs(0..split)
                .chain(all_pairs(split..vertex_count))
                .filter(|_| rng.gen_bool(0.4))
                .collect()
        }
        GraphShape::Edgeless => Vec::new(),
    };
    let alphabet = rng.gen_range(1..=4);
    let labels = (0..vertex_count)
        .map(|_| Label::Scalar(rng.gen_range(0..alphabet)))
        .collect();
    Graph::new(vertex_count, edges)
        .and_then(|graph| graph.with_labels(labels))
        .expect("generated graphs are simple and fully labelled")
}

/// Strategy yielding a generated graph.
pub(crate) fn graph_strategy() -> impl Strategy<Value = Graph> {
    (any::<GraphShape>(), any::<u64>()).prop_map(|(shape, seed)| {
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_graph(shape, &mut rng)
    })
}

/// Strategy yielding a small collection of generated graphs.
pub(crate) fn collection_strategy() -> impl Strategy<Value = Vec<Graph>> {
    proptest::collection::vec(graph_strategy(), 1..5)
}

fn all_pairs(range: std::ops::Range<usize>) -> impl Iterator<Item = (usize, usize)> {
    let end = range.end;
    range.flat_map(move |u| (u + 1..end).map(move |v| (u, v)))
}

fn random_edges(vertex_count: usize, target: usize, rng: &mut SmallRng) -> Vec<(usize, usize)> {
    let mut pairs: Vec<_> = all_pairs(0..vertex_count).collect();
    let mut edges = Vec::with_capacity(target.min(pairs.len()));
    while edges.len() < target && !pairs.is_empty() {
        let pick = rng.gen_range(0..pairs.len());
        edges.push(pairs.swap_remove(pick));
    }
    edges
}

/// The six-vertex graph `{(0,1),(0,2),(0,3),(1,2),(3,4),(3,5)}` labelled
/// `[5,2,3,4,1,1]`.
pub(crate) fn six_vertex_graph() -> Graph {
    labelled(
        6,
        &[(0, 1), (0, 2), (0, 3), (1, 2), (3, 4), (3, 5)],
        &[5, 2, 3, 4, 1, 1],
    )
}

/// Star with centre label 5 and leaves labelled 1, 2 and 3.
pub(crate) fn star_graph() -> Graph {
    labelled(4, &[(0, 1), (0, 2), (0, 3)], &[5, 1, 2, 3])
}

/// Two disjoint triangles, every vertex labelled 0.
pub(crate) fn two_triangles() -> Graph {
    labelled(
        6,
        &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 5), (5, 3)],
        &[0; 6],
    )
}

/// Builds a graph with scalar labels.
pub(crate) fn labelled(vertex_count: usize, edges: &[(usize, usize)], labels: &[u64]) -> Graph {
    Graph::new(vertex_count, edges.iter().copied())
        .and_then(|graph| graph.with_labels(labels.iter().copied().map(Label::Scalar).collect()))
        .expect("fixture graphs are valid")
}
