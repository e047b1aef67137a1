//! Seeded random labelled graphs.
//!
//! Each vertex `v > 0` attaches to up to `attachments` distinct earlier
//! vertices, so generated graphs never contain self-loops or parallel edges.
//! Labels are drawn uniformly from `0..label_count`.

use pwl_core::{Graph, Label};
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::index};

use crate::error::BenchSetupError;

/// Shape of a generated graph collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphCollectionConfig {
    /// Number of graphs to generate.
    pub graph_count: usize,
    /// Vertices per graph.
    pub vertex_count: usize,
    /// Maximum number of earlier vertices each vertex connects to.
    pub attachments: usize,
    /// Number of distinct initial labels.
    pub label_count: u64,
    /// Seed for the generator.
    pub seed: u64,
}

/// Generates a collection of labelled graphs.
///
/// # Errors
/// Returns [`BenchSetupError::ZeroValue`] when `vertex_count`, `attachments`
/// or `label_count` is zero.
///
/// # Examples
/// ```
/// use pwl_benches::source::{GraphCollectionConfig, generate_collection};
///
/// let graphs = generate_collection(&GraphCollectionConfig {
///     graph_count: 2,
///     vertex_count: 10,
///     attachments: 2,
///     label_count: 3,
///     seed: 7,
/// })?;
/// assert_eq!(graphs.len(), 2);
/// assert_eq!(graphs[0].edge_count(), 17);
/// # Ok::<(), pwl_benches::error::BenchSetupError>(())
/// ```
pub fn generate_collection(
    config: &GraphCollectionConfig,
) -> Result<Vec<Graph>, BenchSetupError> {
    validate(config)?;
    let mut rng = SmallRng::seed_from_u64(config.seed);
    (0..config.graph_count)
        .map(|_| generate_graph(config, &mut rng))
        .collect()
}

const fn validate(config: &GraphCollectionConfig) -> Result<(), BenchSetupError> {
    if config.vertex_count == 0 {
        return Err(BenchSetupError::ZeroValue {
            context: "vertex_count",
        });
    }
    if config.attachments == 0 {
        return Err(BenchSetupError::ZeroValue {
            context: "attachments",
        });
    }
    if config.label_count == 0 {
        return Err(BenchSetupError::ZeroValue {
            context: "label_count",
        });
    }
    Ok(())
}

fn generate_graph(
    config: &GraphCollectionConfig,
    rng: &mut SmallRng,
) -> Result<Graph, BenchSetupError> {
    let mut edges = Vec::new();
    for vertex in 1..config.vertex_count {
        let amount = config.attachments.min(vertex);
        edges.extend(
            index::sample(rng, vertex, amount)
                .into_iter()
                .map(|earlier| (earlier, vertex)),
        );
    }
    let labels = (0..config.vertex_count)
        .map(|_| Label::Scalar(rng.gen_range(0..config.label_count)))
        .collect();
    Ok(Graph::new(config.vertex_count, edges)?.with_labels(labels)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn config(seed: u64) -> GraphCollectionConfig {
        GraphCollectionConfig {
            graph_count: 3,
            vertex_count: 12,
            attachments: 3,
            label_count: 4,
            seed,
        }
    }

    #[rstest]
    fn same_seed_yields_same_collection() -> Result<(), BenchSetupError> {
        assert_eq!(
            generate_collection(&config(11))?,
            generate_collection(&config(11))?
        );
        Ok(())
    }

    #[rstest]
    fn edge_count_follows_attachments() -> Result<(), BenchSetupError> {
        // 1 + 2 + 3 * 9
        for graph in generate_collection(&config(5))? {
            assert_eq!(graph.edge_count(), 30);
            assert!(
                graph
                    .labels()
                    .is_some_and(|labels| labels.iter().all(|label| label.primary() < 4))
            );
        }
        Ok(())
    }

    #[rstest]
    #[case("vertex_count", GraphCollectionConfig { vertex_count: 0, ..config(1) })]
    #[case("attachments", GraphCollectionConfig { attachments: 0, ..config(1) })]
    #[case("label_count", GraphCollectionConfig { label_count: 0, ..config(1) })]
    fn rejects_zero_parameters(#[case] expected: &str, #[case] config: GraphCollectionConfig) {
        assert!(matches!(
            generate_collection(&config),
            Err(BenchSetupError::ZeroValue { context }) if context == expected
        ));
    }
}
