//! Zero-dimensional persistence benchmarks.
//!
//! Graphs are relabelled once and weighted with the default metric during
//! setup, so only [`PersistenceCalculator::compute_all`] is timed.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use pwl_benches::{
    error::BenchSetupError,
    params::CollectionBenchParams,
    source::{GraphCollectionConfig, generate_collection},
};
use pwl_core::{Graph, PersistenceCalculator, WeightAssigner, WeisfeilerLehman};

const SEED: u64 = 7;
const GRAPH_COUNT: usize = 32;
const VERTEX_COUNTS: &[usize] = &[64, 512, 2_048];

fn weighted_collection(vertex_count: usize) -> Result<Vec<Graph>, BenchSetupError> {
    let mut graphs = generate_collection(&GraphCollectionConfig {
        graph_count: GRAPH_COUNT,
        vertex_count,
        attachments: 3,
        label_count: 6,
        seed: SEED,
    })?;
    let wl = WeisfeilerLehman::new(1).transform(&graphs)?;
    if let Some(iteration) = wl.iteration(1) {
        for (graph, labels) in graphs.iter_mut().zip(iteration.graphs()) {
            graph.set_labels(labels.labels())?;
        }
    }
    WeightAssigner::default().assign_all(&mut graphs)?;
    Ok(graphs)
}

fn persistence_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("persistence_compute_all");
    group.sample_size(20);
    let calculator = PersistenceCalculator::new();

    for &vertex_count in VERTEX_COUNTS {
        let graphs = weighted_collection(vertex_count)?;
        let params = CollectionBenchParams {
            graph_count: GRAPH_COUNT,
            vertex_count,
        };
        group.bench_with_input(
            BenchmarkId::from_parameter(params),
            &graphs,
            |b, graphs| {
                b.iter(|| calculator.compute_all(graphs));
            },
        );
    }

    group.finish();
    Ok(())
}

fn persistence(c: &mut Criterion) {
    if let Err(err) = persistence_impl(c) {
        panic!("persistence benchmark setup failed: {err}");
    }
}

criterion_group!(benches, persistence);
criterion_main!(benches);
