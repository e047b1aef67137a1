//! End-to-end behaviour of the relabelling, weighting and persistence stages.

mod common;

use common::{labelled, six_vertex, star, two_triangles};
use ndarray::s;
use pwl_core::{
    FeatureOptions, Label, MetricKind, PersistenceCalculator, PipelineBuilder, PwlError,
    WeightAssigner, WeisfeilerLehman, subtree_features,
};
use pwl_test_support::tracing::with_recording;
use rstest::rstest;

#[test]
fn star_centre_gets_a_unique_label_and_leaf_edges_share_a_weight() {
    let mut graph = star();
    let result = WeisfeilerLehman::new(1)
        .transform(std::slice::from_ref(&graph))
        .expect("star is labelled");
    let iteration = result.iteration(1).expect("one iteration was run");
    let labels = iteration.graph(0).expect("one graph");

    let centre = labels.compressed()[0];
    assert_eq!(
        labels.compressed().iter().filter(|&&id| id == centre).count(),
        1
    );
    let dictionary = iteration.dictionary().expect("refinement dictionary");
    let keys: Vec<String> = dictionary.iter().map(|(key, _)| key.to_string()).collect();
    assert_eq!(keys, vec!["0-1-2-3", "1-0", "2-0", "3-0"]);

    graph.set_labels(labels.labels()).expect("one label per vertex");
    WeightAssigner::new(MetricKind::Uniform)
        .with_base_weight(0.5)
        .assign(&mut graph)
        .expect("labelled graph");
    assert_eq!(graph.weights(), Some(vec![1.5; 3]));
}

#[test]
fn six_vertex_graph_relabels_deterministically() {
    let result = WeisfeilerLehman::new(1)
        .transform(&[six_vertex()])
        .expect("graph is labelled");
    let preprocessing: Vec<(Label, u64)> = result
        .preprocessing()
        .iter()
        .map(|(label, id)| (label.clone(), id))
        .collect();
    assert_eq!(
        preprocessing,
        vec![
            (Label::Scalar(5), 0),
            (Label::Scalar(2), 1),
            (Label::Scalar(3), 2),
            (Label::Scalar(4), 3),
            (Label::Scalar(1), 4),
        ]
    );
    let compressed = result
        .iteration(1)
        .and_then(|iteration| iteration.graph(0))
        .expect("iteration 1 of graph 0")
        .compressed();
    assert_eq!(compressed, &[0, 1, 2, 3, 4, 4]);
}

#[test]
fn two_triangles_have_two_components() {
    let mut graph = two_triangles();
    WeightAssigner::new(MetricKind::Uniform)
        .assign(&mut graph)
        .expect("labelled graph");
    let outcome = PersistenceCalculator::new()
        .compute(&graph)
        .expect("weighted graph");
    let diagram = outcome.diagram();

    assert_eq!(diagram.betti(), 2);
    assert_eq!(diagram.len(), 6);
    assert_eq!(outcome.cycle_edges().len(), 2);
    assert!(diagram.iter().all(|pair| pair.death() == 1.0));
    let essential = &diagram.pairs()[4..];
    assert_eq!(essential.len(), 2);
}

#[rstest]
#[case(MetricKind::Minkowski(1.0))]
#[case(MetricKind::Hamming)]
#[case(MetricKind::Jaccard)]
#[case(MetricKind::Sorensen)]
#[case(MetricKind::Canberra)]
#[case(MetricKind::Angular)]
#[case(MetricKind::KullbackLeibler)]
#[case(MetricKind::Uniform)]
fn reassigning_weights_is_idempotent(#[case] metric: MetricKind) {
    let result = WeisfeilerLehman::new(1)
        .transform(&[six_vertex()])
        .expect("graph is labelled");
    let mut graph = six_vertex();
    graph
        .set_labels(result.iterations()[1].graphs()[0].labels())
        .expect("one label per vertex");
    let assigner = WeightAssigner::new(metric);
    assigner.assign(&mut graph).expect("labelled graph");
    let first = graph.weights();
    assigner.assign(&mut graph).expect("labelled graph");
    assert_eq!(graph.weights(), first);
}

#[test]
fn pipeline_features_cover_every_iteration() {
    let graphs = [star(), six_vertex(), two_triangles()];
    let output = PipelineBuilder::new()
        .with_iterations(2)
        .with_features(
            FeatureOptions::new()
                .with_total_persistence(true)
                .with_cycle_persistence(true),
        )
        .build()
        .expect("valid configuration")
        .transform(&graphs)
        .expect("labelled graphs");

    let features = output.features();
    assert_eq!(features.values().nrows(), graphs.len());
    assert_eq!(features.columns_per_iteration().len(), 3);
    let total: usize = features.columns_per_iteration().iter().sum();
    assert_eq!(features.values().ncols(), total);
    assert_eq!(features.column_names().len(), total);
    assert_eq!(features.column_names()[0], "it0_total_persistence");

    let first_two = features.columns_per_iteration()[0] + features.columns_per_iteration()[1];
    let selected = output.features_up_to(1).expect("iteration 1 exists");
    assert_eq!(selected, features.values().slice(s![.., ..first_two]));
    assert!(matches!(
        output.features_up_to(3),
        Err(PwlError::IterationOutOfRange { requested: 3, available: 3 })
    ));
}

#[test]
fn pipeline_records_its_stage_spans() {
    let graphs = [star(), labelled(2, &[(0, 1)], &[1, 2])];
    let pipeline = PipelineBuilder::new()
        .with_iterations(1)
        .build()
        .expect("defaults are valid");
    let (output, layer) = with_recording(|| pipeline.transform(&graphs));
    output.expect("labelled graphs");

    let span = layer.span("pipeline.transform").expect("pipeline span");
    assert_eq!(span.fields.get("graphs").map(String::as_str), Some("2"));
    assert_eq!(span.fields.get("iterations").map(String::as_str), Some("1"));
    assert_eq!(span.fields.get("metric").map(String::as_str), Some("minkowski:2"));
    let names = layer.span_names();
    assert!(names.iter().any(|name| name == "wl.transform"));
    assert_eq!(
        names.iter().filter(|name| *name == "features.generate").count(),
        2
    );
}

#[test]
fn subtree_features_match_label_histograms() {
    let result = WeisfeilerLehman::new(1)
        .transform(&[six_vertex()])
        .expect("graph is labelled");
    let matrix = subtree_features(&result).expect("contiguous ids");
    assert_eq!(matrix.columns_per_iteration(), &[5, 5]);
    assert_eq!(
        matrix.values().row(0).to_vec(),
        vec![1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0]
    );
}
