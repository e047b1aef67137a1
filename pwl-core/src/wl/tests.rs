use std::collections::HashMap;

use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::test_utils::{collection_strategy, labelled, six_vertex_graph, suite_proptest_config};

fn compressed(result: &WlResult, iteration: usize, graph: usize) -> Vec<u64> {
    result
        .iteration(iteration)
        .and_then(|it| it.graph(graph))
        .map(|labels| labels.compressed().to_vec())
        .expect("iteration and graph exist")
}

fn multiset_values(result: &WlResult, iteration: usize, graph: usize) -> Vec<Vec<u64>> {
    result
        .iteration(iteration)
        .and_then(|it| it.graph(graph))
        .map(|labels| {
            labels
                .multisets()
                .iter()
                .map(|m| m.as_slice().to_vec())
                .collect()
        })
        .expect("iteration and graph exist")
}

#[test]
fn preprocessing_maps_labels_in_first_seen_order() {
    let result = WeisfeilerLehman::new(1)
        .transform(&[six_vertex_graph()])
        .expect("labelled graph");
    let mapping: Vec<(u64, u64)> = result
        .preprocessing()
        .iter()
        .map(|(label, id)| (label.primary(), id))
        .collect();
    assert_eq!(mapping, vec![(5, 0), (2, 1), (3, 2), (4, 3), (1, 4)]);
    assert_eq!(compressed(&result, 0, 0), vec![0, 1, 2, 3, 4, 4]);
}

#[test]
fn first_iteration_compresses_neighbourhoods() {
    let result = WeisfeilerLehman::new(1)
        .transform(&[six_vertex_graph()])
        .expect("labelled graph");
    let dictionary = result
        .iteration(1)
        .and_then(WlIteration::dictionary)
        .expect("iteration 1 has a dictionary");
    let keys: Vec<(String, u64)> = dictionary
        .iter()
        .map(|(multiset, id)| (multiset.key(), id))
        .collect();
    assert_eq!(
        keys,
        vec![
            ("0-1-2-3".to_owned(), 0),
            ("1-0-2".to_owned(), 1),
            ("2-0-1".to_owned(), 2),
            ("3-0-4-4".to_owned(), 3),
            ("4-3".to_owned(), 4),
        ]
    );
    assert_eq!(compressed(&result, 1, 0), vec![0, 1, 2, 3, 4, 4]);
}

#[test]
fn dictionary_is_shared_across_the_collection() {
    let first = labelled(
        6,
        &[(0, 1), (0, 2), (0, 3), (1, 2), (2, 3), (3, 4), (3, 5)],
        &[5, 2, 3, 4, 1, 1],
    );
    let second = labelled(
        6,
        &[(0, 1), (0, 3), (1, 2), (1, 3), (2, 3), (2, 5), (3, 4)],
        &[2, 5, 3, 4, 1, 2],
    );
    let result = WeisfeilerLehman::new(1)
        .transform(&[first, second])
        .expect("labelled graphs");

    assert_eq!(
        multiset_values(&result, 1, 0),
        vec![
            vec![0, 1, 2, 3],
            vec![1, 0, 2],
            vec![2, 0, 1, 3],
            vec![3, 0, 2, 4, 4],
            vec![4, 3],
            vec![4, 3],
        ]
    );
    assert_eq!(
        multiset_values(&result, 1, 1),
        vec![
            vec![1, 0, 3],
            vec![0, 1, 2, 3],
            vec![2, 0, 1, 3],
            vec![3, 0, 1, 2, 4],
            vec![4, 3],
            vec![1, 2],
        ]
    );
    assert_eq!(compressed(&result, 1, 0), vec![0, 1, 2, 3, 4, 4]);
    assert_eq!(compressed(&result, 1, 1), vec![5, 0, 2, 6, 4, 7]);
    assert_eq!(result.iteration(1).map(WlIteration::label_count), Some(8));
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(4)]
fn records_every_iteration(#[case] iterations: usize) {
    let result = WeisfeilerLehman::new(iterations)
        .transform(&[six_vertex_graph()])
        .expect("labelled graph");
    assert_eq!(result.iterations().len(), iterations + 1);
    assert!(result.iteration(0).and_then(WlIteration::dictionary).is_none());
    assert_eq!(result.graph_count(), 1);
}

#[test]
fn isolated_vertices_keep_singleton_multisets() {
    let graph = labelled(3, &[], &[7, 7, 8]);
    let result = WeisfeilerLehman::new(2)
        .transform(&[graph])
        .expect("labelled graph");
    assert_eq!(multiset_values(&result, 2, 0), vec![vec![0], vec![0], vec![1]]);
    assert_eq!(compressed(&result, 2, 0), vec![0, 0, 1]);
}

#[rstest]
#[case::singleton(LabelMultiset::singleton(7), 7, &[], "7")]
#[case::unsorted(LabelMultiset::from_neighbourhood(2, [9, 1, 9]), 2, &[1, 9, 9], "2-1-9-9")]
#[case::own_is_not_sorted(LabelMultiset::from_neighbourhood(9, [0]), 9, &[0], "9-0")]
fn multiset_splits_own_label_from_neighbours(
    #[case] multiset: LabelMultiset,
    #[case] own: u64,
    #[case] neighbours: &[u64],
    #[case] key: &str,
) {
    assert_eq!(multiset.own(), own);
    assert_eq!(multiset.neighbours(), neighbours);
    assert_eq!(multiset.key(), key);
}

#[test]
fn unlabelled_graph_is_rejected() {
    let unlabelled = crate::Graph::new(2, [(0, 1)]).expect("valid graph");
    let err = WeisfeilerLehman::new(1)
        .transform(&[six_vertex_graph(), unlabelled])
        .expect_err("second graph lacks labels");
    assert_eq!(err, PwlError::MissingLabels { graph: 1 });
    assert_eq!(err.kind(), crate::ErrorKind::MissingAttribute);
}

#[test]
fn refine_checks_label_lengths() {
    let graph = six_vertex_graph();
    let short: &[u64] = &[0, 1];
    let err = refine(std::slice::from_ref(&graph), &[short]).expect_err("too few labels");
    assert_eq!(err.kind(), crate::ErrorKind::InvalidGraph);
}

#[test]
fn composite_labels_render_neighbourhoods() {
    let result = WeisfeilerLehman::new(1)
        .transform(&[six_vertex_graph()])
        .expect("labelled graph");
    let labels = result
        .iteration(1)
        .and_then(|it| it.graph(0))
        .map(GraphLabels::labels)
        .expect("iteration 1");
    assert_eq!(labels[4], Label::Composite { primary: 4, secondary: vec![3] });
    assert_eq!(labels[0].to_string(), "0-1-2-3");
}

#[test]
fn propagation_averages_closed_neighbourhoods() {
    let mut star = labelled(3, &[(0, 1), (0, 2)], &[0, 0, 0]);
    star.set_attribute("x", vec![3.0, 0.0, 6.0])
        .expect("length matches");
    let values = propagate_attribute(&[star], "x", 2).expect("attribute present");
    assert_eq!(values.len(), 3);
    assert_eq!(values[0][0], vec![3.0, 0.0, 6.0]);
    assert_eq!(values[1][0], vec![3.0, 1.5, 4.5]);
    assert_eq!(values[2][0], vec![3.0, 2.25, 3.75]);
}

#[test]
fn propagation_requires_the_attribute() {
    let err = propagate_attribute(&[six_vertex_graph()], "x", 1).expect_err("no attribute");
    assert_eq!(err.code(), crate::error::PwlErrorCode::MissingAttribute);
}

proptest! {
    #![proptest_config(suite_proptest_config(64))]

    #[test]
    fn transform_is_deterministic(graphs in collection_strategy()) {
        let engine = WeisfeilerLehman::new(3);
        let first = engine.transform(&graphs).expect("generated graphs are labelled");
        let second = engine.transform(&graphs).expect("generated graphs are labelled");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn each_iteration_refines_the_previous_partition(graphs in collection_strategy()) {
        let result = WeisfeilerLehman::new(3)
            .transform(&graphs)
            .expect("generated graphs are labelled");
        for pair in result.iterations().windows(2) {
            let mut parent: HashMap<u64, u64> = HashMap::new();
            for (before, after) in pair[0].graphs().iter().zip(pair[1].graphs()) {
                for (&old, &new) in before.compressed().iter().zip(after.compressed()) {
                    let seen = *parent.entry(new).or_insert(old);
                    prop_assert_eq!(seen, old);
                }
            }
        }
    }

    #[test]
    fn ids_are_contiguous_per_iteration(graphs in collection_strategy()) {
        let result = WeisfeilerLehman::new(2)
            .transform(&graphs)
            .expect("generated graphs are labelled");
        for iteration in result.iterations() {
            let max = iteration
                .graphs()
                .iter()
                .flat_map(|g| g.compressed().iter().copied())
                .max();
            let expected = max.map_or(0, |m| m as usize + 1);
            prop_assert_eq!(iteration.label_count(), expected);
        }
    }
}
