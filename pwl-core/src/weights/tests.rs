use proptest::prelude::*;
use rstest::rstest;

use super::*;
use crate::test_utils::{labelled, star_graph, suite_proptest_config};

const EPSILON: f64 = 1e-12;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPSILON,
        "expected {expected}, got {actual}"
    );
}

#[rstest]
#[case::manhattan(MetricKind::Minkowski(1.0), 2.0)]
#[case::euclidean(MetricKind::Minkowski(2.0), std::f64::consts::SQRT_2)]
#[case::chebyshev(MetricKind::Minkowski(f64::INFINITY), 1.0)]
#[case::hamming(MetricKind::Hamming, 0.5)]
#[case::jaccard(MetricKind::Jaccard, 2.0 / 3.0)]
#[case::sorensen(MetricKind::Sorensen, 0.5)]
#[case::canberra(MetricKind::Canberra, 2.0)]
#[case::angular(MetricKind::Angular, 2.0 / 3.0)]
#[case::uniform(MetricKind::Uniform, 1.0)]
fn metric_values_on_overlapping_multisets(#[case] metric: MetricKind, #[case] expected: f64) {
    assert_close(metric.distance(&[1, 2], &[2, 3]), expected);
}

#[rstest]
#[case(MetricKind::Minkowski(1.0))]
#[case(MetricKind::Minkowski(f64::INFINITY))]
#[case(MetricKind::Hamming)]
#[case(MetricKind::Jaccard)]
#[case(MetricKind::Sorensen)]
#[case(MetricKind::Canberra)]
#[case(MetricKind::Angular)]
#[case(MetricKind::KullbackLeibler)]
#[case(MetricKind::JensenShannon)]
fn empty_multisets_are_at_distance_zero(#[case] metric: MetricKind) {
    assert_eq!(metric.distance(&[], &[]), 0.0);
}

#[rstest]
#[case(MetricKind::Angular)]
#[case(MetricKind::Canberra)]
#[case(MetricKind::Sorensen)]
fn one_sided_empty_input_is_defined(#[case] metric: MetricKind) {
    assert!(metric.distance(&[4, 4], &[]).is_finite());
}

#[test]
fn divergences_vanish_on_equal_multisets() {
    assert_close(MetricKind::KullbackLeibler.distance(&[1, 1, 2], &[2, 1, 1]), 0.0);
    let kl = MetricKind::KullbackLeibler.distance(&[1, 1], &[2]);
    let js = MetricKind::JensenShannon.distance(&[1, 1], &[2]);
    assert!(kl > 0.0);
    assert_close(js, kl / 2.0);
}

#[rstest]
#[case("minkowski", MetricKind::Minkowski(1.0))]
#[case("minkowski:3", MetricKind::Minkowski(3.0))]
#[case("Minkowski:inf", MetricKind::Minkowski(f64::INFINITY))]
#[case("hamming", MetricKind::Hamming)]
#[case(" sorensen ", MetricKind::Sorensen)]
#[case("kullback_leibler", MetricKind::KullbackLeibler)]
#[case("uniform", MetricKind::Uniform)]
fn parses_metric_names(#[case] name: &str, #[case] expected: MetricKind) {
    assert_eq!(name.parse::<MetricKind>().expect("known metric"), expected);
}

#[rstest]
#[case("euclid", crate::error::PwlErrorCode::UnknownMetric)]
#[case("minkowski:abc", crate::error::PwlErrorCode::UnknownMetric)]
#[case("minkowski:0", crate::error::PwlErrorCode::InvalidMinkowskiOrder)]
#[case("minkowski:-1", crate::error::PwlErrorCode::InvalidMinkowskiOrder)]
fn rejects_bad_metric_names(#[case] name: &str, #[case] code: crate::error::PwlErrorCode) {
    let err = name.parse::<MetricKind>().expect_err("invalid metric");
    assert_eq!(err.code(), code);
    assert_eq!(err.kind(), crate::ErrorKind::Configuration);
}

#[test]
fn display_round_trips_through_from_str() {
    for metric in [
        MetricKind::Minkowski(2.5),
        MetricKind::Jaccard,
        MetricKind::JensenShannon,
    ] {
        assert_eq!(metric.to_string().parse::<MetricKind>(), Ok(metric));
    }
}

#[test]
fn uniform_weights_ignore_labels() {
    let mut star = star_graph();
    WeightAssigner::new(MetricKind::Uniform)
        .with_base_weight(0.25)
        .assign(&mut star)
        .expect("labelled graph");
    assert_eq!(star.weights(), Some(vec![1.25; 3]));
}

#[test]
fn mismatch_adds_one() {
    let mut graph = labelled(3, &[(0, 1), (1, 2)], &[4, 4, 9]);
    WeightAssigner::new(MetricKind::Minkowski(2.0))
        .assign(&mut graph)
        .expect("labelled graph");
    assert_eq!(graph.weights(), Some(vec![0.0, 1.0]));
}

#[test]
fn reassignment_is_idempotent_without_accumulation() {
    let mut graph = Graph::new(3, [(0, 1), (1, 2)])
        .and_then(|g| {
            g.with_labels(vec![
                Label::Composite { primary: 0, secondary: vec![1, 2] },
                Label::Composite { primary: 0, secondary: vec![2, 2] },
                Label::Composite { primary: 1, secondary: vec![3] },
            ])
        })
        .expect("valid graph");
    let assigner = WeightAssigner::new(MetricKind::Sorensen);
    assigner.assign(&mut graph).expect("labelled graph");
    let first = graph.weights();
    assigner.assign(&mut graph).expect("labelled graph");
    assert_eq!(graph.weights(), first);
}

#[test]
fn accumulation_adds_fresh_weights() {
    let mut graph = labelled(2, &[(0, 1)], &[1, 2]);
    graph.set_weights(&[0.5]).expect("one weight per edge");
    WeightAssigner::new(MetricKind::Hamming)
        .with_base_weight(1.0)
        .with_accumulate(true)
        .assign(&mut graph)
        .expect("labelled graph");
    assert_eq!(graph.weights(), Some(vec![0.5 + 2.0]));
}

#[test]
fn unlabelled_graph_is_rejected() {
    let mut graph = Graph::new(2, [(0, 1)]).expect("valid graph");
    let err = WeightAssigner::default()
        .assign(&mut graph)
        .expect_err("labels are required");
    assert_eq!(err.kind(), crate::ErrorKind::MissingAttribute);
}

#[test]
fn invalid_minkowski_order_is_rejected_at_assignment() {
    let mut graph = star_graph();
    let err = WeightAssigner::new(MetricKind::Minkowski(0.0))
        .assign(&mut graph)
        .expect_err("order must be positive");
    assert_eq!(err, PwlError::InvalidMinkowskiOrder { order: 0.0 });
}

#[test]
fn assign_all_reports_the_first_failure() {
    let mut graphs = vec![
        star_graph(),
        Graph::new(1, []).expect("valid graph"),
        Graph::new(2, [(0, 1)]).expect("valid graph"),
    ];
    let err = WeightAssigner::default()
        .assign_all(&mut graphs)
        .expect_err("unlabelled graphs");
    assert_eq!(err, PwlError::missing_attribute("label"));
    assert!(graphs[0].weights().is_some());
}

fn multiset() -> impl Strategy<Value = Vec<u64>> {
    proptest::collection::vec(0_u64..6, 0..10)
}

fn any_metric() -> impl Strategy<Value = MetricKind> {
    prop_oneof![
        (0.5_f64..4.0).prop_map(MetricKind::Minkowski),
        Just(MetricKind::Minkowski(f64::INFINITY)),
        Just(MetricKind::Hamming),
        Just(MetricKind::Jaccard),
        Just(MetricKind::Sorensen),
        Just(MetricKind::Canberra),
        Just(MetricKind::Angular),
        Just(MetricKind::KullbackLeibler),
        Just(MetricKind::JensenShannon),
        Just(MetricKind::Uniform),
    ]
}

proptest! {
    #![proptest_config(suite_proptest_config(256))]

    #[test]
    fn metrics_are_symmetric(metric in any_metric(), left in multiset(), right in multiset()) {
        prop_assert_eq!(metric.distance(&left, &right), metric.distance(&right, &left));
    }

    #[test]
    fn normalised_metrics_stay_in_unit_interval(left in multiset(), right in multiset()) {
        for metric in [MetricKind::Jaccard, MetricKind::Sorensen, MetricKind::Hamming] {
            let value = metric.distance(&left, &right);
            prop_assert!((0.0..=1.0).contains(&value), "{metric} gave {value}");
        }
    }

    #[test]
    fn metrics_are_never_nan(metric in any_metric(), left in multiset(), right in multiset()) {
        prop_assert!(metric.distance(&left, &right).is_finite());
    }
}
