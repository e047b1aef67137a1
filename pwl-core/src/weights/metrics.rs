//! Distances between label multisets.
//!
//! Every metric first maps both multisets onto frequency vectors over their
//! union alphabet. The alphabet is kept in ascending label order, so both
//! argument orders visit identical coordinates in identical order and each
//! metric is exactly symmetric.

use std::collections::BTreeMap;

/// Per-label occurrence counts of two multisets over their union alphabet.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct FrequencyVectors {
    left: Vec<f64>,
    right: Vec<f64>,
}

impl FrequencyVectors {
    pub(crate) fn new(left: &[u64], right: &[u64]) -> Self {
        let mut counts: BTreeMap<u64, (f64, f64)> = BTreeMap::new();
        for &label in left {
            counts.entry(label).or_default().0 += 1.0;
        }
        for &label in right {
            counts.entry(label).or_default().1 += 1.0;
        }
        let (left, right) = counts.into_values().unzip();
        Self { left, right }
    }

    fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.left.iter().copied().zip(self.right.iter().copied())
    }

    fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

pub(crate) fn minkowski(left: &[u64], right: &[u64], order: f64) -> f64 {
    let vectors = FrequencyVectors::new(left, right);
    if vectors.is_empty() {
        return 0.0;
    }
    let diffs = vectors.pairs().map(|(a, b)| (a - b).abs());
    if order.is_infinite() {
        return diffs.fold(0.0, f64::max);
    }
    diffs.map(|d| d.powf(order)).sum::<f64>().powf(order.recip())
}

pub(crate) fn hamming(left: &[u64], right: &[u64]) -> f64 {
    let total = left.len() + right.len();
    if total == 0 {
        return 0.0;
    }
    let residual: f64 = FrequencyVectors::new(left, right)
        .pairs()
        .map(|(a, b)| (a - b).abs())
        .sum();
    residual / total as f64
}

pub(crate) fn jaccard(left: &[u64], right: &[u64]) -> f64 {
    let vectors = FrequencyVectors::new(left, right);
    let (intersection, union) = vectors
        .pairs()
        .fold((0.0, 0.0), |(min, max), (a, b)| (min + a.min(b), max + a.max(b)));
    if union == 0.0 {
        return 0.0;
    }
    1.0 - intersection / union
}

pub(crate) fn sorensen(left: &[u64], right: &[u64]) -> f64 {
    let (numerator, denominator) = FrequencyVectors::new(left, right)
        .pairs()
        .fold((0.0, 0.0), |(num, den), (a, b)| {
            (num + (a - b).abs(), den + a + b)
        });
    if denominator == 0.0 {
        return 0.0;
    }
    numerator / denominator
}

pub(crate) fn canberra(left: &[u64], right: &[u64]) -> f64 {
    FrequencyVectors::new(left, right)
        .pairs()
        .filter(|(a, b)| a + b != 0.0)
        .map(|(a, b)| (a - b).abs() / (a + b))
        .sum()
}

pub(crate) fn angular(left: &[u64], right: &[u64]) -> f64 {
    let (dot, left_squares, right_squares) = FrequencyVectors::new(left, right)
        .pairs()
        .fold((0.0, 0.0, 0.0), |(dot, ls, rs), (a, b)| {
            (dot + a * b, ls + a * a, rs + b * b)
        });
    let denominator = left_squares.sqrt() * right_squares.sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    let similarity = (dot / denominator).clamp(-1.0, 1.0);
    2.0 * similarity.acos() / std::f64::consts::PI
}

/// Symmetrised divergence `weight * (KL(a‖b) + KL(b‖a))` of add-one smoothed
/// distributions.
pub(crate) fn symmetric_divergence(left: &[u64], right: &[u64], weight: f64) -> f64 {
    let vectors = FrequencyVectors::new(left, right);
    if vectors.is_empty() {
        return 0.0;
    }
    let smoothed = |values: &[f64]| -> Vec<f64> {
        let total: f64 = values.iter().map(|v| v + 1.0).sum();
        values.iter().map(|v| (v + 1.0) / total).collect()
    };
    let p = smoothed(&vectors.left);
    let q = smoothed(&vectors.right);
    let divergence = |a: &[f64], b: &[f64]| -> f64 {
        a.iter().zip(b).map(|(x, y)| x * (x / y).ln()).sum()
    };
    weight * (divergence(&p, &q) + divergence(&q, &p))
}
