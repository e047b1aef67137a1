//! Weisfeiler–Lehman subtree features: per-iteration label histograms.

use ndarray::Array2;

use super::{
    contiguous_label_count,
    matrix::{FeatureBlock, FeatureColumn, FeatureMatrix},
};
use crate::{Result, wl::WlResult};

/// Counts every compressed label of every iteration, one row per graph.
///
/// Iteration `i` contributes one column per label it issued, so the block
/// widths follow [`crate::WlIteration::label_count`].
///
/// # Errors
/// Returns [`crate::PwlError::LabelRange`] when an iteration's labels are not
/// the contiguous range `0..count`.
///
/// # Examples
/// ```
/// use pwl_core::{Graph, Label, WeisfeilerLehman, subtree_features};
///
/// let path = Graph::new(3, [(0, 1), (1, 2)])?.with_labels(vec![Label::Scalar(7); 3])?;
/// let wl = WeisfeilerLehman::new(1).transform(&[path])?;
/// let features = subtree_features(&wl)?;
/// assert_eq!(features.column_names(), &["it0_label_count_0", "it1_label_count_0", "it1_label_count_1"]);
/// assert_eq!(features.values().row(0).to_vec(), vec![3.0, 2.0, 1.0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn subtree_features(result: &WlResult) -> Result<FeatureMatrix> {
    let rows = result.graph_count();
    let blocks = result
        .iterations()
        .iter()
        .map(|iteration| {
            let num_labels = contiguous_label_count(
                iteration.graphs().iter().map(|graph| graph.compressed()),
            )?;
            let mut values = Array2::zeros((rows, num_labels));
            for (row, graph) in iteration.graphs().iter().enumerate() {
                for &label in graph.compressed() {
                    values[[row, label as usize]] += 1.0;
                }
            }
            let columns = (0..num_labels as u64).map(FeatureColumn::LabelCount).collect();
            Ok(FeatureBlock { values, columns })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(FeatureMatrix::concatenate(rows, &blocks))
}
