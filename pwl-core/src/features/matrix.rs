//! Feature matrices assembled from per-iteration blocks.

use std::fmt;

use ndarray::{Array2, ArrayView2, s};

use crate::{Result, error::PwlError};

/// Identifies one feature column within an iteration block.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FeatureColumn {
    /// `max |birth − death|^p`.
    InfinityNorm,
    /// `(Σ |birth − death|^p)^(1/p)`.
    TotalPersistence,
    /// Persistence attributed to one compressed label.
    LabelPersistence(u64),
    /// Number of diagram pairs attributed to one compressed label.
    OriginalFeature(u64),
    /// Cycle-edge weight attributed to one compressed label.
    CyclePersistence(u64),
    /// Number of vertices carrying one compressed label.
    LabelCount(u64),
}

impl fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InfinityNorm => f.write_str("infinity_norm"),
            Self::TotalPersistence => f.write_str("total_persistence"),
            Self::LabelPersistence(label) => write!(f, "label_persistence_{label}"),
            Self::OriginalFeature(label) => write!(f, "original_feature_{label}"),
            Self::CyclePersistence(label) => write!(f, "cycle_persistence_{label}"),
            Self::LabelCount(label) => write!(f, "label_count_{label}"),
        }
    }
}

/// Features of one iteration: a `graphs x columns` block and its column ids.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureBlock {
    pub(crate) values: Array2<f64>,
    pub(crate) columns: Vec<FeatureColumn>,
}

impl FeatureBlock {
    /// One row per graph.
    #[must_use]
    #[rustfmt::skip]
    pub fn values(&self) -> &Array2<f64> { &self.values }

    /// Descriptor of each column.
    #[must_use]
    #[rustfmt::skip]
    pub fn columns(&self) -> &[FeatureColumn] { &self.columns }
}

/// Iteration blocks concatenated horizontally.
///
/// Column names have the form `it<i>_<column>`, for example
/// `it2_label_persistence_7`.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureMatrix {
    values: Array2<f64>,
    columns_per_iteration: Vec<usize>,
    column_names: Vec<String>,
}

impl FeatureMatrix {
    /// Concatenates blocks in iteration order.
    ///
    /// Every block must have `rows` rows.
    pub(crate) fn concatenate(rows: usize, blocks: &[FeatureBlock]) -> Self {
        let total: usize = blocks.iter().map(|block| block.columns.len()).sum();
        let mut values = Array2::zeros((rows, total));
        let mut column_names = Vec::with_capacity(total);
        let mut columns_per_iteration = Vec::with_capacity(blocks.len());
        let mut offset = 0;
        for (iteration, block) in blocks.iter().enumerate() {
            let width = block.columns.len();
            values
                .slice_mut(s![.., offset..offset + width])
                .assign(&block.values);
            column_names.extend(
                block
                    .columns
                    .iter()
                    .map(|column| format!("it{iteration}_{column}")),
            );
            columns_per_iteration.push(width);
            offset += width;
        }
        Self {
            values,
            columns_per_iteration,
            column_names,
        }
    }

    /// Returns the full `graphs x columns` matrix.
    #[must_use]
    #[rustfmt::skip]
    pub fn values(&self) -> &Array2<f64> { &self.values }

    /// Number of columns contributed by each iteration.
    #[must_use]
    #[rustfmt::skip]
    pub fn columns_per_iteration(&self) -> &[usize] { &self.columns_per_iteration }

    /// Column names, prefixed with their iteration.
    #[must_use]
    #[rustfmt::skip]
    pub fn column_names(&self) -> &[String] { &self.column_names }

    /// Returns only the columns of iterations `0..=iteration`.
    ///
    /// # Errors
    /// Returns [`PwlError::IterationOutOfRange`] when `iteration` was not
    /// computed.
    pub fn features_up_to(&self, iteration: usize) -> Result<ArrayView2<'_, f64>> {
        let available = self.columns_per_iteration.len();
        if iteration >= available {
            return Err(PwlError::IterationOutOfRange {
                requested: iteration,
                available,
            });
        }
        let end: usize = self.columns_per_iteration[..=iteration].iter().sum();
        Ok(self.values.slice(s![.., ..end]))
    }

    /// Consumes the matrix, returning its values.
    #[must_use]
    pub fn into_values(self) -> Array2<f64> {
        self.values
    }
}
