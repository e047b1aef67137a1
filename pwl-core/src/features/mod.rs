//! Persistence-based feature vectors for collections of weighted graphs.
//!
//! Each graph becomes one row. Columns appear in a fixed order and each group
//! is present only when enabled: infinity norm, total persistence, label
//! persistence, original features, cycle persistence. The three per-label
//! groups span every compressed label of the collection, which therefore must
//! form the contiguous range `0..num_labels`.

mod matrix;
mod subtree;

use std::collections::BTreeSet;

use ndarray::Array2;
use tracing::{debug, instrument};

pub use self::{
    matrix::{FeatureBlock, FeatureColumn, FeatureMatrix},
    subtree::subtree_features,
};
use crate::{
    Result,
    error::PwlError,
    graph::Graph,
    persistence::{PersistenceCalculator, PersistenceOutcome},
};

/// Selects the feature groups and the exponent applied to persistence values.
///
/// The default enables label persistence only, with power `2`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeatureOptions {
    infinity_norm: bool,
    total_persistence: bool,
    label_persistence: bool,
    cycle_persistence: bool,
    original_features: bool,
    power: f64,
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            infinity_norm: false,
            total_persistence: false,
            label_persistence: true,
            cycle_persistence: false,
            original_features: false,
            power: 2.0,
        }
    }
}

impl FeatureOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the infinity norm column.
    #[must_use]
    pub fn with_infinity_norm(mut self, enabled: bool) -> Self {
        self.infinity_norm = enabled;
        self
    }

    /// Enables the total persistence column.
    #[must_use]
    pub fn with_total_persistence(mut self, enabled: bool) -> Self {
        self.total_persistence = enabled;
        self
    }

    /// Enables per-label sums of `persistence^p`.
    #[must_use]
    pub fn with_label_persistence(mut self, enabled: bool) -> Self {
        self.label_persistence = enabled;
        self
    }

    /// Enables the cycle persistence group.
    ///
    /// A cycle edge adds `weight^p` to the buckets of both endpoint labels.
    #[must_use]
    pub fn with_cycle_persistence(mut self, enabled: bool) -> Self {
        self.cycle_persistence = enabled;
        self
    }

    /// Enables per-label counts of diagram pairs.
    #[must_use]
    pub fn with_original_features(mut self, enabled: bool) -> Self {
        self.original_features = enabled;
        self
    }

    /// Sets the exponent `p`. Validated by [`PersistenceFeatureGenerator`].
    #[must_use]
    pub fn with_power(mut self, power: f64) -> Self {
        self.power = power;
        self
    }

    /// Whether the infinity norm column is emitted.
    #[must_use]
    #[rustfmt::skip]
    pub fn infinity_norm(&self) -> bool { self.infinity_norm }

    /// Whether the total persistence column is emitted.
    #[must_use]
    #[rustfmt::skip]
    pub fn total_persistence(&self) -> bool { self.total_persistence }

    /// Whether per-label persistence columns are emitted.
    #[must_use]
    #[rustfmt::skip]
    pub fn label_persistence(&self) -> bool { self.label_persistence }

    /// Whether per-label cycle persistence columns are emitted.
    #[must_use]
    #[rustfmt::skip]
    pub fn cycle_persistence(&self) -> bool { self.cycle_persistence }

    /// Whether per-label pair counts are emitted.
    #[must_use]
    #[rustfmt::skip]
    pub fn original_features(&self) -> bool { self.original_features }

    /// Exponent applied to persistence values.
    #[must_use]
    #[rustfmt::skip]
    pub fn power(&self) -> f64 { self.power }

    /// Returns `true` when any per-label group is enabled.
    #[must_use]
    pub fn uses_labels(&self) -> bool {
        self.label_persistence || self.original_features || self.cycle_persistence
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.power.is_finite() && self.power > 0.0 {
            Ok(())
        } else {
            Err(PwlError::InvalidPower { power: self.power })
        }
    }

    fn columns(&self, num_labels: usize) -> Vec<FeatureColumn> {
        let labels = || 0..num_labels as u64;
        let mut columns = Vec::new();
        if self.infinity_norm {
            columns.push(FeatureColumn::InfinityNorm);
        }
        if self.total_persistence {
            columns.push(FeatureColumn::TotalPersistence);
        }
        if self.label_persistence {
            columns.extend(labels().map(FeatureColumn::LabelPersistence));
        }
        if self.original_features {
            columns.extend(labels().map(FeatureColumn::OriginalFeature));
        }
        if self.cycle_persistence {
            columns.extend(labels().map(FeatureColumn::CyclePersistence));
        }
        columns
    }
}

/// Features of one collection together with the persistence outcomes they
/// were computed from.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedFeatures {
    block: FeatureBlock,
    outcomes: Vec<PersistenceOutcome>,
}

impl GeneratedFeatures {
    /// Feature values and their column descriptors.
    #[must_use]
    #[rustfmt::skip]
    pub fn block(&self) -> &FeatureBlock { &self.block }

    /// Outcomes in collection order.
    #[must_use]
    #[rustfmt::skip]
    pub fn outcomes(&self) -> &[PersistenceOutcome] { &self.outcomes }

    /// Splits into the feature block and the outcomes.
    #[must_use]
    pub fn into_parts(self) -> (FeatureBlock, Vec<PersistenceOutcome>) {
        (self.block, self.outcomes)
    }
}

/// Turns weighted graphs with compressed labels into feature rows.
///
/// # Examples
/// ```
/// use pwl_core::{FeatureOptions, Graph, PersistenceFeatureGenerator};
///
/// let mut path = Graph::new(3, [(0, 1), (1, 2)])?;
/// path.set_weights(&[1.0, 2.0])?;
/// path.set_compressed_labels(vec![0, 1, 0])?;
/// let generator = PersistenceFeatureGenerator::new(
///     FeatureOptions::new().with_power(1.0).with_total_persistence(true),
/// );
/// let features = generator.generate(&[path])?;
/// // total persistence, then label persistence for labels 0 and 1
/// assert_eq!(features.block().values().row(0).to_vec(), vec![5.0, 4.0, 1.0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersistenceFeatureGenerator {
    options: FeatureOptions,
    calculator: PersistenceCalculator,
}

impl PersistenceFeatureGenerator {
    /// Creates a generator using a default [`PersistenceCalculator`].
    #[must_use]
    pub fn new(options: FeatureOptions) -> Self {
        Self {
            options,
            calculator: PersistenceCalculator::new(),
        }
    }

    /// Replaces the calculator used for every graph.
    #[must_use]
    pub fn with_calculator(mut self, calculator: PersistenceCalculator) -> Self {
        self.calculator = calculator;
        self
    }

    /// Feature groups and power.
    #[must_use]
    #[rustfmt::skip]
    pub fn options(&self) -> &FeatureOptions { &self.options }

    /// Calculator applied to every graph.
    #[must_use]
    #[rustfmt::skip]
    pub fn calculator(&self) -> &PersistenceCalculator { &self.calculator }

    /// Computes one feature row per graph.
    ///
    /// # Errors
    /// Returns [`PwlError::InvalidPower`] for a power that is not a positive
    /// finite number, [`PwlError::MissingAttribute`] when per-label groups
    /// are enabled and a graph lacks compressed labels,
    /// [`PwlError::LabelRange`] when those labels are not contiguous, and any
    /// error of [`PersistenceCalculator::compute`].
    #[instrument(
        name = "features.generate",
        err,
        skip(self, graphs),
        fields(graphs = graphs.len(), power = self.options.power),
    )]
    pub fn generate(&self, graphs: &[Graph]) -> Result<GeneratedFeatures> {
        self.options.validate()?;
        let num_labels = if self.options.uses_labels() {
            let labels = graphs
                .iter()
                .map(|graph| {
                    graph
                        .compressed_labels()
                        .ok_or_else(|| PwlError::missing_attribute("compressed_label"))
                })
                .collect::<Result<Vec<&[u64]>>>()?;
            contiguous_label_count(labels)?
        } else {
            0
        };

        let outcomes = self.calculator.compute_all(graphs)?;
        let columns = self.options.columns(num_labels);
        let mut values = Array2::zeros((graphs.len(), columns.len()));
        for (row, (graph, outcome)) in graphs.iter().zip(&outcomes).enumerate() {
            let features = self.row(graph, outcome, num_labels)?;
            values.row_mut(row).assign(&ndarray::ArrayView1::from(&features));
        }

        debug!(labels = num_labels, columns = columns.len(), "feature block filled");
        #[cfg(feature = "metrics")]
        metrics::counter!("pwl_feature_rows").increment(graphs.len() as u64);

        Ok(GeneratedFeatures {
            block: FeatureBlock { values, columns },
            outcomes,
        })
    }

    fn row(
        &self,
        graph: &Graph,
        outcome: &PersistenceOutcome,
        num_labels: usize,
    ) -> Result<Vec<f64>> {
        let power = self.options.power;
        let diagram = outcome.diagram();
        let labels = graph.compressed_labels().unwrap_or_default();
        let bucket = |vertex: usize| {
            labels
                .get(vertex)
                .map(|&label| label as usize)
                .ok_or_else(|| PwlError::missing_attribute("compressed_label"))
        };
        let mut row = Vec::new();

        if self.options.infinity_norm {
            row.push(diagram.infinity_norm(power));
        }
        if self.options.total_persistence {
            row.push(diagram.total_persistence(power));
        }
        if self.options.label_persistence {
            let mut persistence = vec![0.0; num_labels];
            for pair in diagram {
                add_to_bucket(
                    &mut persistence,
                    bucket(pair.vertex())?,
                    pair.persistence().powf(power),
                )?;
            }
            row.extend(persistence);
        }
        if self.options.original_features {
            let mut counts = vec![0.0; num_labels];
            for pair in diagram {
                add_to_bucket(&mut counts, bucket(pair.vertex())?, 1.0)?;
            }
            row.extend(counts);
        }
        if self.options.cycle_persistence {
            let cycles = outcome.cycle_edges();
            let expected = graph.edge_count() + diagram.betti();
            if cycles.len() + diagram.len() != expected {
                return Err(PwlError::InvariantViolation {
                    invariant: "cycle edges + diagram length == edges + betti",
                    expected,
                    actual: cycles.len() + diagram.len(),
                });
            }
            let weights = graph
                .weights()
                .ok_or_else(|| PwlError::missing_attribute("weight"))?;
            let edges = graph.edges();
            let mut persistence = vec![0.0; num_labels];
            for &index in cycles {
                let (Some(weight), Some(edge)) = (weights.get(index), edges.get(index)) else {
                    return Err(PwlError::InvariantViolation {
                        invariant: "cycle edge index < edge count",
                        expected: edges.len(),
                        actual: index,
                    });
                };
                let contribution = weight.powf(power);
                let (source, target) = edge.endpoints();
                add_to_bucket(&mut persistence, bucket(source)?, contribution)?;
                add_to_bucket(&mut persistence, bucket(target)?, contribution)?;
            }
            row.extend(persistence);
        }
        Ok(row)
    }
}

fn add_to_bucket(buckets: &mut [f64], label: usize, amount: f64) -> Result<()> {
    let count = buckets.len();
    let slot = buckets
        .get_mut(label)
        .ok_or(PwlError::InvariantViolation {
            invariant: "compressed label < label count",
            expected: count,
            actual: label,
        })?;
    *slot += amount;
    Ok(())
}

/// Counts the distinct labels across `labels`, requiring them to be exactly
/// `0..count`. An empty collection has zero labels.
pub(crate) fn contiguous_label_count<'a, I>(labels: I) -> Result<usize>
where
    I: IntoIterator<Item = &'a [u64]>,
{
    let distinct: BTreeSet<u64> = labels.into_iter().flatten().copied().collect();
    let (Some(&min), Some(&max)) = (distinct.first(), distinct.last()) else {
        return Ok(0);
    };
    if min != 0 || max != distinct.len() as u64 - 1 {
        return Err(PwlError::LabelRange {
            min,
            max,
            distinct: distinct.len(),
        });
    }
    Ok(distinct.len())
}
