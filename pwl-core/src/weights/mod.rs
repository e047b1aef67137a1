//! Edge weights derived from vertex labels.
//!
//! For an edge `(u, v)` the weight is
//! `metric(secondary(u), secondary(v)) + [primary(u) != primary(v)] + base_weight`,
//! except for [`MetricKind::Uniform`], which ignores labels and yields
//! `1 + base_weight`.

mod metrics;

use std::{fmt, str::FromStr, sync::Arc};

use tracing::{debug, instrument};

use crate::{
    Result,
    error::PwlError,
    graph::{Graph, Label},
};

/// Distance between the secondary multisets of two labels.
///
/// # Examples
/// ```
/// use pwl_core::MetricKind;
///
/// let metric: MetricKind = "minkowski:2".parse()?;
/// assert_eq!(metric, MetricKind::Minkowski(2.0));
/// assert_eq!(metric.distance(&[1, 1], &[1]), 1.0);
/// assert_eq!("jaccard".parse::<MetricKind>()?, MetricKind::Jaccard);
/// # Ok::<(), pwl_core::PwlError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MetricKind {
    /// `p`-norm of the frequency-vector difference; `p` may be infinite.
    Minkowski(f64),
    /// Residual bag difference over the combined multiset size.
    Hamming,
    /// One minus the multiset intersection over the multiset union.
    Jaccard,
    /// `Σ|a−b| / Σ(a+b)`.
    Sorensen,
    /// `Σ|a−b|/(a+b)`, skipping coordinates where `a+b = 0`.
    Canberra,
    /// Angle between frequency vectors, scaled to `[0, 1]`.
    Angular,
    /// Symmetrised Kullback–Leibler divergence of smoothed frequencies.
    KullbackLeibler,
    /// Half of [`MetricKind::KullbackLeibler`].
    JensenShannon,
    /// Constant weight, labels ignored.
    Uniform,
}

impl MetricKind {
    /// Creates a Minkowski metric after validating its order.
    ///
    /// # Errors
    /// Returns [`PwlError::InvalidMinkowskiOrder`] unless `order > 0`.
    pub fn minkowski(order: f64) -> Result<Self> {
        if order > 0.0 {
            Ok(Self::Minkowski(order))
        } else {
            Err(PwlError::InvalidMinkowskiOrder { order })
        }
    }

    /// Computes the distance between two label multisets.
    ///
    /// Empty inputs and zero-norm denominators yield `0.0`.
    #[must_use]
    pub fn distance(&self, left: &[u64], right: &[u64]) -> f64 {
        match *self {
            Self::Minkowski(order) => metrics::minkowski(left, right, order),
            Self::Hamming => metrics::hamming(left, right),
            Self::Jaccard => metrics::jaccard(left, right),
            Self::Sorensen => metrics::sorensen(left, right),
            Self::Canberra => metrics::canberra(left, right),
            Self::Angular => metrics::angular(left, right),
            Self::KullbackLeibler => metrics::symmetric_divergence(left, right, 1.0),
            Self::JensenShannon => metrics::symmetric_divergence(left, right, 0.5),
            Self::Uniform => 1.0,
        }
    }

    pub(crate) fn validate(self) -> Result<Self> {
        match self {
            Self::Minkowski(order) => Self::minkowski(order),
            other => Ok(other),
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minkowski(order) => write!(f, "minkowski:{order}"),
            Self::Hamming => f.write_str("hamming"),
            Self::Jaccard => f.write_str("jaccard"),
            Self::Sorensen => f.write_str("sorensen"),
            Self::Canberra => f.write_str("canberra"),
            Self::Angular => f.write_str("angular"),
            Self::KullbackLeibler => f.write_str("kullback_leibler"),
            Self::JensenShannon => f.write_str("jensen_shannon"),
            Self::Uniform => f.write_str("uniform"),
        }
    }
}

impl FromStr for MetricKind {
    type Err = PwlError;

    fn from_str(name: &str) -> Result<Self> {
        let normalised = name.trim().to_ascii_lowercase();
        let unknown = || PwlError::UnknownMetric {
            name: Arc::from(name),
        };
        if let Some(order) = normalised.strip_prefix("minkowski:") {
            let order: f64 = order.parse().map_err(|_| unknown())?;
            return Self::minkowski(order);
        }
        match normalised.as_str() {
            "minkowski" => Ok(Self::Minkowski(1.0)),
            "hamming" => Ok(Self::Hamming),
            "jaccard" => Ok(Self::Jaccard),
            "sorensen" => Ok(Self::Sorensen),
            "canberra" => Ok(Self::Canberra),
            "angular" => Ok(Self::Angular),
            "kullback_leibler" => Ok(Self::KullbackLeibler),
            "jensen_shannon" => Ok(Self::JensenShannon),
            "uniform" => Ok(Self::Uniform),
            _ => Err(unknown()),
        }
    }
}

/// Assigns label-derived weights to graph edges.
///
/// # Examples
/// ```
/// use pwl_core::{Graph, Label, MetricKind, WeightAssigner};
///
/// let mut graph = Graph::new(2, [(0, 1)])?.with_labels(vec![
///     Label::Composite { primary: 0, secondary: vec![1, 2] },
///     Label::Composite { primary: 1, secondary: vec![1, 2] },
/// ])?;
/// WeightAssigner::new(MetricKind::Jaccard)
///     .with_base_weight(0.5)
///     .assign(&mut graph)?;
/// assert_eq!(graph.weights(), Some(vec![1.5]));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightAssigner {
    metric: MetricKind,
    base_weight: f64,
    accumulate: bool,
}

impl Default for WeightAssigner {
    fn default() -> Self {
        Self::new(MetricKind::Minkowski(1.0))
    }
}

impl WeightAssigner {
    /// Creates an assigner with base weight `0` that overwrites weights.
    #[must_use]
    pub fn new(metric: MetricKind) -> Self {
        Self {
            metric,
            base_weight: 0.0,
            accumulate: false,
        }
    }

    /// Sets the constant added to every edge weight.
    #[must_use]
    pub fn with_base_weight(mut self, base_weight: f64) -> Self {
        self.base_weight = base_weight;
        self
    }

    /// Adds fresh weights to existing ones instead of replacing them.
    ///
    /// Unweighted edges start from `0`.
    #[must_use]
    pub fn with_accumulate(mut self, accumulate: bool) -> Self {
        self.accumulate = accumulate;
        self
    }

    /// Returns the configured metric.
    #[must_use]
    #[rustfmt::skip]
    pub fn metric(&self) -> MetricKind { self.metric }

    /// Returns the constant added to every weight.
    #[must_use]
    #[rustfmt::skip]
    pub fn base_weight(&self) -> f64 { self.base_weight }

    /// Returns whether fresh weights are added to existing ones.
    #[must_use]
    #[rustfmt::skip]
    pub fn accumulates(&self) -> bool { self.accumulate }

    /// Computes the weight of an edge between vertices labelled `left` and
    /// `right`.
    #[must_use]
    pub fn edge_weight(&self, left: &Label, right: &Label) -> f64 {
        if matches!(self.metric, MetricKind::Uniform) {
            return 1.0 + self.base_weight;
        }
        let distance = self.metric.distance(left.secondary(), right.secondary());
        let mismatch = if left.primary() == right.primary() {
            0.0
        } else {
            1.0
        };
        distance + mismatch + self.base_weight
    }

    /// Writes a weight on every edge of `graph`.
    ///
    /// # Errors
    /// Returns [`PwlError::MissingAttribute`] when the graph has no labels,
    /// [`PwlError::InvalidMinkowskiOrder`] for a non-positive Minkowski order
    /// and [`PwlError::Graph`] when a computed weight is not finite.
    #[instrument(
        name = "weights.assign",
        err,
        skip(self, graph),
        fields(edges = graph.edge_count(), metric = %self.metric),
    )]
    pub fn assign(&self, graph: &mut Graph) -> Result<()> {
        self.metric.validate()?;
        let labels = graph
            .labels()
            .ok_or_else(|| PwlError::missing_attribute("label"))?;
        let weights: Vec<f64> = graph
            .edges()
            .iter()
            .map(|edge| {
                let fresh = self.edge_weight(&labels[edge.source()], &labels[edge.target()]);
                match (self.accumulate, edge.weight()) {
                    (true, Some(previous)) => previous + fresh,
                    _ => fresh,
                }
            })
            .collect();
        graph.set_weights(&weights)?;
        debug!(accumulate = self.accumulate, "assigned edge weights");
        Ok(())
    }

    /// Applies [`WeightAssigner::assign`] to every graph.
    ///
    /// # Errors
    /// Returns the error of the first failing graph in collection order.
    pub fn assign_all(&self, graphs: &mut [Graph]) -> Result<()> {
        #[cfg(feature = "parallel")]
        let outcomes: Vec<Result<()>> = {
            use rayon::prelude::*;

            graphs
                .par_iter_mut()
                .map(|graph| self.assign(graph))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<Result<()>> = graphs.iter_mut().map(|graph| self.assign(graph)).collect();

        outcomes.into_iter().collect()
    }
}

#[cfg(test)]
mod tests;
