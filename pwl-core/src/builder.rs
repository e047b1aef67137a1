//! Builder for the persistent Weisfeiler–Lehman pipeline.
//!
//! Collects every tunable of a pipeline pass and validates them together
//! before a [`PersistentWeisfeilerLehman`] is constructed.

use crate::{
    Result,
    error::PwlError,
    features::{FeatureOptions, PersistenceFeatureGenerator},
    persistence::{FiltrationOrder, PersistenceCalculator},
    pipeline::PersistentWeisfeilerLehman,
    weights::{MetricKind, WeightAssigner},
    wl::WeisfeilerLehman,
};

/// Configures and constructs [`PersistentWeisfeilerLehman`] instances.
///
/// Defaults: three iterations, Minkowski order 2, base weight 1, sublevel
/// filtration, label persistence only with power 2, no accumulation.
///
/// # Examples
/// ```
/// use pwl_core::{FiltrationOrder, MetricKind, PipelineBuilder};
///
/// let pipeline = PipelineBuilder::new()
///     .with_iterations(2)
///     .with_metric(MetricKind::Jaccard)
///     .with_order(FiltrationOrder::Superlevel)
///     .build()?;
/// assert_eq!(pipeline.num_iterations(), 2);
/// assert_eq!(pipeline.assigner().metric(), MetricKind::Jaccard);
/// # Ok::<(), pwl_core::PwlError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineBuilder {
    num_iterations: usize,
    metric: MetricKind,
    base_weight: f64,
    accumulate: bool,
    order: FiltrationOrder,
    unpaired_value: Option<f64>,
    features: FeatureOptions,
    store_outcomes: bool,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self {
            num_iterations: 3,
            metric: MetricKind::Minkowski(2.0),
            base_weight: 1.0,
            accumulate: false,
            order: FiltrationOrder::Sublevel,
            unpaired_value: None,
            features: FeatureOptions::default(),
            store_outcomes: false,
        }
    }
}

impl PipelineBuilder {
    /// Creates a builder populated with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of WL iterations `K`; features cover `0..=K`.
    #[must_use]
    pub fn with_iterations(mut self, num_iterations: usize) -> Self {
        self.num_iterations = num_iterations;
        self
    }

    /// Selects the label distance used for edge weights.
    #[must_use]
    pub fn with_metric(mut self, metric: MetricKind) -> Self {
        self.metric = metric;
        self
    }

    /// Sets the constant added to every edge weight.
    #[must_use]
    pub fn with_base_weight(mut self, base_weight: f64) -> Self {
        self.base_weight = base_weight;
        self
    }

    /// Adds each iteration's weights to those of the previous iteration.
    #[must_use]
    pub fn with_accumulate(mut self, accumulate: bool) -> Self {
        self.accumulate = accumulate;
        self
    }

    /// Selects the filtration direction.
    #[must_use]
    pub fn with_order(mut self, order: FiltrationOrder) -> Self {
        self.order = order;
        self
    }

    /// Fixes the death value of essential pairs.
    #[must_use]
    pub fn with_unpaired_value(mut self, value: Option<f64>) -> Self {
        self.unpaired_value = value;
        self
    }

    /// Selects the feature groups and the power `p`.
    #[must_use]
    pub fn with_features(mut self, features: FeatureOptions) -> Self {
        self.features = features;
        self
    }

    /// Keeps every persistence outcome in the pipeline output.
    #[must_use]
    pub fn with_stored_outcomes(mut self, store: bool) -> Self {
        self.store_outcomes = store;
        self
    }

    /// Number of WL refinement iterations.
    #[must_use]
    #[rustfmt::skip]
    pub fn num_iterations(&self) -> usize { self.num_iterations }

    /// Label distance used for edge weights.
    #[must_use]
    #[rustfmt::skip]
    pub fn metric(&self) -> MetricKind { self.metric }

    /// Constant added to every edge weight.
    #[must_use]
    #[rustfmt::skip]
    pub fn base_weight(&self) -> f64 { self.base_weight }

    /// Filtration direction.
    #[must_use]
    #[rustfmt::skip]
    pub fn order(&self) -> FiltrationOrder { self.order }

    /// Feature groups and power.
    #[must_use]
    #[rustfmt::skip]
    pub fn features(&self) -> &FeatureOptions { &self.features }

    /// Validates the configuration and constructs the pipeline.
    ///
    /// # Errors
    /// Returns [`PwlError::InvalidPower`] for a power that is not a positive
    /// finite number, [`PwlError::InvalidMinkowskiOrder`] for a non-positive
    /// Minkowski order and [`PwlError::InvalidUnpairedValue`] for a
    /// non-finite unpaired value.
    pub fn build(self) -> Result<PersistentWeisfeilerLehman> {
        self.features.validate()?;
        let metric = self.metric.validate()?;
        if let Some(value) = self.unpaired_value
            && !value.is_finite()
        {
            return Err(PwlError::InvalidUnpairedValue { value });
        }

        let calculator = PersistenceCalculator::new()
            .with_order(self.order)
            .with_unpaired_value(self.unpaired_value);
        Ok(PersistentWeisfeilerLehman::new(
            WeisfeilerLehman::new(self.num_iterations),
            WeightAssigner::new(metric)
                .with_base_weight(self.base_weight)
                .with_accumulate(self.accumulate),
            PersistenceFeatureGenerator::new(self.features).with_calculator(calculator),
            self.store_outcomes,
        ))
    }
}
