//! End-to-end persistent Weisfeiler–Lehman feature extraction.
//!
//! One pass relabels the collection, then for every iteration `0..=K` writes
//! that iteration's labels onto working copies of the graphs, weights their
//! edges and turns the resulting filtrations into a feature block. Blocks are
//! concatenated horizontally in iteration order.

use ndarray::ArrayView2;
use tracing::{debug, info, instrument};

use crate::{
    Result,
    features::{FeatureBlock, FeatureMatrix, PersistenceFeatureGenerator},
    graph::Graph,
    persistence::PersistenceOutcome,
    weights::WeightAssigner,
    wl::{WeisfeilerLehman, WlResult},
};

/// Runs the full pipeline. Construct it with [`crate::PipelineBuilder`].
///
/// # Examples
/// ```
/// use pwl_core::{Graph, Label, PipelineBuilder};
///
/// let star = Graph::new(4, [(0, 1), (0, 2), (0, 3)])?.with_labels(
///     [5, 1, 2, 3].into_iter().map(Label::Scalar).collect(),
/// )?;
/// let output = PipelineBuilder::new().with_iterations(1).build()?.transform(&[star])?;
/// assert_eq!(output.features().columns_per_iteration(), &[4, 4]);
/// assert_eq!(output.features().values().nrows(), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PersistentWeisfeilerLehman {
    wl: WeisfeilerLehman,
    assigner: WeightAssigner,
    generator: PersistenceFeatureGenerator,
    store_outcomes: bool,
}

impl PersistentWeisfeilerLehman {
    pub(crate) fn new(
        wl: WeisfeilerLehman,
        assigner: WeightAssigner,
        generator: PersistenceFeatureGenerator,
        store_outcomes: bool,
    ) -> Self {
        Self {
            wl,
            assigner,
            generator,
            store_outcomes,
        }
    }

    /// Number of WL refinement iterations.
    #[must_use]
    pub fn num_iterations(&self) -> usize {
        self.wl.num_iterations()
    }

    /// Edge weight assigner used at every iteration.
    #[must_use]
    #[rustfmt::skip]
    pub fn assigner(&self) -> &WeightAssigner { &self.assigner }

    /// Feature generator used at every iteration.
    #[must_use]
    #[rustfmt::skip]
    pub fn generator(&self) -> &PersistenceFeatureGenerator { &self.generator }

    /// Computes the feature matrix of `graphs`.
    ///
    /// The input graphs are left untouched; weights are written on copies.
    /// In accumulating mode any weights already present on the inputs are
    /// the starting point of the sum.
    ///
    /// # Errors
    /// Propagates the errors of [`WeisfeilerLehman::transform`],
    /// [`WeightAssigner::assign`] and
    /// [`PersistenceFeatureGenerator::generate`].
    #[instrument(
        name = "pipeline.transform",
        err,
        skip(self, graphs),
        fields(
            graphs = graphs.len(),
            iterations = self.wl.num_iterations(),
            metric = %self.assigner.metric(),
        ),
    )]
    pub fn transform(&self, graphs: &[Graph]) -> Result<PipelineOutput> {
        let wl = self.wl.transform(graphs)?;
        let mut working = graphs.to_vec();
        let mut blocks: Vec<FeatureBlock> = Vec::with_capacity(wl.iterations().len());
        let mut outcomes = self.store_outcomes.then(Vec::new);

        for (index, iteration) in wl.iterations().iter().enumerate() {
            for (graph, labels) in working.iter_mut().zip(iteration.graphs()) {
                graph.set_labels(labels.labels())?;
                graph.set_compressed_labels(labels.compressed().to_vec())?;
            }
            self.assigner.assign_all(&mut working)?;
            let (block, iteration_outcomes) = self.generator.generate(&working)?.into_parts();
            debug!(
                iteration = index,
                columns = block.columns().len(),
                "iteration features generated"
            );
            blocks.push(block);
            if let Some(stored) = outcomes.as_mut() {
                stored.push(iteration_outcomes);
            }
        }

        let features = FeatureMatrix::concatenate(graphs.len(), &blocks);
        info!(
            columns = features.column_names().len(),
            "pipeline completed"
        );
        Ok(PipelineOutput {
            features,
            wl,
            outcomes,
        })
    }
}

/// Everything produced by [`PersistentWeisfeilerLehman::transform`].
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineOutput {
    features: FeatureMatrix,
    wl: WlResult,
    outcomes: Option<Vec<Vec<PersistenceOutcome>>>,
}

impl PipelineOutput {
    /// Feature matrix of every iteration.
    #[must_use]
    #[rustfmt::skip]
    pub fn features(&self) -> &FeatureMatrix { &self.features }

    /// Returns the WL dictionaries and labels of every iteration.
    #[must_use]
    #[rustfmt::skip]
    pub fn wl(&self) -> &WlResult { &self.wl }

    /// Returns the persistence outcomes of one iteration, in collection
    /// order, when the pipeline was built to store them.
    #[must_use]
    pub fn outcomes(&self, iteration: usize) -> Option<&[PersistenceOutcome]> {
        self.outcomes
            .as_ref()
            .and_then(|stored| stored.get(iteration))
            .map(Vec::as_slice)
    }

    /// Returns only the columns of iterations `0..=iteration`.
    ///
    /// # Errors
    /// Returns [`crate::PwlError::IterationOutOfRange`] when `iteration`
    /// exceeds the number of iterations run.
    pub fn features_up_to(&self, iteration: usize) -> Result<ArrayView2<'_, f64>> {
        self.features.features_up_to(iteration)
    }

    /// Consumes the output, returning the feature matrix.
    #[must_use]
    pub fn into_features(self) -> FeatureMatrix {
        self.features
    }
}
