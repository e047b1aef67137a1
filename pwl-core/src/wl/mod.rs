//! Weisfeiler–Lehman relabelling over a graph collection.
//!
//! Each iteration replaces every vertex label with the id of its
//! neighbourhood multiset. Ids come from one [`LabelDictionary`] per
//! iteration that is shared by the whole collection, so equal neighbourhoods
//! in different graphs always compress to the same label.
//!
//! Multisets are gathered per graph (in parallel when the `parallel` feature
//! is enabled). Id assignment then walks graphs in collection order and
//! vertices in index order, so the ids are identical with or without
//! parallelism.

mod compressor;
mod multiset;
mod propagation;

use std::sync::Arc;

use tracing::{debug, info, instrument};

pub use self::{
    compressor::{LabelCompressor, LabelDictionary},
    multiset::LabelMultiset,
    propagation::propagate_attribute,
};
use crate::{
    Result,
    error::{GraphError, PwlError},
    graph::{Graph, Label},
};

/// Labels of one graph at one iteration.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GraphLabels {
    multisets: Vec<LabelMultiset>,
    compressed: Vec<u64>,
}

impl GraphLabels {
    /// Returns the per-vertex neighbourhood multisets.
    ///
    /// At iteration 0 each multiset is the singleton of the preprocessed label.
    #[must_use]
    #[rustfmt::skip]
    pub fn multisets(&self) -> &[LabelMultiset] { &self.multisets }

    /// Returns the per-vertex compressed labels.
    #[must_use]
    #[rustfmt::skip]
    pub fn compressed(&self) -> &[u64] { &self.compressed }

    /// Returns the multisets as [`Label`] values, own label first.
    #[must_use]
    pub fn labels(&self) -> Vec<Label> {
        self.multisets
            .iter()
            .map(|multiset| match multiset.neighbours() {
                [] => Label::Scalar(multiset.own()),
                rest => Label::Composite {
                    primary: multiset.own(),
                    secondary: rest.to_vec(),
                },
            })
            .collect()
    }
}

/// The outcome of one WL iteration across the whole collection.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WlIteration {
    dictionary: Option<LabelDictionary<LabelMultiset>>,
    label_count: usize,
    graphs: Vec<GraphLabels>,
}

impl WlIteration {
    /// Returns the multiset dictionary, absent for iteration 0.
    #[must_use]
    pub fn dictionary(&self) -> Option<&LabelDictionary<LabelMultiset>> {
        self.dictionary.as_ref()
    }

    /// Returns the number of distinct compressed labels in this iteration.
    #[must_use]
    #[rustfmt::skip]
    pub fn label_count(&self) -> usize { self.label_count }

    /// Returns the labels of every graph, in collection order.
    #[must_use]
    #[rustfmt::skip]
    pub fn graphs(&self) -> &[GraphLabels] { &self.graphs }

    /// Returns the labels of one graph.
    #[must_use]
    pub fn graph(&self, index: usize) -> Option<&GraphLabels> {
        self.graphs.get(index)
    }
}

/// Everything produced by [`WeisfeilerLehman::transform`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WlResult {
    preprocessing: LabelDictionary<Label>,
    iterations: Vec<WlIteration>,
}

impl WlResult {
    /// Returns the mapping from original labels to iteration-0 ids.
    #[must_use]
    pub fn preprocessing(&self) -> &LabelDictionary<Label> {
        &self.preprocessing
    }

    /// Returns iterations `0..=K` in order.
    #[must_use]
    #[rustfmt::skip]
    pub fn iterations(&self) -> &[WlIteration] { &self.iterations }

    /// Returns one iteration.
    #[must_use]
    pub fn iteration(&self, index: usize) -> Option<&WlIteration> {
        self.iterations.get(index)
    }

    /// Returns the number of graphs in the collection.
    #[must_use]
    pub fn graph_count(&self) -> usize {
        self.iterations.first().map_or(0, |it| it.graphs.len())
    }
}

/// The WL relabelling engine.
///
/// # Examples
/// ```
/// use pwl_core::{Graph, Label, WeisfeilerLehman};
///
/// let path = Graph::new(3, [(0, 1), (1, 2)])?
///     .with_labels(vec![Label::Scalar(1); 3])?;
/// let result = WeisfeilerLehman::new(1).transform(&[path])?;
/// let labels = result.iteration(1).and_then(|it| it.graph(0)).expect("iteration 1");
/// assert_eq!(labels.compressed(), &[0, 1, 0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WeisfeilerLehman {
    num_iterations: usize,
}

impl WeisfeilerLehman {
    /// Creates an engine running `num_iterations` refinement rounds.
    #[must_use]
    pub fn new(num_iterations: usize) -> Self {
        Self { num_iterations }
    }

    /// Returns the configured number of refinement rounds.
    #[must_use]
    #[rustfmt::skip]
    pub fn num_iterations(&self) -> usize { self.num_iterations }

    /// Relabels every graph for iterations `0..=K`.
    ///
    /// Iteration 0 holds the original labels mapped to ids in first-seen
    /// order across the collection. Input graphs are not modified.
    ///
    /// # Errors
    /// Returns [`PwlError::MissingLabels`] when a graph has no vertex labels.
    #[instrument(
        name = "wl.transform",
        err,
        skip(self, graphs),
        fields(graphs = graphs.len(), iterations = self.num_iterations),
    )]
    pub fn transform(&self, graphs: &[Graph]) -> Result<WlResult> {
        let mut preprocessing = LabelDictionary::new();
        let mut initial = Vec::with_capacity(graphs.len());
        for (index, graph) in graphs.iter().enumerate() {
            let labels = graph
                .labels()
                .ok_or(PwlError::MissingLabels { graph: index })?;
            let ids: Vec<u64> = labels
                .iter()
                .map(|label| preprocessing.get_or_issue(label.clone()))
                .collect();
            initial.push(GraphLabels {
                multisets: ids.iter().copied().map(LabelMultiset::singleton).collect(),
                compressed: ids,
            });
        }
        debug!(labels = preprocessing.len(), "preprocessed original labels");

        let mut iterations = Vec::with_capacity(self.num_iterations + 1);
        iterations.push(WlIteration {
            dictionary: None,
            label_count: preprocessing.len(),
            graphs: initial,
        });

        for iteration in 1..=self.num_iterations {
            let current: Vec<&[u64]> = iterations
                .last()
                .map(|prev| prev.graphs.iter().map(|g| g.compressed()).collect())
                .unwrap_or_default();
            let next = refine(graphs, &current)?;
            debug!(
                iteration,
                labels = next.label_count,
                "completed refinement round"
            );
            iterations.push(next);
        }

        info!(
            final_labels = iterations.last().map_or(0, WlIteration::label_count),
            "WL relabelling completed"
        );
        Ok(WlResult {
            preprocessing,
            iterations,
        })
    }
}

/// Runs one refinement round from the given per-graph labels.
///
/// This is the body of every [`WeisfeilerLehman::transform`] iteration,
/// exposed so a single round can be inspected in isolation.
///
/// # Errors
/// Returns [`GraphError::LengthMismatch`] (wrapped in [`PwlError::Graph`])
/// when `labels` does not match the graphs' vertex counts.
pub fn refine(graphs: &[Graph], labels: &[&[u64]]) -> Result<WlIteration> {
    if labels.len() != graphs.len() {
        return Err(GraphError::LengthMismatch {
            attribute: Arc::from("graph labels"),
            expected: graphs.len(),
            actual: labels.len(),
        }
        .into());
    }
    for (graph, current) in graphs.iter().zip(labels) {
        if graph.vertex_count() != current.len() {
            return Err(GraphError::LengthMismatch {
                attribute: Arc::from("label"),
                expected: graph.vertex_count(),
                actual: current.len(),
            }
            .into());
        }
    }

    let gathered = gather_multisets(graphs, labels);

    // Ids are issued sequentially so they do not depend on scheduling.
    let mut dictionary = LabelDictionary::new();
    let graphs = gathered
        .into_iter()
        .map(|multisets| {
            let compressed = multisets
                .iter()
                .map(|multiset| dictionary.get_or_issue(multiset.clone()))
                .collect();
            GraphLabels {
                multisets,
                compressed,
            }
        })
        .collect();

    #[cfg(feature = "metrics")]
    metrics::counter!("pwl_wl_labels_issued").increment(dictionary.len() as u64);

    Ok(WlIteration {
        label_count: dictionary.len(),
        dictionary: Some(dictionary),
        graphs,
    })
}

fn neighbourhood_multisets(graph: &Graph, labels: &[u64]) -> Vec<LabelMultiset> {
    (0..graph.vertex_count())
        .map(|vertex| {
            let neighbours = graph.neighbours(vertex).iter().map(|&n| labels[n]);
            LabelMultiset::from_neighbourhood(labels[vertex], neighbours)
        })
        .collect()
}

#[cfg(feature = "parallel")]
fn gather_multisets(graphs: &[Graph], labels: &[&[u64]]) -> Vec<Vec<LabelMultiset>> {
    use rayon::prelude::*;

    graphs
        .par_iter()
        .zip(labels.par_iter())
        .map(|(graph, current)| neighbourhood_multisets(graph, current))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn gather_multisets(graphs: &[Graph], labels: &[&[u64]]) -> Vec<Vec<LabelMultiset>> {
    graphs
        .iter()
        .zip(labels)
        .map(|(graph, current)| neighbourhood_multisets(graph, current))
        .collect()
}

#[cfg(test)]
mod tests;
