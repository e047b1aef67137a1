//! Simple undirected graphs carrying vertex labels and edge weights.
//!
//! A [`Graph`] owns a fixed vertex set `0..n`, an ordered edge list and the
//! mutable attributes the pipeline stages read and write: original labels,
//! compressed labels, named numeric vertex attributes and edge weights.
//! Construction validates the topology once so later stages can index freely.

use std::{collections::BTreeMap, collections::HashSet, fmt, sync::Arc};

use crate::error::GraphError;

/// A vertex label.
///
/// Scalar labels come straight from input data. Composite labels carry a
/// primary value, used for mismatch scoring, and a secondary multiset compared
/// through a [`crate::MetricKind`].
///
/// # Examples
/// ```
/// use pwl_core::Label;
///
/// let label = Label::from_sequence(&[5, 1, 2, 3]).expect("non-empty");
/// assert_eq!(label.primary(), 5);
/// assert_eq!(label.secondary(), &[1, 2, 3]);
/// assert_eq!(label.to_string(), "5-1-2-3");
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Label {
    /// A single opaque value.
    Scalar(u64),
    /// A primary value followed by a secondary multiset.
    Composite {
        /// Value compared for equality between edge endpoints.
        primary: u64,
        /// Values compared through a distance metric.
        secondary: Vec<u64>,
    },
}

impl Label {
    /// Builds a label from a sequence, treating the first value as primary.
    ///
    /// Returns `None` for an empty sequence. A one-element sequence yields a
    /// [`Label::Scalar`].
    #[must_use]
    pub fn from_sequence(values: &[u64]) -> Option<Self> {
        let (&primary, rest) = values.split_first()?;
        if rest.is_empty() {
            return Some(Self::Scalar(primary));
        }
        Some(Self::Composite {
            primary,
            secondary: rest.to_vec(),
        })
    }

    /// Returns the primary value.
    #[must_use]
    pub fn primary(&self) -> u64 {
        match self {
            Self::Scalar(value) => *value,
            Self::Composite { primary, .. } => *primary,
        }
    }

    /// Returns the secondary multiset, empty for scalar labels.
    #[must_use]
    pub fn secondary(&self) -> &[u64] {
        match self {
            Self::Scalar(_) => &[],
            Self::Composite { secondary, .. } => secondary,
        }
    }
}

impl From<u64> for Label {
    fn from(value: u64) -> Self {
        Self::Scalar(value)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.primary())?;
        for value in self.secondary() {
            write!(f, "-{value}")?;
        }
        Ok(())
    }
}

/// An undirected edge with an optional weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    source: usize,
    target: usize,
    weight: Option<f64>,
}

impl Edge {
    /// Returns the first endpoint as supplied at construction.
    #[must_use]
    #[rustfmt::skip]
    pub fn source(&self) -> usize { self.source }

    /// Returns the second endpoint as supplied at construction.
    #[must_use]
    #[rustfmt::skip]
    pub fn target(&self) -> usize { self.target }

    /// Returns the assigned weight, if any.
    #[must_use]
    #[rustfmt::skip]
    pub fn weight(&self) -> Option<f64> { self.weight }

    /// Returns both endpoints as a tuple.
    #[must_use]
    pub fn endpoints(&self) -> (usize, usize) {
        (self.source, self.target)
    }
}

/// A simple undirected graph over vertices `0..vertex_count`.
///
/// # Examples
/// ```
/// use pwl_core::{Graph, Label};
///
/// let graph = Graph::new(3, [(0, 1), (1, 2)])?
///     .with_labels(vec![Label::Scalar(7), Label::Scalar(7), Label::Scalar(9)])?;
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.neighbours(1), &[0, 2]);
/// assert!(graph.weights().is_none());
/// # Ok::<(), pwl_core::GraphError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Graph {
    vertex_count: usize,
    edges: Vec<Edge>,
    adjacency: Vec<Vec<usize>>,
    labels: Option<Vec<Label>>,
    compressed_labels: Option<Vec<u64>>,
    attributes: BTreeMap<String, Vec<f64>>,
}

impl Graph {
    /// Creates an unlabelled, unweighted graph.
    ///
    /// # Errors
    /// Returns [`GraphError::VertexOutOfBounds`] for an endpoint outside
    /// `0..vertex_count`, [`GraphError::SelfLoop`] for an edge `(v, v)` and
    /// [`GraphError::ParallelEdge`] when an unordered pair repeats.
    pub fn new<I>(vertex_count: usize, edges: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut adjacency = vec![Vec::new(); vertex_count];
        let mut seen = HashSet::new();
        let mut stored = Vec::new();
        for (source, target) in edges {
            for vertex in [source, target] {
                if vertex >= vertex_count {
                    return Err(GraphError::VertexOutOfBounds {
                        vertex,
                        vertex_count,
                    });
                }
            }
            if source == target {
                return Err(GraphError::SelfLoop { vertex: source });
            }
            let key = (source.min(target), source.max(target));
            if !seen.insert(key) {
                return Err(GraphError::ParallelEdge {
                    lower: key.0,
                    upper: key.1,
                });
            }
            adjacency[source].push(target);
            adjacency[target].push(source);
            stored.push(Edge {
                source,
                target,
                weight: None,
            });
        }
        Ok(Self {
            vertex_count,
            edges: stored,
            adjacency,
            labels: None,
            compressed_labels: None,
            attributes: BTreeMap::new(),
        })
    }

    /// Attaches vertex labels, consuming the graph.
    ///
    /// # Errors
    /// Returns [`GraphError::LengthMismatch`] when `labels` does not hold one
    /// entry per vertex.
    pub fn with_labels(mut self, labels: Vec<Label>) -> Result<Self, GraphError> {
        self.set_labels(labels)?;
        Ok(self)
    }

    /// Returns the number of vertices.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertex_count(&self) -> usize { self.vertex_count }

    /// Returns the number of edges.
    #[must_use]
    #[rustfmt::skip]
    pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Returns the edges in insertion order.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[Edge] { &self.edges }

    /// Returns the neighbours of `vertex` in edge insertion order.
    ///
    /// An out-of-range vertex has no neighbours.
    #[must_use]
    pub fn neighbours(&self, vertex: usize) -> &[usize] {
        self.adjacency.get(vertex).map_or(&[], Vec::as_slice)
    }

    /// Returns the degree of `vertex`.
    #[must_use]
    pub fn degree(&self, vertex: usize) -> usize {
        self.neighbours(vertex).len()
    }

    /// Returns the vertex labels, if assigned.
    #[must_use]
    #[rustfmt::skip]
    pub fn labels(&self) -> Option<&[Label]> { self.labels.as_deref() }

    /// Replaces the vertex labels.
    ///
    /// # Errors
    /// Returns [`GraphError::LengthMismatch`] when the length differs from the
    /// vertex count.
    pub fn set_labels(&mut self, labels: Vec<Label>) -> Result<(), GraphError> {
        self.check_vertex_len("label", labels.len())?;
        self.labels = Some(labels);
        Ok(())
    }

    /// Returns the compressed labels, if assigned.
    #[must_use]
    #[rustfmt::skip]
    pub fn compressed_labels(&self) -> Option<&[u64]> { self.compressed_labels.as_deref() }

    /// Replaces the compressed labels.
    ///
    /// # Errors
    /// Returns [`GraphError::LengthMismatch`] when the length differs from the
    /// vertex count.
    pub fn set_compressed_labels(&mut self, labels: Vec<u64>) -> Result<(), GraphError> {
        self.check_vertex_len("compressed_label", labels.len())?;
        self.compressed_labels = Some(labels);
        Ok(())
    }

    /// Returns a named numeric vertex attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&[f64]> {
        self.attributes.get(name).map(Vec::as_slice)
    }

    /// Stores a named numeric vertex attribute, replacing any previous value.
    ///
    /// # Errors
    /// Returns [`GraphError::LengthMismatch`] when the length differs from the
    /// vertex count.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        values: Vec<f64>,
    ) -> Result<(), GraphError> {
        let name = name.into();
        self.check_vertex_len(&name, values.len())?;
        self.attributes.insert(name, values);
        Ok(())
    }

    /// Returns every edge weight, or `None` if any edge is unweighted.
    #[must_use]
    pub fn weights(&self) -> Option<Vec<f64>> {
        self.edges.iter().map(Edge::weight).collect()
    }

    /// Sets the weight of a single edge.
    ///
    /// # Errors
    /// Returns [`GraphError::EdgeOutOfBounds`] for an unknown edge and
    /// [`GraphError::NonFiniteWeight`] for NaN or infinite weights.
    pub fn set_weight(&mut self, edge: usize, weight: f64) -> Result<(), GraphError> {
        let edge_count = self.edges.len();
        if !weight.is_finite() {
            return Err(GraphError::NonFiniteWeight { edge, weight });
        }
        let slot = self
            .edges
            .get_mut(edge)
            .ok_or(GraphError::EdgeOutOfBounds { edge, edge_count })?;
        slot.weight = Some(weight);
        Ok(())
    }

    /// Sets every edge weight at once.
    ///
    /// The graph is left untouched when any weight is rejected.
    ///
    /// # Errors
    /// Returns [`GraphError::LengthMismatch`] when `weights` does not hold one
    /// entry per edge and [`GraphError::NonFiniteWeight`] for NaN or infinite
    /// weights.
    pub fn set_weights(&mut self, weights: &[f64]) -> Result<(), GraphError> {
        if weights.len() != self.edges.len() {
            return Err(GraphError::LengthMismatch {
                attribute: Arc::from("weight"),
                expected: self.edges.len(),
                actual: weights.len(),
            });
        }
        if let Some((edge, &weight)) = weights.iter().enumerate().find(|(_, w)| !w.is_finite()) {
            return Err(GraphError::NonFiniteWeight { edge, weight });
        }
        for (slot, &weight) in self.edges.iter_mut().zip(weights) {
            slot.weight = Some(weight);
        }
        Ok(())
    }

    /// Removes every edge weight.
    pub fn clear_weights(&mut self) {
        for edge in &mut self.edges {
            edge.weight = None;
        }
    }

    fn check_vertex_len(&self, attribute: &str, actual: usize) -> Result<(), GraphError> {
        if actual == self.vertex_count {
            return Ok(());
        }
        Err(GraphError::LengthMismatch {
            attribute: Arc::from(attribute),
            expected: self.vertex_count,
            actual,
        })
    }
}
