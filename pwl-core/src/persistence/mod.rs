//! Zero-dimensional persistent homology of weighted graphs.
//!
//! Edges enter the filtration in weight order (ascending for sublevel,
//! descending for superlevel, ties kept in edge order). An edge joining two
//! components kills the younger one, the component whose root has the larger
//! vertex index, and emits a pair dying at the edge weight. An edge inside a
//! component is a cycle edge. Every component still alive at the end emits one
//! essential pair dying at the unpaired value.

mod diagram;
mod filtration;
mod union_find;

use std::{fmt, str::FromStr, sync::Arc};

use tracing::{debug, instrument};

pub use self::{
    diagram::{PersistenceDiagram, PersistencePair},
    filtration::assign_filtration_values,
};
use self::union_find::DisjointSetForest;
use crate::{Result, error::PwlError, graph::Graph};

/// Direction in which edges enter the filtration.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum FiltrationOrder {
    /// Ascending weights.
    #[default]
    Sublevel,
    /// Descending weights.
    Superlevel,
}

impl fmt::Display for FiltrationOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sublevel => "sublevel",
            Self::Superlevel => "superlevel",
        })
    }
}

impl FromStr for FiltrationOrder {
    type Err = PwlError;

    fn from_str(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sublevel" => Ok(Self::Sublevel),
            "superlevel" => Ok(Self::Superlevel),
            _ => Err(PwlError::UnknownOrder {
                name: Arc::from(name),
            }),
        }
    }
}

/// A persistence diagram together with the edges that closed cycles.
#[derive(Clone, Debug, PartialEq)]
pub struct PersistenceOutcome {
    diagram: PersistenceDiagram,
    cycle_edges: Vec<usize>,
}

impl PersistenceOutcome {
    /// Diagram of the filtration, merges first and essential pairs last.
    #[must_use]
    #[rustfmt::skip]
    pub fn diagram(&self) -> &PersistenceDiagram { &self.diagram }

    /// Indices of cycle edges, in filtration order.
    #[must_use]
    #[rustfmt::skip]
    pub fn cycle_edges(&self) -> &[usize] { &self.cycle_edges }

    /// Splits the outcome into its parts.
    #[must_use]
    pub fn into_parts(self) -> (PersistenceDiagram, Vec<usize>) {
        (self.diagram, self.cycle_edges)
    }
}

/// Computes persistence diagrams of weighted graphs.
///
/// # Examples
/// ```
/// use pwl_core::{FiltrationOrder, Graph, PersistenceCalculator};
///
/// let mut triangle = Graph::new(3, [(0, 1), (1, 2), (2, 0)])?;
/// triangle.set_weights(&[1.0, 2.0, 3.0])?;
/// let outcome = PersistenceCalculator::new()
///     .with_order(FiltrationOrder::Sublevel)
///     .compute(&triangle)?;
/// assert_eq!(outcome.diagram().len(), 3);
/// assert_eq!(outcome.diagram().betti(), 1);
/// assert_eq!(outcome.cycle_edges(), &[2]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersistenceCalculator {
    order: FiltrationOrder,
    unpaired_value: Option<f64>,
    vertex_attribute: Option<String>,
}

impl PersistenceCalculator {
    /// Creates a sublevel calculator with default unpaired values and zero
    /// births.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the filtration direction.
    #[must_use]
    pub fn with_order(mut self, order: FiltrationOrder) -> Self {
        self.order = order;
        self
    }

    /// Fixes the death value of essential pairs.
    ///
    /// Without it, essential pairs die at the last weight of the filtration,
    /// or at `0` when the graph has no edges.
    #[must_use]
    pub fn with_unpaired_value(mut self, value: Option<f64>) -> Self {
        self.unpaired_value = value;
        self
    }

    /// Reads births from the named vertex attribute instead of using `0`.
    #[must_use]
    pub fn with_vertex_attribute(mut self, attribute: Option<String>) -> Self {
        self.vertex_attribute = attribute;
        self
    }

    /// Filtration direction.
    #[must_use]
    #[rustfmt::skip]
    pub fn order(&self) -> FiltrationOrder { self.order }

    /// Fixed death value of essential pairs, if any.
    #[must_use]
    #[rustfmt::skip]
    pub fn unpaired_value(&self) -> Option<f64> { self.unpaired_value }

    /// Vertex attribute supplying births, if any.
    #[must_use]
    pub fn vertex_attribute(&self) -> Option<&str> {
        self.vertex_attribute.as_deref()
    }

    /// Runs the filtration over `graph`.
    ///
    /// # Errors
    /// Returns [`PwlError::MissingAttribute`] when an edge is unweighted or
    /// the configured vertex attribute is absent,
    /// [`PwlError::InvalidUnpairedValue`] for a non-finite unpaired value and
    /// [`PwlError::InvariantViolation`] if the Euler characteristic check
    /// fails.
    #[instrument(
        name = "persistence.compute",
        err,
        skip(self, graph),
        fields(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            order = %self.order,
        ),
    )]
    pub fn compute(&self, graph: &Graph) -> Result<PersistenceOutcome> {
        if let Some(value) = self.unpaired_value
            && !value.is_finite()
        {
            return Err(PwlError::InvalidUnpairedValue { value });
        }
        let weights = graph
            .weights()
            .ok_or_else(|| PwlError::missing_attribute("weight"))?;
        let births = match self.vertex_attribute.as_deref() {
            Some(name) => Some(
                graph
                    .attribute(name)
                    .ok_or_else(|| PwlError::missing_attribute(name))?,
            ),
            None => None,
        };
        let birth_of = |vertex: usize| births.map_or(0.0, |values| values[vertex]);

        let mut filtration: Vec<usize> = (0..weights.len()).collect();
        match self.order {
            FiltrationOrder::Sublevel => {
                filtration.sort_by(|&a, &b| weights[a].total_cmp(&weights[b]));
            }
            FiltrationOrder::Superlevel => {
                filtration.sort_by(|&a, &b| weights[b].total_cmp(&weights[a]));
            }
        }

        let edges = graph.edges();
        let mut forest = DisjointSetForest::new(graph.vertex_count());
        let mut diagram = PersistenceDiagram::new();
        let mut cycle_edges = Vec::new();
        for &index in &filtration {
            let (mut u, mut v) = edges[index].endpoints();
            let mut younger = forest.find(u);
            let mut older = forest.find(v);
            if younger == older {
                cycle_edges.push(index);
                continue;
            }
            if younger < older {
                std::mem::swap(&mut u, &mut v);
                std::mem::swap(&mut younger, &mut older);
            }
            forest.merge(u, v);
            diagram.push_merge(birth_of(younger), weights[index], younger);
        }

        let unpaired = self
            .unpaired_value
            .or_else(|| filtration.last().map(|&index| weights[index]))
            .unwrap_or(0.0);
        for root in forest.roots() {
            diagram.push_essential(birth_of(root), unpaired, root);
        }

        check_euler_characteristic(graph, &diagram, cycle_edges.len())?;
        debug!(
            cycles = cycle_edges.len(),
            betti = diagram.betti(),
            "filtration completed"
        );
        #[cfg(feature = "metrics")]
        metrics::counter!("pwl_persistence_cycle_edges").increment(cycle_edges.len() as u64);

        Ok(PersistenceOutcome {
            diagram,
            cycle_edges,
        })
    }

    /// Applies [`PersistenceCalculator::compute`] to every graph.
    ///
    /// # Errors
    /// Returns the error of the first failing graph in collection order.
    pub fn compute_all(&self, graphs: &[Graph]) -> Result<Vec<PersistenceOutcome>> {
        #[cfg(feature = "parallel")]
        let outcomes: Vec<Result<PersistenceOutcome>> = {
            use rayon::prelude::*;

            graphs.par_iter().map(|graph| self.compute(graph)).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<Result<PersistenceOutcome>> =
            graphs.iter().map(|graph| self.compute(graph)).collect();

        outcomes.into_iter().collect()
    }
}

fn check_euler_characteristic(
    graph: &Graph,
    diagram: &PersistenceDiagram,
    cycles: usize,
) -> Result<()> {
    let edges = graph.edge_count();
    let roots = diagram.betti();
    if edges + roots != graph.vertex_count() + cycles {
        return Err(PwlError::InvariantViolation {
            invariant: "edges + roots == vertices + cycle edges",
            expected: graph.vertex_count() + cycles,
            actual: edges + roots,
        });
    }
    let expected_len = edges - cycles + roots;
    if diagram.len() != expected_len {
        return Err(PwlError::InvariantViolation {
            invariant: "diagram length == merges + roots",
            expected: expected_len,
            actual: diagram.len(),
        });
    }
    Ok(())
}
