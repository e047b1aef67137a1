//! WL-style smoothing of numeric vertex attributes.

use tracing::instrument;

use crate::{Result, error::PwlError, graph::Graph};

/// Smooths the attribute `name` by repeated closed-neighbourhood averaging.
///
/// The result is indexed as `[iteration][graph][vertex]`. Iteration 0 holds
/// the input values; iteration `i` replaces every value with the mean of the
/// vertex and its neighbours at iteration `i - 1`. Graphs are not modified.
///
/// # Errors
/// Returns [`PwlError::MissingAttribute`] when a graph lacks the attribute.
///
/// # Examples
/// ```
/// use pwl_core::{Graph, propagate_attribute};
///
/// let mut graph = Graph::new(2, [(0, 1)])?;
/// graph.set_attribute("heat", vec![0.0, 4.0])?;
/// let values = propagate_attribute(&[graph], "heat", 1)?;
/// assert_eq!(values[1][0], vec![2.0, 2.0]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[instrument(
    name = "wl.propagate_attribute",
    err,
    skip(graphs),
    fields(graphs = graphs.len()),
)]
pub fn propagate_attribute(
    graphs: &[Graph],
    name: &str,
    num_iterations: usize,
) -> Result<Vec<Vec<Vec<f64>>>> {
    let initial = graphs
        .iter()
        .map(|graph| {
            graph
                .attribute(name)
                .map(<[f64]>::to_vec)
                .ok_or_else(|| PwlError::missing_attribute(name))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut iterations = Vec::with_capacity(num_iterations + 1);
    iterations.push(initial);
    for _ in 0..num_iterations {
        let next: Vec<Vec<f64>> = iterations
            .last()
            .map(|previous| {
                graphs
                    .iter()
                    .zip(previous)
                    .map(|(graph, values)| smooth(graph, values))
                    .collect()
            })
            .unwrap_or_default();
        iterations.push(next);
    }
    Ok(iterations)
}

fn smooth(graph: &Graph, values: &[f64]) -> Vec<f64> {
    let mut sums = values.to_vec();
    for edge in graph.edges() {
        let (source, target) = edge.endpoints();
        sums[source] += values[target];
        sums[target] += values[source];
    }
    sums.iter()
        .enumerate()
        .map(|(vertex, sum)| sum / (graph.degree(vertex) + 1) as f64)
        .collect()
}
