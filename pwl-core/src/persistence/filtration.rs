//! Edge filtration values derived from a numeric vertex attribute.

use std::sync::Arc;

use super::FiltrationOrder;
use crate::{Result, error::PwlError, graph::Graph};

/// Weights every edge by the later of its endpoints' attribute values.
///
/// Sublevel filtrations take the maximum endpoint value, superlevel
/// filtrations the minimum. With `normalise`, values are first divided by the
/// attribute's maximum (sublevel) or minimum (superlevel).
///
/// # Errors
/// Returns [`PwlError::MissingAttribute`] when the attribute is absent,
/// [`PwlError::ZeroNormalisationOffset`] when normalising by zero and
/// [`PwlError::Graph`] when a resulting weight is not finite.
///
/// # Examples
/// ```
/// use pwl_core::{FiltrationOrder, Graph, assign_filtration_values};
///
/// let mut path = Graph::new(3, [(0, 1), (1, 2)])?;
/// path.set_attribute("degree", vec![1.0, 2.0, 1.0])?;
/// assign_filtration_values(&mut path, "degree", FiltrationOrder::Sublevel, true)?;
/// assert_eq!(path.weights(), Some(vec![1.0, 1.0]));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn assign_filtration_values(
    graph: &mut Graph,
    attribute: &str,
    order: FiltrationOrder,
    normalise: bool,
) -> Result<()> {
    let values = graph
        .attribute(attribute)
        .ok_or_else(|| PwlError::missing_attribute(attribute))?;

    let offset = match (normalise, order) {
        (false, _) => 1.0,
        (true, FiltrationOrder::Sublevel) => {
            values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
        }
        (true, FiltrationOrder::Superlevel) => {
            values.iter().copied().fold(f64::INFINITY, f64::min)
        }
    };
    if offset == 0.0 {
        return Err(PwlError::ZeroNormalisationOffset {
            attribute: Arc::from(attribute),
        });
    }

    let select: fn(f64, f64) -> f64 = match order {
        FiltrationOrder::Sublevel => f64::max,
        FiltrationOrder::Superlevel => f64::min,
    };
    let weights: Vec<f64> = graph
        .edges()
        .iter()
        .map(|edge| select(values[edge.source()] / offset, values[edge.target()] / offset))
        .collect();
    graph.set_weights(&weights)?;
    Ok(())
}
