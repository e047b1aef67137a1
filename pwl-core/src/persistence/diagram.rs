//! Zero-dimensional persistence diagrams.

use crate::{Result, error::PwlError};

/// One `(birth, death)` point, tagged with the vertex that created it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PersistencePair {
    birth: f64,
    death: f64,
    vertex: usize,
}

impl PersistencePair {
    /// Creates a pair.
    #[must_use]
    pub fn new(birth: f64, death: f64, vertex: usize) -> Self {
        Self {
            birth,
            death,
            vertex,
        }
    }

    /// Filtration value at which the component appeared.
    #[must_use]
    #[rustfmt::skip]
    pub fn birth(&self) -> f64 { self.birth }

    /// Filtration value at which the component merged away.
    #[must_use]
    #[rustfmt::skip]
    pub fn death(&self) -> f64 { self.death }

    /// Vertex whose component this pair describes.
    #[must_use]
    #[rustfmt::skip]
    pub fn vertex(&self) -> usize { self.vertex }

    /// Returns `|birth − death|`.
    #[must_use]
    pub fn persistence(&self) -> f64 {
        (self.birth - self.death).abs()
    }
}

/// An ordered list of persistence pairs plus the number of components that
/// never merged.
///
/// # Examples
/// ```
/// use pwl_core::{PersistenceDiagram, PersistencePair};
///
/// let diagram = PersistenceDiagram::from_parts(
///     vec![PersistencePair::new(0.0, 3.0, 1), PersistencePair::new(0.0, 4.0, 0)],
///     1,
/// )?;
/// assert_eq!(diagram.total_persistence(1.0), 7.0);
/// assert_eq!(diagram.infinity_norm(2.0), 16.0);
/// # Ok::<(), pwl_core::PwlError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PersistenceDiagram {
    pairs: Vec<PersistencePair>,
    betti: usize,
}

impl PersistenceDiagram {
    /// Creates an empty diagram.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a diagram from existing pairs.
    ///
    /// The last `betti` pairs are taken to be the essential classes.
    ///
    /// # Errors
    /// Returns [`PwlError::InvariantViolation`] when `betti` exceeds the
    /// number of pairs.
    pub fn from_parts(pairs: Vec<PersistencePair>, betti: usize) -> Result<Self> {
        if betti > pairs.len() {
            return Err(PwlError::InvariantViolation {
                invariant: "betti number <= diagram length",
                expected: pairs.len(),
                actual: betti,
            });
        }
        Ok(Self { pairs, betti })
    }

    pub(super) fn push_merge(&mut self, birth: f64, death: f64, vertex: usize) {
        self.pairs.push(PersistencePair::new(birth, death, vertex));
    }

    pub(super) fn push_essential(&mut self, birth: f64, death: f64, vertex: usize) {
        self.pairs.push(PersistencePair::new(birth, death, vertex));
        self.betti += 1;
    }

    /// Returns the number of essential pairs, one per component left at the
    /// end of the filtration.
    ///
    /// [`PersistenceDiagram::remove_diagonal`] decrements this count for every
    /// essential pair it drops, so it never exceeds [`PersistenceDiagram::len`].
    #[must_use]
    #[rustfmt::skip]
    pub fn betti(&self) -> usize { self.betti }

    /// Number of pairs in the diagram.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.pairs.len() }

    /// Whether the diagram holds no pairs.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.pairs.is_empty() }

    /// All pairs in creation order: merges first, essential pairs last.
    #[must_use]
    #[rustfmt::skip]
    pub fn pairs(&self) -> &[PersistencePair] { &self.pairs }

    /// The trailing [`PersistenceDiagram::betti`] pairs recorded for
    /// components that never merged.
    #[must_use]
    pub fn essential_pairs(&self) -> &[PersistencePair] {
        self.pairs
            .split_at_checked(self.merge_count())
            .map_or(&[], |(_, essential)| essential)
    }

    fn merge_count(&self) -> usize {
        self.pairs.len().saturating_sub(self.betti)
    }

    /// Iterates over the pairs in creation order.
    pub fn iter(&self) -> std::slice::Iter<'_, PersistencePair> {
        self.pairs.iter()
    }

    /// Returns `(Σ |birth − death|^p)^(1/p)`, or `0` for an empty diagram.
    #[must_use]
    pub fn total_persistence(&self, power: f64) -> f64 {
        self.pairs
            .iter()
            .map(|pair| pair.persistence().powf(power))
            .sum::<f64>()
            .powf(power.recip())
    }

    /// Returns `max |birth − death|^p`, or `0` for an empty diagram.
    #[must_use]
    pub fn infinity_norm(&self, power: f64) -> f64 {
        self.pairs
            .iter()
            .map(|pair| pair.persistence().powf(power))
            .fold(0.0, f64::max)
    }

    /// Drops every pair whose birth equals its death.
    ///
    /// Essential pairs on the diagonal are dropped too and no longer count
    /// towards [`PersistenceDiagram::betti`].
    pub fn remove_diagonal(&mut self) {
        let off_diagonal = |pair: &PersistencePair| pair.birth != pair.death;
        let mut essential = self.pairs.split_off(self.merge_count());
        self.pairs.retain(off_diagonal);
        essential.retain(off_diagonal);
        self.betti = essential.len();
        self.pairs.append(&mut essential);
    }
}

impl<'a> IntoIterator for &'a PersistenceDiagram {
    type Item = &'a PersistencePair;
    type IntoIter = std::slice::Iter<'a, PersistencePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
