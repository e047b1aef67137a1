//! Neighbourhood multisets used as WL compression keys.

use std::fmt;

/// A vertex's own label followed by its neighbours' labels in ascending order.
///
/// Only the neighbour portion is sorted; the own label always stays first.
///
/// # Examples
/// ```
/// use pwl_core::LabelMultiset;
///
/// let multiset = LabelMultiset::from_neighbourhood(3, [4, 0, 4, 2]);
/// assert_eq!(multiset.own(), 3);
/// assert_eq!(multiset.neighbours(), &[0, 2, 4, 4]);
/// assert_eq!(multiset.key(), "3-0-2-4-4");
/// ```
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct LabelMultiset {
    values: Vec<u64>,
}

impl LabelMultiset {
    /// Builds the multiset of a vertex with label `own`.
    #[must_use]
    pub fn from_neighbourhood<I>(own: u64, neighbours: I) -> Self
    where
        I: IntoIterator<Item = u64>,
    {
        let mut values = vec![own];
        values.extend(neighbours);
        if let Some((_, rest)) = values.split_first_mut() {
            rest.sort_unstable();
        }
        Self { values }
    }

    /// Builds a multiset holding only `own`.
    #[must_use]
    pub fn singleton(own: u64) -> Self {
        Self { values: vec![own] }
    }

    /// Returns the vertex's own label.
    #[must_use]
    pub fn own(&self) -> u64 {
        self.values.first().copied().unwrap_or_default()
    }

    /// Returns the sorted neighbour labels.
    #[must_use]
    pub fn neighbours(&self) -> &[u64] {
        self.values.split_first().map_or(&[], |(_, rest)| rest)
    }

    /// Returns the full ordered sequence.
    #[must_use]
    #[rustfmt::skip]
    pub fn as_slice(&self) -> &[u64] { &self.values }

    /// Renders the canonical `own-n1-n2-...` key.
    #[must_use]
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for LabelMultiset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut values = self.values.iter();
        if let Some(first) = values.next() {
            write!(f, "{first}")?;
        }
        for value in values {
            write!(f, "-{value}")?;
        }
        Ok(())
    }
}
