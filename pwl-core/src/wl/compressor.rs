//! Label id issuance and the dictionaries built on top of it.

use std::{collections::HashMap, hash::Hash};

/// Issues contiguous label ids starting at zero.
///
/// One compressor lives for exactly one dictionary; dropping the dictionary
/// at the end of an iteration resets the counter.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LabelCompressor {
    next: u64,
}

impl LabelCompressor {
    /// Creates a compressor whose first id is `0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next unused id and advances the counter.
    pub fn issue(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }

    /// Returns how many ids have been issued.
    #[must_use]
    #[rustfmt::skip]
    pub fn issued(&self) -> u64 { self.next }
}

/// Maps keys to compressed ids in first-seen order.
///
/// Two keys that compare equal always receive the same id, regardless of
/// which graph they came from.
///
/// # Examples
/// ```
/// use pwl_core::LabelDictionary;
///
/// let mut dictionary = LabelDictionary::new();
/// assert_eq!(dictionary.get_or_issue("b"), 0);
/// assert_eq!(dictionary.get_or_issue("a"), 1);
/// assert_eq!(dictionary.get_or_issue("b"), 0);
/// assert_eq!(dictionary.len(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct LabelDictionary<K> {
    keys: Vec<K>,
    index: HashMap<K, u64>,
    compressor: LabelCompressor,
}

impl<K> Default for LabelDictionary<K> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            index: HashMap::new(),
            compressor: LabelCompressor::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> LabelDictionary<K> {
    /// Creates an empty dictionary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `key`, issuing a fresh one if it is new.
    pub fn get_or_issue(&mut self, key: K) -> u64 {
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = self.compressor.issue();
        self.keys.push(key.clone());
        self.index.insert(key, id);
        id
    }

    /// Looks up an existing id.
    #[must_use]
    pub fn get(&self, key: &K) -> Option<u64> {
        self.index.get(key).copied()
    }

    /// Returns the key that received `id`.
    #[must_use]
    pub fn key(&self, id: u64) -> Option<&K> {
        usize::try_from(id).ok().and_then(|idx| self.keys.get(idx))
    }

    /// Returns the number of distinct keys.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.keys.len() }

    /// Returns whether no key has been seen yet.
    #[must_use]
    #[rustfmt::skip]
    pub fn is_empty(&self) -> bool { self.keys.is_empty() }

    /// Iterates over `(key, id)` pairs in issue order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, u64)> {
        self.keys.iter().zip(0_u64..)
    }
}

impl<K: Eq + Hash> PartialEq for LabelDictionary<K> {
    fn eq(&self, other: &Self) -> bool {
        self.keys == other.keys
    }
}

impl<K: Eq + Hash> Eq for LabelDictionary<K> {}
