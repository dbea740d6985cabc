//! Candidate pool for random selection
//!
//! A `Pool` is an ordered, deduplicated list of model identifiers. It is built
//! once from the user's selection (or the full catalog) and passed by
//! reference into every selector call; the selector never mutates it.

use crate::models::model_id::{ExclusionSet, ModelId};
use serde::{Serialize, Serializer};
use std::collections::HashSet;

/// Ordered, deduplicated sequence of model identifiers
///
/// Duplicates are dropped on construction, keeping the first occurrence.
/// An empty pool is a valid value: callers decline to randomize in that case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pool {
    models: Vec<ModelId>,
}

impl Pool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn contains(&self, id: &ModelId) -> bool {
        self.models.contains(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModelId> {
        self.models.iter()
    }

    /// View the pool as a slice (in insertion order)
    pub fn as_slice(&self) -> &[ModelId] {
        &self.models
    }

    /// Candidates left after removing `excluded`, in pool order
    pub fn without(&self, excluded: &ExclusionSet) -> Vec<&ModelId> {
        self.models
            .iter()
            .filter(|id| !excluded.contains(*id))
            .collect()
    }

    /// Return `self` if non-empty, otherwise `fallback`
    ///
    /// Mirrors how the active pool is resolved: the user's selection wins,
    /// and the full known catalog is used only when nothing is selected.
    pub fn or_else(self, fallback: Pool) -> Pool {
        if self.is_empty() { fallback } else { self }
    }

    /// Clone the identifiers out as plain strings
    pub fn to_strings(&self) -> Vec<String> {
        self.models.iter().map(|id| id.to_string()).collect()
    }
}

impl<I> FromIterator<I> for Pool
where
    I: Into<ModelId>,
{
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let iter = iter.into_iter();
        let mut models: Vec<ModelId> = Vec::with_capacity(iter.size_hint().0);
        let mut seen: HashSet<ModelId> = HashSet::with_capacity(iter.size_hint().0);
        for id in iter {
            let id = id.into();
            if seen.insert(id.clone()) {
                models.push(id);
            }
        }
        Self { models }
    }
}

impl<'a> IntoIterator for &'a Pool {
    type Item = &'a ModelId;
    type IntoIter = std::slice::Iter<'a, ModelId>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.iter()
    }
}

impl IntoIterator for Pool {
    type Item = ModelId;
    type IntoIter = std::vec::IntoIter<ModelId>;

    fn into_iter(self) -> Self::IntoIter {
        self.models.into_iter()
    }
}

impl Serialize for Pool {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.models.serialize(serializer)
    }
}
