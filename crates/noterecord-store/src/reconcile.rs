//! Known-id reconciliation for observers that keep derived objects per entity.
//!
//! An observer remembers which ids it has already built something for. On each
//! notification it hands the live id list to [`KnownIds::reconcile`] and gets
//! back which ids disappeared and which are new.

use std::collections::HashSet;

/// Ids added and removed since the previous reconciliation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// New ids, in the order of the live collection.
    pub added: Vec<String>,
    /// Ids no longer present, sorted.
    pub removed: Vec<String>,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Set of ids an observer has already seen.
#[derive(Debug, Clone, Default)]
pub struct KnownIds {
    known: HashSet<String>,
}

impl KnownIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an initial id list without reporting it as added.
    pub fn seeded<'a, I>(ids: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        Self {
            known: ids.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }

    /// Bring the known set in line with `current`.
    ///
    /// Known ids missing from `current` are dropped (intersection); ids in
    /// `current` not yet known are added (difference).
    pub fn reconcile<'a, I>(&mut self, current: I) -> Reconciliation
    where
        I: IntoIterator<Item = &'a str>,
    {
        let current: Vec<&str> = current.into_iter().collect();
        let live: HashSet<&str> = current.iter().copied().collect();

        let mut removed: Vec<String> = self
            .known
            .iter()
            .filter(|id| !live.contains(id.as_str()))
            .cloned()
            .collect();
        removed.sort();
        self.known.retain(|id| live.contains(id.as_str()));

        let mut added = Vec::new();
        for id in current {
            if self.known.insert(id.to_string()) {
                added.push(id.to_string());
            }
        }

        Reconciliation { added, removed }
    }
}
