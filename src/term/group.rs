use std::cmp::Ordering;
use std::ops::{BitAnd, BitOr};

use smallvec::SmallVec;

use crate::term::TermIndex;
use crate::DEFAULT_NUM_ALL_PARENTS;

/// A set of [`TermIndex`] representing a group of ontology terms
///
/// Each term can occur only once in the group and the group is always
/// sorted by index. Iteration order is therefore deterministic, which
/// makes all aggregations over a group reproducible.
///
/// This group is used e.g. for the parents, the ancestors
/// or the annotated terms of an entity
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct TermGroup {
    ids: SmallVec<[TermIndex; DEFAULT_NUM_ALL_PARENTS]>,
}

impl TermGroup {
    /// Constructs a new, empty [`TermGroup`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Constructs a new, empty [`TermGroup`] with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: SmallVec::with_capacity(capacity),
        }
    }

    /// Returns `true` if the group contains no [`TermIndex`]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the number of [`TermIndex`] in the group
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Adds a new [`TermIndex`] to the group
    ///
    /// Returns whether the `TermIndex` was newly inserted. That is:
    ///
    /// - If the group did not previously contain this `TermIndex`, true is returned.
    /// - If the group already contained this `TermIndex`, false is returned.
    ///
    pub fn insert(&mut self, id: TermIndex) -> bool {
        match self.ids.binary_search(&id) {
            Ok(_) => false,
            Err(idx) => {
                self.ids.insert(idx, id);
                true
            }
        }
    }

    /// Returns `true` if the group contains the [`TermIndex`]
    pub fn contains(&self, id: &TermIndex) -> bool {
        self.ids.binary_search(id).is_ok()
    }

    /// Returns an Iterator of the [`TermIndex`] inside the group
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.ids.iter())
    }

    /// Returns the [`TermIndex`] at the given position
    ///
    /// If the position is out of bounds, `None` is returned.
    pub fn get(&self, index: usize) -> Option<&TermIndex> {
        self.ids.get(index)
    }

    /// Adds a [`TermIndex`] to the end of the group
    ///
    /// Callers must guarantee that `id` is larger than all present ids
    fn push_sorted(&mut self, id: TermIndex) {
        debug_assert!(self.ids.last().map_or(true, |last| last < &id));
        self.ids.push(id);
    }
}

impl FromIterator<TermIndex> for TermGroup {
    fn from_iter<T: IntoIterator<Item = TermIndex>>(iter: T) -> Self {
        let mut group = TermGroup::new();
        for id in iter {
            group.insert(id);
        }
        group
    }
}

impl<'a> IntoIterator for &'a TermGroup {
    type Item = TermIndex;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        Iter::new(self.ids.iter())
    }
}

/// An iterator over [`TermIndex`]
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, TermIndex>,
}

impl<'a> Iter<'a> {
    fn new(inner: std::slice::Iter<'a, TermIndex>) -> Self {
        Self { inner }
    }
}

impl Iterator for Iter<'_> {
    type Item = TermIndex;
    fn next(&mut self) -> Option<TermIndex> {
        self.inner.next().copied()
    }
}

impl BitOr for &TermGroup {
    type Output = TermGroup;

    fn bitor(self, rhs: &TermGroup) -> TermGroup {
        let mut group = TermGroup::with_capacity(self.len() + rhs.len());
        let mut lhs_iter = self.ids.iter().peekable();
        let mut rhs_iter = rhs.ids.iter().peekable();
        loop {
            let next = match (lhs_iter.peek(), rhs_iter.peek()) {
                (Some(l), Some(r)) => match l.cmp(r) {
                    Ordering::Less => lhs_iter.next(),
                    Ordering::Greater => rhs_iter.next(),
                    Ordering::Equal => {
                        rhs_iter.next();
                        lhs_iter.next()
                    }
                },
                (Some(_), None) => lhs_iter.next(),
                (None, Some(_)) => rhs_iter.next(),
                (None, None) => break,
            };
            if let Some(id) = next {
                group.push_sorted(*id);
            }
        }
        group
    }
}

impl BitAnd for &TermGroup {
    type Output = TermGroup;

    fn bitand(self, rhs: &TermGroup) -> TermGroup {
        let mut group = TermGroup::with_capacity(self.len().min(rhs.len()));
        let mut lhs_iter = self.ids.iter().peekable();
        let mut rhs_iter = rhs.ids.iter().peekable();
        while let (Some(l), Some(r)) = (lhs_iter.peek(), rhs_iter.peek()) {
            match l.cmp(r) {
                Ordering::Less => {
                    lhs_iter.next();
                }
                Ordering::Greater => {
                    rhs_iter.next();
                }
                Ordering::Equal => {
                    group.push_sorted(**l);
                    lhs_iter.next();
                    rhs_iter.next();
                }
            }
        }
        group
    }
}
