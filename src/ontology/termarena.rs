use std::collections::HashMap;

use crate::term::internal::TermInternal;
use crate::term::{TermId, TermIndex};
use crate::{PhenoResult, DEFAULT_NUM_TERMS};

/// Stores all terms, addressable by [`TermIndex`] and [`TermId`]
#[derive(Clone, Debug)]
pub(crate) struct Arena {
    terms: Vec<TermInternal>,
    ids: HashMap<TermId, TermIndex>,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            terms: Vec::with_capacity(DEFAULT_NUM_TERMS),
            ids: HashMap::with_capacity(DEFAULT_NUM_TERMS),
        }
    }
}

impl Arena {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Inserts a new term, unless a term with the same id already exists
    ///
    /// Returns the `TermIndex` of the (new or existing) term
    pub fn insert(&mut self, id: TermId) -> PhenoResult<TermIndex> {
        if let Some(index) = self.ids.get(&id) {
            return Ok(*index);
        }
        let index = TermIndex::try_from(self.terms.len())?;
        self.terms.push(TermInternal::new(id.clone(), index));
        self.ids.insert(id, index);
        Ok(index)
    }

    pub fn index_of(&self, id: &str) -> Option<TermIndex> {
        self.ids.get(id).copied()
    }

    pub fn get(&self, id: &str) -> Option<&TermInternal> {
        self.index_of(id).map(|index| self.get_unchecked(index))
    }

    /// # Panics
    ///
    /// When the index was not created by this arena
    pub fn get_unchecked(&self, index: TermIndex) -> &TermInternal {
        &self.terms[index.to_usize()]
    }

    /// # Panics
    ///
    /// When the index was not created by this arena
    pub fn get_unchecked_mut(&mut self, index: TermIndex) -> &mut TermInternal {
        &mut self.terms[index.to_usize()]
    }

    pub fn values(&self) -> std::slice::Iter<'_, TermInternal> {
        self.terms.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = TermIndex> + '_ {
        self.terms.iter().map(TermInternal::index)
    }

    pub fn shrink_to_fit(&mut self) {
        self.terms.shrink_to_fit();
        self.ids.shrink_to_fit();
    }
}
