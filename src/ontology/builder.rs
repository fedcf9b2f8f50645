use std::marker::PhantomData;

use tracing::debug;

use crate::ontology::termarena::Arena;
use crate::term::{TermGroup, TermId, TermIndex};
use crate::{Ontology, PhenoError, PhenoResult, DEFAULT_NUM_ALL_PARENTS};

/// Builder state: terms can be added
pub struct LooseCollection;
/// Builder state: all terms are present, parent connections can be added
pub struct AllTerms;

fn transition_state<TX, TY>(builder: Builder<TX>) -> Builder<TY> {
    Builder::<TY> {
        terms: builder.terms,
        n_edges: builder.n_edges,
        state: PhantomData,
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Visit {
    New,
    InProgress,
    Done,
}

/// Builds an [`Ontology`] step by step
///
/// ```text
/// Builder<LooseCollection>
/// |
/// terms_complete()
/// |
/// V
/// Builder<AllTerms>
/// |
/// connect_all_terms()
/// |
/// V
/// Ontology
/// ```
///
/// Most callers want [`Ontology::from_edges`] instead, which runs all steps.
///
/// # Examples
///
/// ```
/// use phenosim::ontology::Builder;
///
/// let mut builder = Builder::new();
/// builder.add_term("Root").unwrap();
/// builder.add_term("Child").unwrap();
///
/// let mut builder = builder.terms_complete();
/// builder.add_parent("Root", "Child").unwrap();
///
/// let ontology = builder.connect_all_terms().unwrap();
/// assert_eq!(ontology.ancestors("Child").unwrap().len(), 2);
/// ```
pub struct Builder<T> {
    terms: Arena,
    n_edges: usize,
    state: PhantomData<T>,
}

impl Default for Builder<LooseCollection> {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder<LooseCollection> {
    /// Constructs a new, empty builder
    pub fn new() -> Builder<LooseCollection> {
        Builder::<LooseCollection> {
            terms: Arena::default(),
            n_edges: 0,
            state: PhantomData,
        }
    }

    /// Adds a term to the ontology
    ///
    /// Adding the same term twice is a no-op and returns the existing [`TermIndex`]
    ///
    /// # Errors
    ///
    /// If the ontology contains more than `u32::MAX` terms
    pub fn add_term<I: Into<TermId>>(&mut self, id: I) -> PhenoResult<TermIndex> {
        self.terms.insert(id.into())
    }

    /// Finishes adding terms
    #[must_use]
    pub fn terms_complete(self) -> Builder<AllTerms> {
        transition_state(self)
    }
}

impl Builder<AllTerms> {
    /// Add a connection from a term to its parent
    ///
    /// Adding the same connection twice is a no-op.
    ///
    /// # Errors
    ///
    /// [`PhenoError::UnknownTerm`] if the `parent_id` or `child_id` is not present
    pub fn add_parent<P: AsRef<str>, C: AsRef<str>>(
        &mut self,
        parent_id: P,
        child_id: C,
    ) -> PhenoResult<()> {
        let parent = self.resolve(parent_id.as_ref())?;
        let child = self.resolve(child_id.as_ref())?;

        if self.terms.get_unchecked_mut(child).add_parent(parent) {
            self.n_edges += 1;
        }
        Ok(())
    }

    /// Creates and caches the ancestor closure of every term
    ///
    /// The closure of a term contains the term itself and all its direct
    /// and indirect parents. It is computed once per term and cached.
    ///
    /// # Errors
    ///
    /// [`PhenoError::CyclicOntology`] if a term is its own ancestor
    pub fn connect_all_terms(mut self) -> PhenoResult<Ontology> {
        let mut visits = vec![Visit::New; self.terms.len()];
        let term_ids: Vec<TermIndex> = self.terms.keys().collect();

        for id in term_ids {
            self.create_cache_of_ancestors(id, &mut visits)?;
        }

        self.terms.shrink_to_fit();
        debug!(
            "Created ontology with {} terms and {} edges",
            self.terms.len(),
            self.n_edges
        );
        Ok(Ontology::new(self.terms, self.n_edges))
    }

    fn resolve(&self, id: &str) -> PhenoResult<TermIndex> {
        self.terms
            .index_of(id)
            .ok_or_else(|| PhenoError::UnknownTerm {
                term: id.to_string(),
                entity: None,
            })
    }

    /// Recursively walks up to the roots and caches the closure of every
    /// term on the way back down. The recursion stops at terms
    /// that are already cached.
    ///
    /// A term that is reached again while its own closure is still being
    /// calculated is part of a cycle.
    fn create_cache_of_ancestors(
        &mut self,
        term_id: TermIndex,
        visits: &mut [Visit],
    ) -> PhenoResult<()> {
        match visits[term_id.to_usize()] {
            Visit::Done => return Ok(()),
            Visit::InProgress => {
                return Err(PhenoError::CyclicOntology {
                    term: self.terms.get_unchecked(term_id).id().to_string(),
                })
            }
            Visit::New => visits[term_id.to_usize()] = Visit::InProgress,
        }

        let parents = self.terms.get_unchecked(term_id).parents().clone();
        let mut res = TermGroup::with_capacity(DEFAULT_NUM_ALL_PARENTS);
        res.insert(term_id);
        for parent in &parents {
            self.create_cache_of_ancestors(parent, visits)?;
            res = &res | self.terms.get_unchecked(parent).ancestors();
        }

        *self.terms.get_unchecked_mut(term_id).ancestors_mut() = res;
        visits[term_id.to_usize()] = Visit::Done;
        Ok(())
    }
}
