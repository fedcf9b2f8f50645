//! Annotation frequencies of ontology terms
//!
//! An [`AnnotationCorpus`] records for every term how many entities are
//! annotated to it, directly or by inheritance. It is the basis for
//! the [`crate::InformationContent`] of the terms.
//!
//! The corpus is either derived from the entities that are compared
//! ([`AnnotationCorpus::from_sets`]) or loaded from an external frequency
//! table ([`AnnotationCorpus::from_counts`]).
use std::collections::HashSet;

use tracing::{debug, warn};

use crate::set::{PhenotypeSet, TermSet};
use crate::term::{TermId, TermIndex};
use crate::{Ontology, PhenoError, PhenoResult};

/// Per-term annotation counts and the total number of annotated entities
///
/// `count(t)` is the number of distinct entities whose ancestor-closed term
/// set contains `t`. Every entity increments each term at most once, no
/// matter how many of its terms share that ancestor.
///
/// # Examples
///
/// ```
/// use phenosim::{AnnotationCorpus, Ontology, PhenotypeSet};
///
/// let ontology = Ontology::from_edges([("A", "R"), ("B", "R")]).unwrap();
/// let patients = vec![
///     PhenotypeSet::new("P1", ["A"]),
///     PhenotypeSet::new("P2", ["B"]),
///     PhenotypeSet::new("P3", ["A", "B"]),
/// ];
/// let corpus = AnnotationCorpus::from_phenotype_sets(&ontology, &patients).unwrap();
///
/// assert_eq!(corpus.total(), 3);
/// assert_eq!(corpus.count_of("R").unwrap(), 3);
/// assert_eq!(corpus.count_of("A").unwrap(), 2);
/// assert_eq!(corpus.count_of("B").unwrap(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct AnnotationCorpus<'a> {
    ontology: &'a Ontology,
    counts: Vec<usize>,
    total: usize,
}

impl<'a> AnnotationCorpus<'a> {
    fn empty(ontology: &'a Ontology) -> Self {
        Self {
            ontology,
            counts: vec![0; ontology.len()],
            total: 0,
        }
    }

    /// Counts the annotations of resolved entities
    ///
    /// # Errors
    ///
    /// [`PhenoError::EmptyPhenotypeSet`] if an entity does not have any terms
    pub fn from_sets(ontology: &'a Ontology, sets: &[TermSet]) -> PhenoResult<Self> {
        let mut corpus = Self::empty(ontology);
        for set in sets {
            if set.is_empty() {
                return Err(PhenoError::EmptyPhenotypeSet {
                    entity: set.id().to_string(),
                });
            }
            corpus.add_entity(set);
        }
        debug!(
            "Counted annotations of {} entities over {} terms",
            corpus.total,
            corpus.counts.len()
        );
        Ok(corpus)
    }

    /// Resolves and counts the annotations of entities
    ///
    /// # Errors
    ///
    /// - [`PhenoError::EmptyPhenotypeSet`] if an entity does not have any terms
    /// - [`PhenoError::UnknownTerm`] if a term is not part of the ontology
    pub fn from_phenotype_sets(ontology: &'a Ontology, sets: &[PhenotypeSet]) -> PhenoResult<Self> {
        let sets = sets
            .iter()
            .map(|set| set.resolve(ontology))
            .collect::<PhenoResult<Vec<TermSet>>>()?;
        Self::from_sets(ontology, &sets)
    }

    /// Loads an external frequency table
    ///
    /// `counts` contains the number of entities annotated to each term,
    /// terms that are not listed have a count of `0`. The counts must
    /// already include inherited annotations.
    ///
    /// A table in which a term has a higher count than one of its parents
    /// is accepted, but logged as warning.
    ///
    /// # Errors
    ///
    /// - [`PhenoError::InvalidFrequency`] if `total` is `0`, a count exceeds `total`
    ///   or a term is listed twice
    /// - [`PhenoError::UnknownTerm`] if a term is not part of the ontology
    ///
    /// # Examples
    ///
    /// ```
    /// use phenosim::{AnnotationCorpus, Ontology};
    ///
    /// let ontology = Ontology::from_edges([("A", "R"), ("B", "R")]).unwrap();
    /// let corpus = AnnotationCorpus::from_counts(&ontology, [("R", 100), ("A", 10), ("B", 60)], 100).unwrap();
    /// assert_eq!(corpus.count_of("A").unwrap(), 10);
    ///
    /// assert!(AnnotationCorpus::from_counts(&ontology, [("R", 101)], 100).is_err());
    /// ```
    pub fn from_counts<I, T>(ontology: &'a Ontology, counts: I, total: usize) -> PhenoResult<Self>
    where
        I: IntoIterator<Item = (T, usize)>,
        T: Into<TermId>,
    {
        if total == 0 {
            return Err(PhenoError::InvalidFrequency(
                "total number of entities must be greater than 0".to_string(),
            ));
        }

        let mut corpus = Self::empty(ontology);
        corpus.total = total;
        let mut seen: HashSet<TermIndex> = HashSet::new();

        for (term, count) in counts {
            let term = term.into();
            let index = ontology.resolve(&term)?;
            if !seen.insert(index) {
                return Err(PhenoError::InvalidFrequency(format!(
                    "term {term} is listed more than once"
                )));
            }
            if count > total {
                return Err(PhenoError::InvalidFrequency(format!(
                    "count {count} of term {term} exceeds the total of {total}"
                )));
            }
            corpus.counts[index.to_usize()] = count;
        }

        corpus.check_monotonicity();
        debug!(
            "Loaded frequency table with {} terms and a total of {}",
            seen.len(),
            total
        );
        Ok(corpus)
    }

    fn add_entity(&mut self, set: &TermSet) {
        for term in &set.annotated_terms(self.ontology) {
            self.counts[term.to_usize()] += 1;
        }
        self.total += 1;
    }

    /// Warns if a term is annotated more often than one of its parents
    fn check_monotonicity(&self) {
        let mut violations = 0usize;
        for index in self.ontology.indices() {
            let count = self.count(index);
            for parent in self.ontology.parents_of(index) {
                if self.count(parent) < count {
                    if violations == 0 {
                        warn!(
                            "Term {} has a higher count ({}) than its parent {} ({})",
                            self.ontology.term_id(index),
                            count,
                            self.ontology.term_id(parent),
                            self.count(parent)
                        );
                    }
                    violations += 1;
                }
            }
        }
        if violations > 1 {
            warn!(
                "Frequency table contains {} terms with a higher count than their parent",
                violations
            );
        }
    }

    /// The ontology of the annotated terms
    pub fn ontology(&self) -> &'a Ontology {
        self.ontology
    }

    /// Returns the number of entities annotated to the term at `index`
    ///
    /// # Panics
    ///
    /// If `index` does not belong to the ontology of the corpus
    pub fn count(&self, index: TermIndex) -> usize {
        self.counts[index.to_usize()]
    }

    /// Returns the number of entities annotated to a term
    ///
    /// # Errors
    ///
    /// [`PhenoError::UnknownTerm`] if the term is not part of the ontology
    pub fn count_of<S: AsRef<str>>(&self, term_id: S) -> PhenoResult<usize> {
        self.ontology.resolve(term_id).map(|index| self.count(index))
    }

    /// Returns the total number of entities
    pub fn total(&self) -> usize {
        self.total
    }
}
