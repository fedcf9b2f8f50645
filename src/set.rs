//! Sets of terms annotated to a single entity, e.g. the clinical
//! features of a patient
use crate::similarity::{GroupSimilarity, Similarity, SimilarityCombiner};
use crate::term::{Iter, TermGroup, TermId};
use crate::{Ontology, PhenoError, PhenoResult};

/// An entity identifier together with the ids of its annotated terms
///
/// This is the raw input of a similarity calculation. The terms are not
/// checked against an ontology until the set is [resolved](`PhenotypeSet::resolve`).
///
/// Each term can only appear once, duplicates are collapsed and the
/// first-seen order is kept.
///
/// # Examples
///
/// ```
/// use phenosim::PhenotypeSet;
///
/// let patient = PhenotypeSet::new("P1", ["HP:0001250", "HP:0001263", "HP:0001250"]);
/// assert_eq!(patient.id(), "P1");
/// assert_eq!(patient.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhenotypeSet {
    id: String,
    terms: Vec<TermId>,
}

impl PhenotypeSet {
    /// Constructs a new [`PhenotypeSet`]
    pub fn new<E, I, T>(id: E, terms: I) -> Self
    where
        E: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<TermId>,
    {
        let mut set = Self {
            id: id.into(),
            terms: Vec::new(),
        };
        for term in terms {
            set.insert(term);
        }
        set
    }

    /// The entity identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The annotated term ids
    pub fn terms(&self) -> &[TermId] {
        &self.terms
    }

    /// Adds a term to the set
    ///
    /// Returns `false` if the term was already present
    pub fn insert<T: Into<TermId>>(&mut self, term: T) -> bool {
        let term = term.into();
        if self.terms.contains(&term) {
            false
        } else {
            self.terms.push(term);
            true
        }
    }

    /// Returns the number of distinct terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the set does not contain any terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Resolves all terms against the ontology
    ///
    /// # Errors
    ///
    /// - [`PhenoError::EmptyPhenotypeSet`] if the set does not contain any terms
    /// - [`PhenoError::UnknownTerm`] for the first term that is not part of the ontology
    ///
    /// # Examples
    ///
    /// ```
    /// use phenosim::{Ontology, PhenoError, PhenotypeSet};
    ///
    /// let ontology = Ontology::from_edges([("A", "R")]).unwrap();
    ///
    /// let set = PhenotypeSet::new("P1", ["A", "R"]).resolve(&ontology).unwrap();
    /// assert_eq!(set.len(), 2);
    ///
    /// let err = PhenotypeSet::new("P2", ["A", "X"]).resolve(&ontology).unwrap_err();
    /// assert_eq!(err, PhenoError::UnknownTerm {
    ///     term: "X".to_string(),
    ///     entity: Some("P2".to_string())
    /// });
    /// ```
    pub fn resolve(&self, ontology: &Ontology) -> PhenoResult<TermSet> {
        if self.is_empty() {
            return Err(self.empty_error());
        }
        let terms = self
            .terms
            .iter()
            .map(|term| ontology.resolve(term))
            .collect::<PhenoResult<TermGroup>>()
            .map_err(|err| err.for_entity(&self.id))?;
        Ok(TermSet::new(self.id.clone(), terms))
    }

    /// Resolves all terms that are part of the ontology and
    /// returns the unknown ones separately
    ///
    /// The returned [`TermSet`] can be empty.
    pub fn resolve_known(&self, ontology: &Ontology) -> (TermSet, Vec<&TermId>) {
        let mut terms = TermGroup::new();
        let mut unknown = Vec::new();
        for term in &self.terms {
            match ontology.index_of(term) {
                Some(index) => {
                    terms.insert(index);
                }
                None => unknown.push(term),
            }
        }
        (TermSet::new(self.id.clone(), terms), unknown)
    }

    pub(crate) fn empty_error(&self) -> PhenoError {
        PhenoError::EmptyPhenotypeSet {
            entity: self.id.clone(),
        }
    }
}

/// A [`PhenotypeSet`] that was resolved against an [`Ontology`]
///
/// All terms are represented by their [`crate::TermIndex`] in the ontology
/// that was used to resolve them. Using a `TermSet` with another ontology
/// gives meaningless results or panics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TermSet {
    id: String,
    terms: TermGroup,
}

impl TermSet {
    /// Constructs a new [`TermSet`]
    pub fn new<E: Into<String>>(id: E, terms: TermGroup) -> Self {
        Self {
            id: id.into(),
            terms,
        }
    }

    /// The entity identifier
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The resolved terms
    pub fn terms(&self) -> &TermGroup {
        &self.terms
    }

    /// Returns the number of terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the set does not contain any terms
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Returns an Iterator of the [`crate::TermIndex`] of all terms
    pub fn iter(&self) -> Iter<'_> {
        self.terms.iter()
    }

    /// Returns the union of the ancestor closures of all terms
    ///
    /// These are all terms that the entity is annotated to, directly or
    /// by inheritance.
    ///
    /// # Examples
    ///
    /// ```
    /// use phenosim::{Ontology, PhenotypeSet};
    ///
    /// let ontology = Ontology::from_edges([("A", "R"), ("B", "R")]).unwrap();
    /// let set = PhenotypeSet::new("P1", ["A", "B"]).resolve(&ontology).unwrap();
    /// assert_eq!(set.annotated_terms(&ontology).len(), 3);
    /// ```
    pub fn annotated_terms(&self, ontology: &Ontology) -> TermGroup {
        self.terms.iter().fold(TermGroup::new(), |acc, term| {
            &acc | ontology.ancestors_of(term)
        })
    }

    /// Calculates the similarity to another set
    ///
    /// # Errors
    ///
    /// - [`PhenoError::EmptyPhenotypeSet`] if one of the sets is empty
    /// - [`PhenoError::MissingAnnotation`] if the information content of a term is undefined
    ///
    /// # Examples
    ///
    /// ```
    /// use phenosim::similarity::{Resnik, StandardCombiner};
    /// use phenosim::{AnnotationCorpus, InformationContent, Ontology, PhenotypeSet, Smoothing};
    ///
    /// let ontology = Ontology::from_edges([("A", "R"), ("B", "R")]).unwrap();
    /// let sets = vec![
    ///     PhenotypeSet::new("P1", ["A"]).resolve(&ontology).unwrap(),
    ///     PhenotypeSet::new("P2", ["B"]).resolve(&ontology).unwrap(),
    ///     PhenotypeSet::new("P3", ["A", "B"]).resolve(&ontology).unwrap(),
    /// ];
    ///
    /// let corpus = AnnotationCorpus::from_sets(&ontology, &sets).unwrap();
    /// let ic = InformationContent::new(&corpus, Smoothing::None);
    ///
    /// let score = sets[0]
    ///     .similarity(&sets[2], Resnik::new(&ontology, &ic), StandardCombiner::default())
    ///     .unwrap();
    /// assert!((score - 0.304_099).abs() < 1e-6);
    /// ```
    pub fn similarity<S: Similarity, C: SimilarityCombiner>(
        &self,
        other: &TermSet,
        similarity: S,
        combiner: C,
    ) -> PhenoResult<f64> {
        GroupSimilarity::new(combiner, similarity).calculate(self, other)
    }
}

impl<'a> IntoIterator for &'a TermSet {
    type Item = crate::TermIndex;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}
