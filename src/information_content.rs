//! Information content of ontology terms
//!
//! The information content (IC) of a term is `-ln(p)`, where `p` is the
//! fraction of entities that are annotated to the term. Rare terms are more
//! informative than frequent ones. Root terms that every entity is
//! annotated to have an IC of `0`.
use crate::annotations::AnnotationCorpus;
use crate::term::{TermId, TermIndex};
use crate::{usize_to_f64, Ontology, PhenoError, PhenoResult};

/// How terms without any annotation are handled
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Smoothing {
    /// `IC = -ln(count / total)`
    ///
    /// Terms without annotations have an undefined IC and can't be
    /// used for similarity calculations
    #[default]
    None,
    /// `IC = -ln((count + 1) / (total + 1))`
    ///
    /// Every term has a defined IC
    AddOne,
}

/// The information content of every term of an [`Ontology`]
///
/// All values are calculated eagerly during construction.
///
/// # Examples
///
/// ```
/// use phenosim::{AnnotationCorpus, InformationContent, Ontology, PhenotypeSet, Smoothing};
///
/// let ontology = Ontology::from_edges([("A", "R"), ("B", "R"), ("C", "R")]).unwrap();
/// let patients = vec![
///     PhenotypeSet::new("P1", ["A"]),
///     PhenotypeSet::new("P2", ["B"]),
///     PhenotypeSet::new("P3", ["A", "B"]),
/// ];
/// let corpus = AnnotationCorpus::from_phenotype_sets(&ontology, &patients).unwrap();
///
/// let ic = InformationContent::new(&corpus, Smoothing::None);
/// assert_eq!(ic.ic_of("R").unwrap(), 0.0);
/// assert!((ic.ic_of("A").unwrap() - 0.405_465).abs() < 1e-6);
/// assert!(ic.ic_of("C").is_err());
///
/// let smoothed = InformationContent::new(&corpus, Smoothing::AddOne);
/// assert!((smoothed.ic_of("C").unwrap() - 4f64.ln()).abs() < 1e-12);
/// ```
#[derive(Clone, Debug)]
pub struct InformationContent<'a> {
    ontology: &'a Ontology,
    values: Vec<Option<f64>>,
    smoothing: Smoothing,
}

impl<'a> InformationContent<'a> {
    /// Calculates the information content of all terms of the corpus
    pub fn new(corpus: &AnnotationCorpus<'a>, smoothing: Smoothing) -> Self {
        let ontology = corpus.ontology();
        let total = corpus.total();
        let values = ontology
            .indices()
            .map(|index| calculate(corpus.count(index), total, smoothing))
            .collect();
        Self {
            ontology,
            values,
            smoothing,
        }
    }

    /// Returns the IC of the term at `index`
    ///
    /// # Errors
    ///
    /// [`PhenoError::MissingAnnotation`] if the IC of the term is undefined
    ///
    /// # Panics
    ///
    /// If `index` does not belong to the ontology
    pub fn get(&self, index: TermIndex) -> PhenoResult<f64> {
        self.value(index)
            .ok_or_else(|| PhenoError::MissingAnnotation {
                term: self.ontology.term_id(index).to_string(),
                entity: None,
            })
    }

    /// Returns the IC of a term
    ///
    /// # Errors
    ///
    /// - [`PhenoError::UnknownTerm`] if the term is not part of the ontology
    /// - [`PhenoError::MissingAnnotation`] if the IC of the term is undefined
    pub fn ic_of<S: AsRef<str>>(&self, term_id: S) -> PhenoResult<f64> {
        self.get(self.ontology.resolve(term_id)?)
    }

    /// Returns the IC of the term at `index`, or `None` if it is undefined
    pub fn value(&self, index: TermIndex) -> Option<f64> {
        self.values[index.to_usize()]
    }

    /// Returns `true` if the IC of the term at `index` is defined
    pub fn is_defined(&self, index: TermIndex) -> bool {
        self.value(index).is_some()
    }

    /// Returns the first term in the ancestor closure of `index`
    /// with an undefined IC
    pub fn first_undefined_ancestor(&self, index: TermIndex) -> Option<&TermId> {
        self.ontology
            .ancestors_of(index)
            .iter()
            .find(|ancestor| !self.is_defined(*ancestor))
            .map(|ancestor| self.ontology.term_id(ancestor))
    }

    /// The smoothing that was used for the calculation
    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    /// The ontology of the terms
    pub fn ontology(&self) -> &'a Ontology {
        self.ontology
    }
}

/// `-ln(count / total)`, written as `ln(total / count)` to avoid a
/// negative zero for terms that every entity is annotated to
fn calculate(count: usize, total: usize, smoothing: Smoothing) -> Option<f64> {
    match smoothing {
        Smoothing::None => {
            if count == 0 || total == 0 {
                None
            } else {
                Some((usize_to_f64(total) / usize_to_f64(count)).ln())
            }
        }
        Smoothing::AddOne => Some((usize_to_f64(total + 1) / usize_to_f64(count + 1)).ln()),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::PhenotypeSet;

    fn ontology() -> Ontology {
        Ontology::from_edges([("A", "R"), ("B", "R"), ("C", "A"), ("D", "R")]).unwrap()
    }

    fn corpus(ontology: &Ontology) -> AnnotationCorpus<'_> {
        AnnotationCorpus::from_phenotype_sets(
            ontology,
            &[
                PhenotypeSet::new("P1", ["C"]),
                PhenotypeSet::new("P2", ["A", "B"]),
                PhenotypeSet::new("P3", ["B"]),
                PhenotypeSet::new("P4", ["C", "B"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn root_is_zero() {
        let ontology = ontology();
        let ic = InformationContent::new(&corpus(&ontology), Smoothing::None);
        let root = ic.ic_of("R").unwrap();
        assert_eq!(root, 0.0);
        assert!(root.is_sign_positive());
    }

    #[test]
    fn natural_log() {
        let ontology = ontology();
        let ic = InformationContent::new(&corpus(&ontology), Smoothing::None);
        assert!((ic.ic_of("A").unwrap() - (4f64 / 3f64).ln()).abs() < 1e-12);
        assert!((ic.ic_of("C").unwrap() - 2f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn ancestors_are_less_informative() {
        let ontology = ontology();
        let ic = InformationContent::new(&corpus(&ontology), Smoothing::AddOne);
        for index in ontology.indices() {
            for ancestor in ontology.ancestors_of(index) {
                assert!(ic.get(ancestor).unwrap() <= ic.get(index).unwrap());
            }
        }
    }

    #[test]
    fn undefined_without_annotations() {
        let ontology = ontology();
        let ic = InformationContent::new(&corpus(&ontology), Smoothing::None);
        let d = ontology.index_of("D").unwrap();
        assert!(!ic.is_defined(d));
        assert_eq!(ic.value(d), None);
        assert_eq!(
            ic.get(d).unwrap_err(),
            PhenoError::MissingAnnotation {
                term: "D".to_string(),
                entity: None
            }
        );
        assert_eq!(ic.first_undefined_ancestor(d).map(TermId::as_str), Some("D"));
        assert_eq!(ic.first_undefined_ancestor(ontology.index_of("C").unwrap()), None);
        assert_eq!(ic.smoothing(), Smoothing::None);
    }

    #[test]
    fn add_one_smoothing() {
        let ontology = ontology();
        let ic = InformationContent::new(&corpus(&ontology), Smoothing::AddOne);
        assert!((ic.ic_of("D").unwrap() - 5f64.ln()).abs() < 1e-12);
        assert_eq!(ic.ic_of("R").unwrap(), 0.0);
    }
}
