use crate::similarity::{Similarity, SimilarityCache};
use crate::term::TermIndex;
use crate::{InformationContent, Ontology, PhenoResult};

/// Resnik similarity: the information content of the most informative
/// common ancestor (MICA) of two terms
///
/// For a detailed description see
/// [Resnik P, Proceedings of the 14th IJCAI, (1995)](https://arxiv.org/abs/cmp-lg/9511007)
///
/// All scores are cached, the intersection of the ancestors is only
/// calculated once per pair of terms. If the terms do not share any
/// ancestor (the ontology has several roots), the similarity is `0`.
///
/// # Examples
///
/// ```
/// use phenosim::similarity::{Resnik, Similarity};
/// use phenosim::{AnnotationCorpus, InformationContent, Ontology, Smoothing};
///
/// let ontology = Ontology::from_edges([("A", "R"), ("B", "R"), ("C", "A")]).unwrap();
/// let corpus = AnnotationCorpus::from_counts(&ontology, [("R", 10), ("A", 5), ("B", 4), ("C", 1)], 10).unwrap();
/// let ic = InformationContent::new(&corpus, Smoothing::None);
///
/// let resnik = Resnik::new(&ontology, &ic);
/// let a = ontology.index_of("A").unwrap();
/// let b = ontology.index_of("B").unwrap();
/// let c = ontology.index_of("C").unwrap();
///
/// // MICA of A and C is A
/// assert_eq!(resnik.calculate(a, c).unwrap(), 2f64.ln());
/// assert_eq!(resnik.mica(a, c).unwrap(), Some(a));
///
/// // MICA of B and C is the root
/// assert_eq!(resnik.calculate(b, c).unwrap(), 0.0);
/// ```
#[derive(Debug)]
pub struct Resnik<'a> {
    ontology: &'a Ontology,
    ic: &'a InformationContent<'a>,
    cache: SimilarityCache,
}

impl<'a> Resnik<'a> {
    /// Constructs a new struct to calculate Resnik similarity scores
    pub fn new(ontology: &'a Ontology, ic: &'a InformationContent<'a>) -> Self {
        Self {
            ontology,
            ic,
            cache: SimilarityCache::default(),
        }
    }

    /// Returns the most informative common ancestor of two terms
    ///
    /// If several common ancestors have the highest IC, the one with the
    /// lowest [`TermIndex`] is returned. Returns `None` if the terms don't
    /// have any common ancestor.
    ///
    /// # Errors
    ///
    /// [`crate::PhenoError::MissingAnnotation`] if the IC of a common ancestor is undefined
    pub fn mica(&self, a: TermIndex, b: TermIndex) -> PhenoResult<Option<TermIndex>> {
        Ok(self.most_informative(a, b)?.map(|(term, _)| term))
    }

    /// The internal cache of term-term scores
    pub fn cache(&self) -> &SimilarityCache {
        &self.cache
    }

    /// The information content that is used for the scores
    pub fn information_content(&self) -> &InformationContent<'a> {
        self.ic
    }

    fn most_informative(
        &self,
        a: TermIndex,
        b: TermIndex,
    ) -> PhenoResult<Option<(TermIndex, f64)>> {
        let common = self.ontology.ancestors_of(a) & self.ontology.ancestors_of(b);
        common.iter().try_fold(None, |best, term| {
            let ic = self.ic.get(term)?;
            Ok(match best {
                Some((_, best_ic)) if best_ic >= ic => best,
                _ => Some((term, ic)),
            })
        })
    }
}

impl Similarity for Resnik<'_> {
    fn calculate(&self, a: TermIndex, b: TermIndex) -> PhenoResult<f64> {
        if a == b {
            return self.ic.get(a);
        }
        self.cache.get_or_try_compute(a, b, || {
            Ok(self.most_informative(a, b)?.map_or(0.0, |(_, ic)| ic))
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{AnnotationCorpus, PhenoError, PhenotypeSet, Smoothing};

    fn ontology() -> Ontology {
        Ontology::from_edges([
            ("A", "R"),
            ("B", "R"),
            ("C", "A"),
            ("C", "B"),
            ("D", "B"),
            ("X", "R2"),
        ])
        .unwrap()
    }

    fn corpus(ontology: &Ontology) -> AnnotationCorpus<'_> {
        AnnotationCorpus::from_phenotype_sets(
            ontology,
            &[
                PhenotypeSet::new("P1", ["C"]),
                PhenotypeSet::new("P2", ["D"]),
                PhenotypeSet::new("P3", ["A", "X"]),
                PhenotypeSet::new("P4", ["B"]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn identical_terms() {
        let ontology = ontology();
        let ic = InformationContent::new(&corpus(&ontology), Smoothing::None);
        let resnik = Resnik::new(&ontology, &ic);
        let c = ontology.index_of("C").unwrap();
        assert_eq!(resnik.calculate(c, c).unwrap(), ic.get(c).unwrap());
    }

    #[test]
    fn mica_with_several_parents() {
        let ontology = ontology();
        let ic = InformationContent::new(&corpus(&ontology), Smoothing::None);
        let resnik = Resnik::new(&ontology, &ic);
        let c = ontology.index_of("C").unwrap();
        let d = ontology.index_of("D").unwrap();
        let b = ontology.index_of("B").unwrap();

        // common ancestors of C and D are B and R
        assert_eq!(resnik.mica(c, d).unwrap(), Some(b));
        assert_eq!(resnik.calculate(c, d).unwrap(), ic.get(b).unwrap());
    }

    #[test]
    fn disconnected_terms() {
        let ontology = ontology();
        let ic = InformationContent::new(&corpus(&ontology), Smoothing::None);
        let resnik = Resnik::new(&ontology, &ic);
        let a = ontology.index_of("A").unwrap();
        let x = ontology.index_of("X").unwrap();
        assert_eq!(resnik.mica(a, x).unwrap(), None);
        assert_eq!(resnik.calculate(a, x).unwrap(), 0.0);
    }

    #[test]
    fn symmetric_and_bounded() {
        let ontology = ontology();
        let ic = InformationContent::new(&corpus(&ontology), Smoothing::AddOne);
        let resnik = Resnik::new(&ontology, &ic);
        for a in ontology.indices() {
            for b in ontology.indices() {
                let ab = resnik.calculate(a, b).unwrap();
                let ba = resnik.calculate(b, a).unwrap();
                assert_eq!(ab, ba);
                assert!(ab >= 0.0);
                assert!(ab <= ic.get(a).unwrap().min(ic.get(b).unwrap()));
            }
        }
    }

    #[test]
    fn scores_are_cached() {
        let ontology = ontology();
        let ic = InformationContent::new(&corpus(&ontology), Smoothing::None);
        let resnik = Resnik::new(&ontology, &ic);
        let c = ontology.index_of("C").unwrap();
        let d = ontology.index_of("D").unwrap();

        resnik.calculate(c, d).unwrap();
        assert_eq!(resnik.cache().misses(), 1);
        resnik.calculate(d, c).unwrap();
        assert_eq!(resnik.cache().hits(), 1);
        assert_eq!(resnik.cache().len(), 1);
    }

    #[test]
    fn undefined_ancestor() {
        let ontology = ontology();
        let corpus = AnnotationCorpus::from_counts(&ontology, [("A", 2), ("C", 1)], 4).unwrap();
        let ic = InformationContent::new(&corpus, Smoothing::None);
        let resnik = Resnik::new(&ontology, &ic);
        let a = ontology.index_of("A").unwrap();
        let c = ontology.index_of("C").unwrap();
        assert!(matches!(
            resnik.calculate(a, c),
            Err(PhenoError::MissingAnnotation { .. })
        ));
        assert!(resnik.cache().is_empty());
    }
}
