//! Methods to calculate the Similarity between two terms or sets of terms
//!
//! Similarity is calculated in two steps:
//! 1. Every term of one set is compared with every term of the other set
//!    using a term-term [`Similarity`], e.g. [`Resnik`]
//! 2. The resulting [`Matrix`] of scores is combined into a single score
//!    by a [`SimilarityCombiner`], e.g. [`StandardCombiner::Bma`]
use crate::matrix::Matrix;
use crate::set::TermSet;
use crate::term::TermIndex;
use crate::{usize_to_f64, PhenoError, PhenoResult};

mod cache;
mod resnik;

pub use cache::SimilarityCache;
pub use resnik::Resnik;

/// Trait for similarity score calculation between 2 terms
pub trait Similarity {
    /// Calculates the actual similarity between term a and term b
    ///
    /// # Errors
    ///
    /// If the score cannot be calculated, e.g. because the information
    /// content of a term is undefined
    fn calculate(&self, a: TermIndex, b: TermIndex) -> PhenoResult<f64>;
}

impl<T: Similarity + ?Sized> Similarity for &T {
    fn calculate(&self, a: TermIndex, b: TermIndex) -> PhenoResult<f64> {
        (**self).calculate(a, b)
    }
}

/// This trait is needed for custom implementations
///
/// For similarity calculation between sets of terms
/// the similarity scores must be combined
pub trait SimilarityCombiner {
    /// This method implements the actual logic to calculate a single
    /// similarity score from a Matrix of term - term similarity scores.
    ///
    /// The matrix is never empty.
    fn combine(&self, m: &Matrix<f64>) -> f64;

    /// This method is called by [`GroupSimilarity`] to combine individual term - term
    /// similarity scores into a single score for the group - group similarity
    ///
    /// Returns `None` if the matrix is empty
    fn calculate(&self, m: &Matrix<f64>) -> Option<f64> {
        if m.is_empty() {
            return None;
        }
        Some(self.combine(m))
    }

    /// Returns the maximum values of each row
    fn row_maxes(&self, m: &Matrix<f64>) -> Vec<f64> {
        m.rows()
            .filter_map(|row| row.copied().reduce(|a, b| if a > b { a } else { b }))
            .collect()
    }

    /// Returns the maximum values of each column
    fn col_maxes(&self, m: &Matrix<f64>) -> Vec<f64> {
        m.cols()
            .filter_map(|col| col.copied().reduce(|a, b| if a > b { a } else { b }))
            .collect()
    }

    /// Returns the dimenension of the `Matrix`, (rows, columns)
    fn dim_f64(&self, m: &Matrix<f64>) -> (f64, f64) {
        let (rows, cols) = m.dim();
        (usize_to_f64(rows), usize_to_f64(cols))
    }
}

/// Default implementations for combining similarity scores
/// for comparison of 2 sets of terms
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StandardCombiner {
    /// Symmetric best-match average
    ///
    /// The mean of the best matches of every term of the first set,
    /// averaged with the mean of the best matches of every term of the
    /// second set. Identical to funSimAvg from
    /// [Schlicker A, et. al., BMC Bioinf (2006)](https://pubmed.ncbi.nlm.nih.gov/16776819/)
    #[default]
    Bma,
    /// funSimMax algorithm from [Schlicker A, et. al., BMC Bioinf (2006)](https://pubmed.ncbi.nlm.nih.gov/16776819/)
    FunSimMax,
    /// BMA algorithm from [Wang JZ, et. al., Bioinformatics (2007)](https://pubmed.ncbi.nlm.nih.gov/17344234/)
    Bwa,
}

impl StandardCombiner {
    fn bma(&self, m: &Matrix<f64>) -> f64 {
        let (rows, cols) = self.dim_f64(m);
        let row_maxes = self.row_maxes(m);
        let col_maxes = self.col_maxes(m);
        let mut nom = row_maxes.iter().sum::<f64>() / rows;
        nom += col_maxes.iter().sum::<f64>() / cols;

        nom / 2.0
    }

    fn fun_sim_max(&self, m: &Matrix<f64>) -> f64 {
        let (rows, cols) = self.dim_f64(m);
        let row_maxes = self.row_maxes(m);
        let col_maxes = self.col_maxes(m);

        (row_maxes.iter().sum::<f64>() / rows).max(col_maxes.iter().sum::<f64>() / cols)
    }

    fn bwa(&self, m: &Matrix<f64>) -> f64 {
        let (rows, cols) = self.dim_f64(m);
        let row_maxes = self.row_maxes(m);
        let col_maxes = self.col_maxes(m);

        (row_maxes.iter().sum::<f64>() + col_maxes.iter().sum::<f64>()) / (rows + cols)
    }
}

impl SimilarityCombiner for StandardCombiner {
    fn combine(&self, m: &Matrix<f64>) -> f64 {
        match self {
            StandardCombiner::Bma => self.bma(m),
            StandardCombiner::FunSimMax => self.fun_sim_max(m),
            StandardCombiner::Bwa => self.bwa(m),
        }
    }
}

/// Calculates the Similarity score between two sets of terms
///
/// # Examples
///
/// ```
/// use phenosim::similarity::{GroupSimilarity, Resnik, StandardCombiner};
/// use phenosim::{AnnotationCorpus, InformationContent, Ontology, PhenotypeSet, Smoothing};
///
/// let ontology = Ontology::from_edges([("A", "R"), ("B", "R")]).unwrap();
/// let sets = vec![
///     PhenotypeSet::new("P1", ["A"]).resolve(&ontology).unwrap(),
///     PhenotypeSet::new("P2", ["B"]).resolve(&ontology).unwrap(),
///     PhenotypeSet::new("P3", ["A", "B"]).resolve(&ontology).unwrap(),
/// ];
/// let corpus = AnnotationCorpus::from_sets(&ontology, &sets).unwrap();
/// let ic = InformationContent::new(&corpus, Smoothing::None);
///
/// let sim = GroupSimilarity::new(StandardCombiner::Bma, Resnik::new(&ontology, &ic));
///
/// assert_eq!(sim.calculate(&sets[0], &sets[1]).unwrap(), 0.0);
/// assert!((sim.calculate(&sets[0], &sets[2]).unwrap() - 0.304_099).abs() < 1e-6);
/// assert_eq!(sim.self_similarity(&sets[0]).unwrap(), sim.calculate(&sets[0], &sets[0]).unwrap());
/// ```
#[derive(Debug)]
pub struct GroupSimilarity<T, C> {
    combiner: C,
    similarity: T,
}

impl<T: Similarity, C: SimilarityCombiner> GroupSimilarity<T, C> {
    /// Constructs a new `GroupSimilarity` from a combiner and
    /// a term-term similarity
    pub fn new(combiner: C, similarity: T) -> Self {
        Self {
            combiner,
            similarity,
        }
    }

    /// The term-term similarity
    pub fn similarity(&self) -> &T {
        &self.similarity
    }

    /// Calculates the similarity between two sets of terms
    ///
    /// # Errors
    ///
    /// - [`PhenoError::EmptyPhenotypeSet`] if one of the sets is empty
    /// - any error of the term-term [`Similarity`], unchanged. A failing pair
    ///   involves a term of both sets, so no entity is attached
    pub fn calculate(&self, a: &TermSet, b: &TermSet) -> PhenoResult<f64> {
        for set in [a, b] {
            if set.is_empty() {
                return Err(PhenoError::EmptyPhenotypeSet {
                    entity: set.id().to_string(),
                });
            }
        }

        let mut v = Vec::with_capacity(a.len() * b.len());
        for t1 in a {
            for t2 in b {
                v.push(self.similarity.calculate(t1, t2)?);
            }
        }
        let m = Matrix::new(a.len(), b.len(), &v);
        self.combiner
            .calculate(&m)
            .ok_or_else(|| PhenoError::EmptyPhenotypeSet {
                entity: a.id().to_string(),
            })
    }

    /// Calculates the similarity of a set with itself
    ///
    /// A term is never less similar to any other term than to itself,
    /// so every term is its own best match. The score reduces to the mean
    /// of the self-similarity of all terms, which is their information
    /// content for [`Resnik`]. This is identical to
    /// `calculate(set, set)` for all [`StandardCombiner`]s.
    ///
    /// # Errors
    ///
    /// - [`PhenoError::EmptyPhenotypeSet`] if the set is empty
    /// - any error of the term-term [`Similarity`], with the entity of `set` attached
    pub fn self_similarity(&self, set: &TermSet) -> PhenoResult<f64> {
        if set.is_empty() {
            return Err(PhenoError::EmptyPhenotypeSet {
                entity: set.id().to_string(),
            });
        }
        let mut sum = 0.0;
        for term in set {
            sum += self
                .similarity
                .calculate(term, term)
                .map_err(|err| err.for_entity(set.id()))?;
        }
        Ok(sum / usize_to_f64(set.len()))
    }
}
