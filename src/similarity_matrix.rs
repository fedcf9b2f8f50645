//! Pairwise similarity of many entities
//!
//! The [`MatrixBuilder`] compares every entity with every other entity
//! and returns a symmetric [`SimilarityMatrix`].
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::set::TermSet;
use crate::similarity::{GroupSimilarity, Resnik, StandardCombiner};
use crate::utils::UpperTriangle;
use crate::{
    AnnotationCorpus, InformationContent, Ontology, PhenoError, PhenoResult, PhenotypeSet,
    Smoothing,
};

mod validation;

/// The annotation frequencies that the information content is based on
#[derive(Debug, Clone)]
pub enum FrequencySource<'a> {
    /// Count the annotations of the entities that are compared
    ///
    /// Scores are only comparable within the same matrix
    Dataset,
    /// Use an external frequency table
    ///
    /// Scores are comparable across all matrices that use the same table.
    /// The corpus must be built on the same ontology as the matrix.
    External(AnnotationCorpus<'a>),
}

/// How invalid entities are handled
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// The first invalid entity aborts the calculation
    #[default]
    Strict,
    /// Invalid entities are excluded from the frequencies and the matrix
    SkipEntities,
    /// Unknown terms, and terms without annotation frequency, are removed
    /// from the entities. Entities without any remaining terms are excluded.
    DropUnknownTerms,
}

/// Options of a [`MatrixBuilder`]
///
/// # Examples
///
/// ```
/// use phenosim::similarity::StandardCombiner;
/// use phenosim::{FrequencySource, MatrixOptions, Smoothing, ValidationMode};
///
/// let options = MatrixOptions::new(FrequencySource::Dataset)
///     .with_smoothing(Smoothing::AddOne)
///     .with_validation(ValidationMode::SkipEntities)
///     .with_combiner(StandardCombiner::FunSimMax)
///     .with_parallel(false);
///
/// assert_eq!(options.validation(), ValidationMode::SkipEntities);
/// assert!(!options.parallel());
/// ```
#[derive(Debug, Clone)]
pub struct MatrixOptions<'a> {
    frequency: FrequencySource<'a>,
    smoothing: Smoothing,
    validation: ValidationMode,
    combiner: StandardCombiner,
    parallel: bool,
}

impl<'a> MatrixOptions<'a> {
    /// Default options with the given source of annotation frequencies
    ///
    /// - no smoothing
    /// - strict validation
    /// - [`StandardCombiner::Bma`]
    /// - parallel calculation
    pub fn new(frequency: FrequencySource<'a>) -> Self {
        Self {
            frequency,
            smoothing: Smoothing::default(),
            validation: ValidationMode::default(),
            combiner: StandardCombiner::default(),
            parallel: true,
        }
    }

    /// Sets the smoothing of the information content
    #[must_use]
    pub fn with_smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Sets the handling of invalid entities
    #[must_use]
    pub fn with_validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    /// Sets the combination of term-term scores
    #[must_use]
    pub fn with_combiner(mut self, combiner: StandardCombiner) -> Self {
        self.combiner = combiner;
        self
    }

    /// Enables or disables the parallel calculation
    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// The source of annotation frequencies
    pub fn frequency(&self) -> &FrequencySource<'a> {
        &self.frequency
    }

    /// The smoothing of the information content
    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    /// The handling of invalid entities
    pub fn validation(&self) -> ValidationMode {
        self.validation
    }

    /// The combination of term-term scores
    pub fn combiner(&self) -> StandardCombiner {
        self.combiner
    }

    /// Whether scores are calculated in parallel
    pub fn parallel(&self) -> bool {
        self.parallel
    }
}

/// An entity that was left out of the matrix, and why
#[derive(Debug, Clone, PartialEq)]
pub struct Exclusion {
    entity: String,
    reason: PhenoError,
}

impl Exclusion {
    pub(crate) fn new(entity: &str, reason: PhenoError) -> Self {
        Self {
            entity: entity.to_string(),
            reason,
        }
    }

    /// The entity identifier
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// The validation error of the entity
    pub fn reason(&self) -> &PhenoError {
        &self.reason
    }
}

/// Symmetric matrix of entity-entity similarity scores
///
/// Rows and columns are in the same order as the input entities,
/// without the excluded ones.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    ids: Vec<String>,
    values: Vec<f64>,
    excluded: Vec<Exclusion>,
}

impl SimilarityMatrix {
    /// The entity identifiers of the rows and columns
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Returns the number of entities
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if the matrix does not contain any entities
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns the score of the `i`-th and `j`-th entity
    ///
    /// # Panics
    ///
    /// If `i` or `j` is out of bounds
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.len() && j < self.len(), "index out of bounds");
        self.values[i * self.len() + j]
    }

    /// Returns the score of two entities by their identifiers
    pub fn score(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.position(a)?;
        let j = self.position(b)?;
        Some(self.get(i, j))
    }

    /// Returns the row of the `i`-th entity
    ///
    /// # Panics
    ///
    /// If `i` is out of bounds
    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.len();
        &self.values[i * n..(i + 1) * n]
    }

    /// All scores in row-major order
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Entities that were excluded during validation
    pub fn excluded(&self) -> &[Exclusion] {
        &self.excluded
    }

    /// Writes the matrix as tab-separated table
    ///
    /// The first line contains `ID` and all entity identifiers, every
    /// following line the entity identifier and its scores.
    ///
    /// # Errors
    ///
    /// If writing fails
    ///
    /// # Examples
    ///
    /// ```
    /// use phenosim::{FrequencySource, MatrixBuilder, MatrixOptions, Ontology, PhenotypeSet};
    ///
    /// let ontology = Ontology::from_edges([("A", "R"), ("B", "R")]).unwrap();
    /// let patients = vec![PhenotypeSet::new("P1", ["A"]), PhenotypeSet::new("P2", ["B"])];
    /// let matrix = MatrixBuilder::new(&ontology, MatrixOptions::new(FrequencySource::Dataset))
    ///     .build(&patients)
    ///     .unwrap();
    ///
    /// let mut out = Vec::new();
    /// matrix.write_tsv(&mut out).unwrap();
    /// let ln2 = 2f64.ln();
    /// assert_eq!(
    ///     String::from_utf8(out).unwrap(),
    ///     format!("ID\tP1\tP2\nP1\t{ln2}\t0\nP2\t0\t{ln2}\n")
    /// );
    /// ```
    pub fn write_tsv<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        write!(writer, "ID")?;
        for id in &self.ids {
            write!(writer, "\t{id}")?;
        }
        writeln!(writer)?;

        for (i, id) in self.ids.iter().enumerate() {
            write!(writer, "{id}")?;
            for value in self.row(i) {
                write!(writer, "\t{value}")?;
            }
            writeln!(writer)?;
        }
        writer.flush()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|x| x == id)
    }
}

/// Calculates the [`SimilarityMatrix`] of many entities
///
/// The builder runs the following steps:
/// 1. Validate all entities: each entity must have terms, all terms must
///    be part of the ontology and entity identifiers must be unique
/// 2. Count the annotation frequencies of all terms (or use the external table)
///    and calculate the information content
/// 3. Ensure that the information content of every term and its ancestors
///    is defined
/// 4. Calculate the similarity of every pair of entities
///
/// # Examples
///
/// ```
/// use phenosim::{FrequencySource, MatrixBuilder, MatrixOptions, Ontology, PhenotypeSet, ValidationMode};
///
/// let ontology = Ontology::from_edges([("A", "R"), ("B", "R"), ("C", "A")]).unwrap();
/// let patients = vec![
///     PhenotypeSet::new("P1", ["A"]),
///     PhenotypeSet::new("P2", ["B", "Unknown"]),
///     PhenotypeSet::new("P3", ["C", "B"]),
/// ];
///
/// let options = MatrixOptions::new(FrequencySource::Dataset);
/// assert!(MatrixBuilder::new(&ontology, options).build(&patients).is_err());
///
/// let options = MatrixOptions::new(FrequencySource::Dataset)
///     .with_validation(ValidationMode::SkipEntities);
/// let matrix = MatrixBuilder::new(&ontology, options).build(&patients).unwrap();
/// assert_eq!(matrix.ids(), &["P1", "P3"]);
/// assert_eq!(matrix.excluded()[0].entity(), "P2");
/// ```
#[derive(Debug)]
pub struct MatrixBuilder<'a> {
    ontology: &'a Ontology,
    options: MatrixOptions<'a>,
    cancelled: Arc<AtomicBool>,
}

impl<'a> MatrixBuilder<'a> {
    /// Constructs a new `MatrixBuilder`
    pub fn new(ontology: &'a Ontology, options: MatrixOptions<'a>) -> Self {
        Self {
            ontology,
            options,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The options of the builder
    pub fn options(&self) -> &MatrixOptions<'a> {
        &self.options
    }

    /// Returns a handle to cancel a running calculation
    ///
    /// Setting the flag to `true` stops all pending calculations and
    /// [`MatrixBuilder::build`] returns [`PhenoError::Cancelled`]. The flag
    /// is never reset, a cancelled builder cannot be used again.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::atomic::Ordering;
    /// use phenosim::{FrequencySource, MatrixBuilder, MatrixOptions, Ontology, PhenoError, PhenotypeSet};
    ///
    /// let ontology = Ontology::from_edges([("A", "R")]).unwrap();
    /// let builder = MatrixBuilder::new(&ontology, MatrixOptions::new(FrequencySource::Dataset));
    ///
    /// builder.cancel_handle().store(true, Ordering::Relaxed);
    /// let res = builder.build(&[PhenotypeSet::new("P1", ["A"])]);
    /// assert_eq!(res.unwrap_err(), PhenoError::Cancelled);
    /// ```
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    /// Calculates the similarity matrix of all entities
    ///
    /// # Errors
    ///
    /// - [`PhenoError::DuplicateEntity`] if an entity identifier occurs more than once
    /// - [`PhenoError::EmptyPhenotypeSet`], [`PhenoError::UnknownTerm`] or
    ///   [`PhenoError::MissingAnnotation`] for invalid entities in [`ValidationMode::Strict`]
    /// - [`PhenoError::InvalidFrequency`] if the external frequencies belong to another ontology
    /// - [`PhenoError::Cancelled`] if the calculation was cancelled
    pub fn build(&self, sets: &[PhenotypeSet]) -> PhenoResult<SimilarityMatrix> {
        self.check_cancelled()?;
        let mode = self.options.validation;

        let validated = validation::resolve_entities(self.ontology, sets, mode)?;

        let dataset_corpus;
        let corpus = match &self.options.frequency {
            FrequencySource::Dataset => {
                dataset_corpus = AnnotationCorpus::from_sets(self.ontology, &validated.retained)?;
                &dataset_corpus
            }
            FrequencySource::External(corpus) => {
                if !std::ptr::eq(corpus.ontology(), self.ontology) {
                    return Err(PhenoError::InvalidFrequency(
                        "the frequency table belongs to a different ontology".to_string(),
                    ));
                }
                corpus
            }
        };
        let ic = InformationContent::new(corpus, self.options.smoothing);

        let validated = validation::check_information_content(&ic, validated, mode)?;
        if !validated.excluded.is_empty() {
            info!("Excluded {} entities", validated.excluded.len());
        }

        let similarity = GroupSimilarity::new(self.options.combiner, Resnik::new(self.ontology, &ic));
        let values = self.calculate_all(&similarity, &validated.retained)?;

        let cache = similarity.similarity().cache();
        debug!(
            "Term similarity cache: {} pairs, {} hits, {} misses, hit rate {:.3}",
            cache.len(),
            cache.hits(),
            cache.misses(),
            cache.hit_rate()
        );

        Ok(SimilarityMatrix {
            ids: validated
                .retained
                .iter()
                .map(|set| set.id().to_string())
                .collect(),
            values,
            excluded: validated.excluded,
        })
    }

    fn check_cancelled(&self) -> PhenoResult<()> {
        if self.cancelled.load(Ordering::Relaxed) {
            Err(PhenoError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Calculates the upper triangle, including the diagonal, and
    /// mirrors it into a full row-major matrix
    fn calculate_all(
        &self,
        similarity: &GroupSimilarity<Resnik, StandardCombiner>,
        sets: &[TermSet],
    ) -> PhenoResult<Vec<f64>> {
        let n = sets.len();
        let pairs: Vec<(usize, usize)> = UpperTriangle::new(n).collect();
        info!(
            "Calculating similarity of {} entities ({} pairs)",
            n,
            pairs.len()
        );

        let score = |&(i, j): &(usize, usize)| -> PhenoResult<f64> {
            self.check_cancelled()?;
            if i == j {
                similarity.self_similarity(&sets[i])
            } else {
                similarity.calculate(&sets[i], &sets[j])
            }
        };

        let scores: Vec<f64> = if self.options.parallel {
            pairs.par_iter().map(score).collect::<PhenoResult<_>>()?
        } else {
            pairs.iter().map(score).collect::<PhenoResult<_>>()?
        };

        let mut values = vec![0.0; n * n];
        for (&(i, j), score) in pairs.iter().zip(scores) {
            values[i * n + j] = score;
            values[j * n + i] = score;
        }
        Ok(values)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn ontology() -> Ontology {
        Ontology::from_edges([
            ("A", "R"),
            ("B", "R"),
            ("C", "A"),
            ("D", "A"),
            ("E", "B"),
            ("F", "C"),
        ])
        .unwrap()
    }

    fn patients() -> Vec<PhenotypeSet> {
        vec![
            PhenotypeSet::new("P1", ["A"]),
            PhenotypeSet::new("P2", ["F", "E"]),
            PhenotypeSet::new("P3", ["C", "D"]),
            PhenotypeSet::new("P4", ["B"]),
            PhenotypeSet::new("P5", ["F"]),
        ]
    }

    #[test]
    fn matrix_is_symmetric() {
        let ontology = ontology();
        let matrix = MatrixBuilder::new(&ontology, MatrixOptions::new(FrequencySource::Dataset))
            .build(&patients())
            .unwrap();
        assert_eq!(matrix.len(), 5);
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
                assert!(matrix.get(i, j) >= 0.0);
                assert!(matrix.get(i, j) <= matrix.get(i, i).max(matrix.get(j, j)));
            }
        }
        assert!(matrix.excluded().is_empty());
    }

    #[test]
    fn parallel_equals_sequential() {
        let ontology = ontology();
        let options = MatrixOptions::new(FrequencySource::Dataset).with_smoothing(Smoothing::AddOne);
        let parallel = MatrixBuilder::new(&ontology, options.clone())
            .build(&patients())
            .unwrap();
        let sequential = MatrixBuilder::new(&ontology, options.with_parallel(false))
            .build(&patients())
            .unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn external_frequencies() {
        let ontology = ontology();
        let corpus = AnnotationCorpus::from_counts(
            &ontology,
            [("R", 100), ("A", 50), ("B", 40), ("C", 10), ("D", 10), ("E", 5), ("F", 1)],
            100,
        )
        .unwrap();
        let options = MatrixOptions::new(FrequencySource::External(corpus));
        let builder = MatrixBuilder::new(&ontology, options);

        let all = builder.build(&patients()).unwrap();
        let some = builder.build(&patients()[..2]).unwrap();
        assert_eq!(some.get(0, 1), all.get(0, 1));
        assert_eq!(all.score("P1", "P5"), Some(2f64.ln()));
        assert_eq!(all.score("P1", "P9"), None);
    }

    #[test]
    fn external_frequencies_of_other_ontology() {
        let ontology = ontology();
        let other = ontology.clone();
        let corpus = AnnotationCorpus::from_counts(&other, [("R", 10)], 10).unwrap();
        let options = MatrixOptions::new(FrequencySource::External(corpus));
        let err = MatrixBuilder::new(&ontology, options)
            .build(&patients())
            .unwrap_err();
        assert!(matches!(err, PhenoError::InvalidFrequency(_)));
    }

    #[test]
    fn strict_validation() {
        let ontology = ontology();
        let mut patients = patients();
        patients.push(PhenotypeSet::new("P6", ["Z"]));
        let err = MatrixBuilder::new(&ontology, MatrixOptions::new(FrequencySource::Dataset))
            .build(&patients)
            .unwrap_err();
        assert_eq!(
            err,
            PhenoError::UnknownTerm {
                term: "Z".to_string(),
                entity: Some("P6".to_string())
            }
        );
    }

    #[test]
    fn excluded_entities_do_not_count() {
        let ontology = ontology();
        let mut patients = patients();
        patients.insert(1, PhenotypeSet::new("P0", ["Z", "R"]));

        let options = MatrixOptions::new(FrequencySource::Dataset)
            .with_validation(ValidationMode::SkipEntities);
        let skipped = MatrixBuilder::new(&ontology, options).build(&patients).unwrap();

        let reference = MatrixBuilder::new(&ontology, MatrixOptions::new(FrequencySource::Dataset))
            .build(&self::patients())
            .unwrap();

        assert_eq!(skipped.values(), reference.values());
        assert_eq!(skipped.excluded().len(), 1);
        assert_eq!(skipped.excluded()[0].entity(), "P0");

        let options = MatrixOptions::new(FrequencySource::Dataset)
            .with_validation(ValidationMode::DropUnknownTerms);
        let dropped = MatrixBuilder::new(&ontology, options).build(&patients).unwrap();
        assert_eq!(dropped.len(), 6);
        assert_eq!(dropped.ids()[1], "P0");
        // only annotated to the root
        assert_eq!(dropped.row(1)[1], 0.0);
    }

    #[test]
    fn cancelled_while_calculating_pairs() {
        let ontology = ontology();
        let sets: Vec<TermSet> = patients()
            .iter()
            .map(|set| set.resolve(&ontology).unwrap())
            .collect();
        let corpus = AnnotationCorpus::from_sets(&ontology, &sets).unwrap();
        let ic = InformationContent::new(&corpus, Smoothing::None);
        let similarity = GroupSimilarity::new(StandardCombiner::Bma, Resnik::new(&ontology, &ic));

        for parallel in [true, false] {
            let options = MatrixOptions::new(FrequencySource::Dataset).with_parallel(parallel);
            let builder = MatrixBuilder::new(&ontology, options);
            assert_eq!(builder.calculate_all(&similarity, &sets).unwrap().len(), 25);

            builder.cancel_handle().store(true, Ordering::Relaxed);
            assert_eq!(
                builder.calculate_all(&similarity, &sets).unwrap_err(),
                PhenoError::Cancelled
            );
            assert_eq!(builder.build(&patients()).unwrap_err(), PhenoError::Cancelled);
        }
    }

    #[test]
    fn empty_input() {
        let ontology = ontology();
        let matrix = MatrixBuilder::new(&ontology, MatrixOptions::new(FrequencySource::Dataset))
            .build(&[])
            .unwrap();
        assert!(matrix.is_empty());
        let mut out = Vec::new();
        matrix.write_tsv(&mut out).unwrap();
        assert_eq!(out, b"ID\n");
    }
}
