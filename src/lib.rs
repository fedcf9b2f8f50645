//! `phenosim` computes semantic similarity matrices between entities, such as
//! patients, that are annotated with terms of a hierarchical ontology like the
//! Human Phenotype Ontology.
//!
//! Similarity is based on the information content (IC) of the
//! *most informative common ancestor* (Resnik). Term-level scores are
//! combined into an entity-level score using the symmetric best-match average.
//!
//! # Examples
//!
//! ```
//! use phenosim::{FrequencySource, MatrixBuilder, MatrixOptions, Ontology, PhenotypeSet};
//!
//! let ontology = Ontology::from_edges([("A", "R"), ("B", "R")]).unwrap();
//!
//! let patients = vec![
//!     PhenotypeSet::new("P1", ["A"]),
//!     PhenotypeSet::new("P2", ["B"]),
//!     PhenotypeSet::new("P3", ["A", "B"]),
//! ];
//!
//! let options = MatrixOptions::new(FrequencySource::Dataset);
//! let matrix = MatrixBuilder::new(&ontology, options).build(&patients).unwrap();
//!
//! assert_eq!(matrix.len(), 3);
//! assert_eq!(matrix.get(0, 1), 0.0);
//! assert!((matrix.get(0, 2) - 0.304_099).abs() < 1e-6);
//! assert_eq!(matrix.get(0, 2), matrix.get(2, 0));
//! ```
#![warn(missing_docs)]

use thiserror::Error;

pub mod annotations;
pub mod information_content;
pub mod matrix;
pub mod ontology;
pub mod parser;
pub mod set;
pub mod similarity;
pub mod similarity_matrix;
pub mod term;
pub mod utils;

pub use annotations::AnnotationCorpus;
pub use information_content::{InformationContent, Smoothing};
pub use ontology::Ontology;
pub use set::{PhenotypeSet, TermSet};
pub use similarity::{GroupSimilarity, Resnik, Similarity, StandardCombiner};
pub use similarity_matrix::{
    Exclusion, FrequencySource, MatrixBuilder, MatrixOptions, SimilarityMatrix, ValidationMode,
};
pub use term::{TermGroup, TermId, TermIndex};

const DEFAULT_NUM_PARENTS: usize = 4;
const DEFAULT_NUM_ALL_PARENTS: usize = 30;
const DEFAULT_NUM_TERMS: usize = 20_000;

/// Main Error type for this crate
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PhenoError {
    /// The ontology edges form a cycle, `term` is its own ancestor
    #[error("ontology contains a cycle through {term}")]
    CyclicOntology {
        /// A term that was found to be its own ancestor
        term: String,
    },
    /// A term is not part of the ontology
    #[error("term {term} does not exist in the ontology{}", entity_context(.entity))]
    UnknownTerm {
        /// The unknown term identifier
        term: String,
        /// The entity that referenced the term, if known
        entity: Option<String>,
    },
    /// An entity does not have any (valid) terms
    #[error("entity {entity} has no terms")]
    EmptyPhenotypeSet {
        /// The entity identifier
        entity: String,
    },
    /// The term was never annotated and smoothing is disabled
    #[error("term {term} has no annotations, its information content is undefined{}", entity_context(.entity))]
    MissingAnnotation {
        /// The term without annotation frequency
        term: String,
        /// The entity that referenced the term, if known
        entity: Option<String>,
    },
    /// The same entity identifier occurs more than once in the input
    #[error("entity {entity} is present more than once")]
    DuplicateEntity {
        /// The entity identifier
        entity: String,
    },
    /// An annotation frequency table is inconsistent
    #[error("invalid frequency table: {0}")]
    InvalidFrequency(String),
    /// Failed to open a file
    #[error("cannot open file {0}")]
    CannotOpenFile(String),
    /// Invalid data in an input file
    #[error("invalid input data: {0}")]
    InvalidInput(String),
    /// The matrix computation was cancelled before it finished
    #[error("computation was cancelled")]
    Cancelled,
}

fn entity_context(entity: &Option<String>) -> String {
    match entity {
        Some(entity) => format!(" (entity {entity})"),
        None => String::new(),
    }
}

impl PhenoError {
    /// Attaches the entity identifier to errors that can carry one
    pub(crate) fn for_entity(self, entity_id: &str) -> Self {
        match self {
            PhenoError::UnknownTerm { term, .. } => PhenoError::UnknownTerm {
                term,
                entity: Some(entity_id.to_string()),
            },
            PhenoError::MissingAnnotation { term, .. } => PhenoError::MissingAnnotation {
                term,
                entity: Some(entity_id.to_string()),
            },
            other => other,
        }
    }
}

/// Shortcut for `Result<T, PhenoError>`
pub type PhenoResult<T> = Result<T, PhenoError>;

/// Converts a `usize` count into `f64`
///
/// Counts are bounded by the number of entities and terms, far below
/// the 2^52 limit of exact `f64` integers.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn usize_to_f64(n: usize) -> f64 {
    n as f64
}
