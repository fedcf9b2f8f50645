//! The ontology graph: terms, their `is_a` relationships and ancestor closures

use std::path::Path;

use crate::parser;
use crate::term::internal::TermInternal;
use crate::term::{TermGroup, TermId, TermIndex};
use crate::{PhenoError, PhenoResult};

mod builder;
mod termarena;

pub use builder::{AllTerms, Builder, LooseCollection};
use termarena::Arena;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// `Ontology` holds all terms of a hierarchical ontology and their
/// `is_a` relationships
///
/// The ontology is a directed acyclic graph. Every term may have several
/// parents and the ontology may have several roots. The ancestor closure
/// of every term (the term itself and all its direct and indirect parents)
/// is computed once during construction. Afterwards the ontology is
/// read-only and can be shared freely between threads.
///
/// # Examples
///
/// ```
/// use phenosim::Ontology;
///
/// let ontology = Ontology::from_edges([
///     ("Child", "Parent"),
///     ("Parent", "Root"),
///     ("Other", "Root"),
/// ]).unwrap();
///
/// assert_eq!(ontology.len(), 4);
///
/// let ancestors = ontology.ancestors("Child").unwrap();
/// assert_eq!(ancestors.len(), 3);
///
/// assert!(ontology.ancestors("Unknown").is_err());
///
/// for term in &ontology {
///     println!("{term}");
/// }
/// ```
///
/// # Construction
///
/// - [`Ontology::from_edges`] from an iterator of `(child, parent)` pairs
/// - [`Ontology::from_obo`] from the `is_a` relationships of an OBO file
/// - [`Ontology::from_edge_file`] from a tab-separated `child<TAB>parent` file
/// - step by step with the [`Builder`]
///
/// # Layout
///
/// ```mermaid
/// erDiagram
///     ONTOLOGY ||--|{ TERM : contains
///     TERM }|--o{ TERM : is_a
///     TERM {
///         TermId id
///         TermIndex index
///         TermGroup parents
///         TermGroup ancestors
///     }
/// ```
#[derive(Clone, Debug)]
pub struct Ontology {
    terms: Arena,
    n_edges: usize,
}

impl Ontology {
    pub(crate) fn new(terms: Arena, n_edges: usize) -> Self {
        Self { terms, n_edges }
    }

    /// Builds the ontology from `(child, parent)` pairs
    ///
    /// Every identifier on either side of an edge becomes a term.
    /// Duplicate edges are collapsed.
    ///
    /// # Errors
    ///
    /// - [`PhenoError::CyclicOntology`] if the edges contain a cycle
    /// - [`PhenoError::InvalidInput`] if there are more than `u32::MAX` terms
    ///
    /// # Examples
    ///
    /// ```
    /// use phenosim::{Ontology, PhenoError};
    ///
    /// let ontology = Ontology::from_edges([("A", "R"), ("B", "R"), ("A", "R")]).unwrap();
    /// assert_eq!(ontology.len(), 3);
    /// assert_eq!(ontology.edge_count(), 2);
    ///
    /// let cyclic = Ontology::from_edges([("A", "B"), ("B", "A")]);
    /// assert!(matches!(cyclic, Err(PhenoError::CyclicOntology { .. })));
    /// ```
    pub fn from_edges<I, C, P>(edges: I) -> PhenoResult<Ontology>
    where
        I: IntoIterator<Item = (C, P)>,
        C: Into<TermId>,
        P: Into<TermId>,
    {
        let edges: Vec<(TermId, TermId)> = edges
            .into_iter()
            .map(|(child, parent)| (child.into(), parent.into()))
            .collect();

        let mut builder = Builder::new();
        for (child, parent) in &edges {
            builder.add_term(child)?;
            builder.add_term(parent)?;
        }

        let mut builder = builder.terms_complete();
        for (child, parent) in &edges {
            builder.add_parent(parent, child)?;
        }
        builder.connect_all_terms()
    }

    /// Builds the ontology from the `is_a` relationships of an OBO file
    ///
    /// # Errors
    ///
    /// - [`PhenoError::CannotOpenFile`] if the file cannot be read
    /// - [`PhenoError::CyclicOntology`] if the relationships contain a cycle
    pub fn from_obo<P: AsRef<Path>>(path: P) -> PhenoResult<Ontology> {
        let edges = parser::hp_obo::edges_from_obo(path)?;
        Ontology::from_edges(edges)
    }

    /// Builds the ontology from a tab-separated `child<TAB>parent` file
    ///
    /// # Errors
    ///
    /// - [`PhenoError::CannotOpenFile`] if the file cannot be read
    /// - [`PhenoError::InvalidInput`] if a line does not contain two columns
    /// - [`PhenoError::CyclicOntology`] if the relationships contain a cycle
    pub fn from_edge_file<P: AsRef<Path>>(path: P) -> PhenoResult<Ontology> {
        let edges = parser::read_edges(path)?;
        Ontology::from_edges(edges)
    }

    /// Returns the number of terms in the ontology
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns `true` if the ontology does not contain any terms
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of distinct `is_a` edges
    pub fn edge_count(&self) -> usize {
        self.n_edges
    }

    /// Returns `true` if the term is part of the ontology
    pub fn contains<S: AsRef<str>>(&self, term_id: S) -> bool {
        self.terms.index_of(term_id.as_ref()).is_some()
    }

    /// Returns the [`TermIndex`] of a term, if present
    pub fn index_of<S: AsRef<str>>(&self, term_id: S) -> Option<TermIndex> {
        self.terms.index_of(term_id.as_ref())
    }

    /// Returns the [`TermIndex`] of a term
    ///
    /// # Errors
    ///
    /// [`PhenoError::UnknownTerm`] if the term is not part of the ontology
    pub fn resolve<S: AsRef<str>>(&self, term_id: S) -> PhenoResult<TermIndex> {
        let term_id = term_id.as_ref();
        self.index_of(term_id)
            .ok_or_else(|| PhenoError::UnknownTerm {
                term: term_id.to_string(),
                entity: None,
            })
    }

    /// Returns the [`TermId`] of the term at `index`
    ///
    /// # Panics
    ///
    /// If `index` does not belong to this ontology
    pub fn term_id(&self, index: TermIndex) -> &TermId {
        self.terms.get_unchecked(index).id()
    }

    /// Returns the ancestor closure of a term
    ///
    /// The closure contains the term itself and all its direct and
    /// indirect parents. It is calculated once during construction, so
    /// repeated calls return the same group.
    ///
    /// # Errors
    ///
    /// [`PhenoError::UnknownTerm`] if the term is not part of the ontology
    ///
    /// # Examples
    ///
    /// ```
    /// use phenosim::Ontology;
    ///
    /// let ontology = Ontology::from_edges([("A", "R"), ("B", "R"), ("C", "A"), ("C", "B")]).unwrap();
    /// let ancestors = ontology.ancestors("C").unwrap();
    ///
    /// let mut ids: Vec<&str> = ancestors
    ///     .iter()
    ///     .map(|index| ontology.term_id(index).as_str())
    ///     .collect();
    /// ids.sort_unstable();
    /// assert_eq!(ids, vec!["A", "B", "C", "R"]);
    /// ```
    pub fn ancestors<S: AsRef<str>>(&self, term_id: S) -> PhenoResult<&TermGroup> {
        self.term(term_id.as_ref()).map(TermInternal::ancestors)
    }

    /// Returns the ancestor closure of the term at `index`
    ///
    /// # Panics
    ///
    /// If `index` does not belong to this ontology
    pub fn ancestors_of(&self, index: TermIndex) -> &TermGroup {
        self.terms.get_unchecked(index).ancestors()
    }

    /// Returns the direct parents of a term
    ///
    /// # Errors
    ///
    /// [`PhenoError::UnknownTerm`] if the term is not part of the ontology
    pub fn parents<S: AsRef<str>>(&self, term_id: S) -> PhenoResult<&TermGroup> {
        self.term(term_id.as_ref()).map(TermInternal::parents)
    }

    /// Returns the direct parents of the term at `index`
    ///
    /// # Panics
    ///
    /// If `index` does not belong to this ontology
    pub fn parents_of(&self, index: TermIndex) -> &TermGroup {
        self.terms.get_unchecked(index).parents()
    }

    /// Returns all terms without parents
    ///
    /// # Examples
    ///
    /// ```
    /// use phenosim::Ontology;
    ///
    /// let ontology = Ontology::from_edges([("A", "R1"), ("B", "R2")]).unwrap();
    /// let roots: Vec<&str> = ontology
    ///     .roots()
    ///     .iter()
    ///     .map(|index| ontology.term_id(index).as_str())
    ///     .collect();
    /// assert_eq!(roots, vec!["R1", "R2"]);
    /// ```
    pub fn roots(&self) -> TermGroup {
        self.terms
            .values()
            .filter(|term| term.parents().is_empty())
            .map(TermInternal::index)
            .collect()
    }

    /// Returns an Iterator of all [`TermId`]s, in index order
    pub fn iter(&self) -> Iter<'_> {
        self.into_iter()
    }

    /// Returns an Iterator of the [`TermIndex`] of all terms
    pub fn indices(&self) -> impl Iterator<Item = TermIndex> + '_ {
        self.terms.keys()
    }

    fn term(&self, term_id: &str) -> PhenoResult<&TermInternal> {
        self.terms
            .get(term_id)
            .ok_or_else(|| PhenoError::UnknownTerm {
                term: term_id.to_string(),
                entity: None,
            })
    }
}

/// Iterates the Ontology and yields [`TermId`]s
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, TermInternal>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a TermId;
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(TermInternal::id)
    }
}

impl<'a> IntoIterator for &'a Ontology {
    type Item = &'a TermId;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        Iter {
            inner: self.terms.values(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn diamond() -> Ontology {
        Ontology::from_edges([
            ("A", "Root"),
            ("B", "Root"),
            ("C", "A"),
            ("C", "B"),
            ("D", "C"),
        ])
        .unwrap()
    }

    fn ids(ontology: &Ontology, group: &TermGroup) -> Vec<String> {
        let mut ids: Vec<String> = group
            .iter()
            .map(|index| ontology.term_id(index).to_string())
            .collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn closure_is_inclusive() {
        let ontology = diamond();
        let root = ontology.ancestors("Root").unwrap();
        assert_eq!(ids(&ontology, root), vec!["Root"]);

        let d = ontology.ancestors("D").unwrap();
        assert_eq!(ids(&ontology, d), vec!["A", "B", "C", "D", "Root"]);
    }

    #[test]
    fn closure_is_cached() {
        let ontology = diamond();
        let first = ontology.ancestors("D").unwrap();
        let second = ontology.ancestors("D").unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(ontology.ancestors_of(ontology.index_of("D").unwrap()), first);
    }

    #[test]
    fn ancestors_of_ancestor_are_subset() {
        let ontology = diamond();
        for term in &ontology {
            let closure = ontology.ancestors(term).unwrap();
            for ancestor in closure {
                let parent_closure = ontology.ancestors_of(ancestor);
                assert_eq!(&(closure & parent_closure), parent_closure);
            }
        }
    }

    #[test]
    fn unknown_term() {
        let ontology = diamond();
        assert_eq!(
            ontology.ancestors("X").unwrap_err(),
            PhenoError::UnknownTerm {
                term: "X".to_string(),
                entity: None
            }
        );
        assert!(ontology.parents("X").is_err());
        assert!(ontology.resolve("X").is_err());
        assert!(!ontology.contains("X"));
    }

    #[test]
    fn indices_follow_insertion_order() {
        let ontology = diamond();
        let ids: Vec<&str> = ontology.iter().map(TermId::as_str).collect();
        assert_eq!(ids, vec!["A", "Root", "B", "C", "D"]);
        assert_eq!(ontology.index_of("A"), Some(TermIndex::from(0u32)));
        assert_eq!(ontology.resolve("C").unwrap(), TermIndex::from(3u32));
    }

    #[test]
    fn parents_and_roots() {
        let ontology = diamond();
        assert_eq!(ids(&ontology, ontology.parents("C").unwrap()), vec!["A", "B"]);
        assert_eq!(ids(&ontology, &ontology.roots()), vec!["Root"]);
        assert_eq!(ontology.edge_count(), 5);
    }

    #[test]
    fn several_roots() {
        let ontology = Ontology::from_edges([("A", "R1"), ("B", "R2")]).unwrap();
        let a = ontology.ancestors("A").unwrap();
        let b = ontology.ancestors("B").unwrap();
        assert!((a & b).is_empty());
        assert_eq!(ontology.roots().len(), 2);
    }

    #[test]
    fn empty_ontology() {
        let ontology = Ontology::from_edges(Vec::<(&str, &str)>::new()).unwrap();
        assert!(ontology.is_empty());
        assert!(ontology.roots().is_empty());
    }
}
