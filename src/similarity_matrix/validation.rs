use std::collections::HashSet;

use tracing::{debug, warn};

use crate::set::{PhenotypeSet, TermSet};
use crate::similarity_matrix::{Exclusion, ValidationMode};
use crate::term::TermGroup;
use crate::{usize_to_f64, InformationContent, Ontology, PhenoError, PhenoResult};

/// Entities that passed validation and the ones that were excluded
#[derive(Debug, Default)]
pub(crate) struct Validated {
    pub retained: Vec<TermSet>,
    pub excluded: Vec<Exclusion>,
    /// Number of unknown terms that were dropped
    pub dropped_terms: usize,
}

impl Validated {
    fn exclude(&mut self, error: PhenoError, entity: &str) {
        warn!("Excluding entity {}: {}", entity, error);
        self.excluded.push(Exclusion::new(entity, error));
    }
}

/// Fails if the same entity identifier occurs more than once
pub(crate) fn unique_entities(sets: &[PhenotypeSet]) -> PhenoResult<()> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(sets.len());
    for set in sets {
        if !seen.insert(set.id()) {
            return Err(PhenoError::DuplicateEntity {
                entity: set.id().to_string(),
            });
        }
    }
    Ok(())
}

/// Resolves all entities against the ontology
///
/// Entities (or terms) that fail are excluded according to `mode`.
/// In [`ValidationMode::Strict`] the first failure is returned as error.
pub(crate) fn resolve_entities(
    ontology: &Ontology,
    sets: &[PhenotypeSet],
    mode: ValidationMode,
) -> PhenoResult<Validated> {
    unique_entities(sets)?;

    let mut validated = Validated::default();
    let mut total_terms = 0usize;
    for set in sets {
        match mode {
            ValidationMode::Strict => validated.retained.push(set.resolve(ontology)?),
            ValidationMode::SkipEntities => match set.resolve(ontology) {
                Ok(resolved) => validated.retained.push(resolved),
                Err(err) => validated.exclude(err, set.id()),
            },
            ValidationMode::DropUnknownTerms => {
                let (resolved, unknown) = set.resolve_known(ontology);
                total_terms += set.len();
                validated.dropped_terms += unknown.len();
                for term in unknown {
                    debug!("Dropping unknown term {} of entity {}", term, set.id());
                }
                if resolved.is_empty() {
                    validated.exclude(set.empty_error(), set.id());
                } else {
                    validated.retained.push(resolved);
                }
            }
        }
    }
    if validated.dropped_terms > 0 {
        warn!(
            "Dropped {} of {} terms ({:.1}%) that are not part of the ontology",
            validated.dropped_terms,
            total_terms,
            percentage(validated.dropped_terms, total_terms)
        );
    }
    Ok(validated)
}

fn percentage(part: usize, total: usize) -> f64 {
    usize_to_f64(part) * 100.0 / usize_to_f64(total)
}

/// Ensures that every ancestor of every term has a defined
/// information content
///
/// In [`ValidationMode::Strict`] the first failure is returned as error.
/// [`ValidationMode::SkipEntities`] excludes the entity,
/// [`ValidationMode::DropUnknownTerms`] drops the term and excludes the
/// entity only if no terms are left.
pub(crate) fn check_information_content(
    ic: &InformationContent,
    validated: Validated,
    mode: ValidationMode,
) -> PhenoResult<Validated> {
    let Validated {
        retained,
        mut excluded,
        dropped_terms,
    } = validated;
    let mut checked = Validated {
        retained: Vec::with_capacity(retained.len()),
        excluded: Vec::new(),
        dropped_terms,
    };
    checked.excluded.append(&mut excluded);

    for set in retained {
        let mut defined = TermGroup::with_capacity(set.len());
        let mut missing = None;
        for term in &set {
            match ic.first_undefined_ancestor(term) {
                None => {
                    defined.insert(term);
                }
                Some(ancestor) => {
                    let err = PhenoError::MissingAnnotation {
                        term: ancestor.to_string(),
                        entity: Some(set.id().to_string()),
                    };
                    if mode == ValidationMode::DropUnknownTerms {
                        warn!(
                            "Dropping term {} of entity {}: {}",
                            ic.ontology().term_id(term),
                            set.id(),
                            err
                        );
                    }
                    missing.get_or_insert(err);
                }
            }
        }

        match (missing, mode) {
            (None, _) => checked.retained.push(set),
            (Some(err), ValidationMode::Strict) => return Err(err),
            (Some(err), ValidationMode::SkipEntities) => checked.exclude(err, set.id()),
            (Some(err), ValidationMode::DropUnknownTerms) => {
                if defined.is_empty() {
                    checked.exclude(err, set.id());
                } else {
                    checked.retained.push(TermSet::new(set.id(), defined));
                }
            }
        }
    }
    Ok(checked)
}
