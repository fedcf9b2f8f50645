//! Parses the `is_a` relationships of an OBO file
//!
//! Only `[Term]` stanzas are considered. Terms marked as `is_obsolete: true`
//! are skipped, they are not replaced by their successors.
//!
//! Terms without any `is_a` relationship only become part of the ontology
//! if another term lists them as parent.
use std::io::Read;
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::parser::{open, Edge};
use crate::{PhenoError, PhenoResult};

/// Reads all `(child, parent)` relationships from an OBO file
///
/// # Errors
///
/// [`PhenoError::CannotOpenFile`] if the file cannot be read
pub fn edges_from_obo<P: AsRef<Path>>(path: P) -> PhenoResult<Vec<Edge>> {
    let filename = path.as_ref().display().to_string();
    let mut content = String::new();
    open(path)?
        .read_to_string(&mut content)
        .map_err(|_| PhenoError::CannotOpenFile(filename))?;
    Ok(edges_from_obo_str(&content))
}

/// Parses all `(child, parent)` relationships from the content of an OBO file
///
/// # Examples
///
/// ```
/// use phenosim::parser::hp_obo::edges_from_obo_str;
///
/// let obo = "format-version: 1.2
///
/// [Term]
/// id: HP:0000001
/// name: All
///
/// [Term]
/// id: HP:0000118
/// name: Phenotypic abnormality
/// is_a: HP:0000001 ! All
///
/// [Term]
/// id: HP:0000005
/// is_obsolete: true
/// is_a: HP:0000001 ! All
/// ";
///
/// let edges = edges_from_obo_str(obo);
/// assert_eq!(edges.len(), 1);
/// assert_eq!(edges[0].0, "HP:0000118");
/// assert_eq!(edges[0].1, "HP:0000001");
/// ```
pub fn edges_from_obo_str(content: &str) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut stanza = Stanza::default();

    for line in content.lines().map(str::trim) {
        if line.starts_with('[') {
            stanza.finish(&mut edges);
            stanza = Stanza::new(line == "[Term]");
            continue;
        }
        if !stanza.is_term {
            continue;
        }
        match line.split_once(':') {
            Some(("id", value)) => stanza.id = Some(value.trim().to_string()),
            Some(("is_a", value)) => match value.split_whitespace().next() {
                Some(parent) => stanza.parents.push(parent.to_string()),
                None => warn!("Unable to parse parent from: {}", line),
            },
            Some(("is_obsolete", value)) => stanza.obsolete = value.trim() == "true",
            _ => (),
        }
    }
    stanza.finish(&mut edges);

    debug!("Parsed {} is_a relationships", edges.len());
    edges
}

#[derive(Default)]
struct Stanza {
    is_term: bool,
    id: Option<String>,
    parents: Vec<String>,
    obsolete: bool,
}

impl Stanza {
    fn new(is_term: bool) -> Self {
        Self {
            is_term,
            ..Default::default()
        }
    }

    fn finish(&mut self, edges: &mut Vec<Edge>) {
        if !self.is_term {
            return;
        }
        let Some(id) = self.id.take() else {
            warn!("Ignoring term without id");
            return;
        };
        if self.obsolete {
            trace!("Ignoring obsolete term {}", id);
            return;
        }
        for parent in self.parents.drain(..) {
            edges.push((id.as_str().into(), parent.into()));
        }
    }
}
