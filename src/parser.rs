//! Parsing ontology and entity data from files
//!
//! - [`hp_obo`]: `is_a` relationships of an OBO file, e.g. `hp.obo`
//! - [`read_edges`]: tab-separated `child<TAB>parent` relationships
//! - [`dataset`]: entities and their terms

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::term::TermId;
use crate::{PhenoError, PhenoResult};

pub mod dataset;
pub mod hp_obo;

/// A `(child, parent)` relationship
pub type Edge = (TermId, TermId);

/// Opens a file for buffered reading
pub(crate) fn open<P: AsRef<Path>>(path: P) -> PhenoResult<BufReader<File>> {
    let filename = path.as_ref().display().to_string();
    let file = File::open(path).map_err(|_| PhenoError::CannotOpenFile(filename))?;
    Ok(BufReader::new(file))
}

/// Reads `child<TAB>parent` relationships from a file
///
/// Empty lines and lines starting with `#` are ignored.
///
/// # Errors
///
/// - [`PhenoError::CannotOpenFile`] if the file cannot be opened
/// - [`PhenoError::InvalidInput`] if a line does not contain two columns
pub fn read_edges<P: AsRef<Path>>(path: P) -> PhenoResult<Vec<Edge>> {
    parse_edges(open(path)?)
}

/// Parses `child<TAB>parent` relationships
///
/// Empty lines and lines starting with `#` are ignored.
///
/// # Errors
///
/// [`PhenoError::InvalidInput`] if a line does not contain two columns
///
/// # Examples
///
/// ```
/// use phenosim::parser::parse_edges;
///
/// let data = "# child\tparent\nHP:2\tHP:1\n\nHP:3\tHP:1\n";
/// let edges = parse_edges(data.as_bytes()).unwrap();
/// assert_eq!(edges.len(), 2);
/// assert_eq!(edges[1].0, "HP:3");
/// assert_eq!(edges[1].1, "HP:1");
/// ```
pub fn parse_edges<R: BufRead>(reader: R) -> PhenoResult<Vec<Edge>> {
    let mut edges = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|err| PhenoError::InvalidInput(err.to_string()))?;
        let line = line.trim_end();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut cols = line.split('\t').map(str::trim);
        let (Some(child), Some(parent)) = (cols.next(), cols.next()) else {
            return Err(PhenoError::InvalidInput(format!(
                "expected child and parent: {line}"
            )));
        };
        if child.is_empty() || parent.is_empty() {
            return Err(PhenoError::InvalidInput(format!(
                "expected child and parent: {line}"
            )));
        }
        edges.push((child.into(), parent.into()));
    }
    debug!("Parsed {} edges", edges.len());
    Ok(edges)
}
