//! Parses entities and their annotated terms from a tab-separated file
//!
//! ```text
//! ID      HPO
//! P1      HP:0001250,HP:0001263
//! P2      HP:0000252
//! ```
//!
//! The first line is a header and is ignored. Column 1 contains the entity
//! identifier, column 2 a comma-separated list of term identifiers.
//! Further columns are ignored.
use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use tracing::{debug, warn};

use crate::parser::open;
use crate::{PhenoError, PhenoResult, PhenotypeSet};

/// Reads all entities from a file
///
/// # Errors
///
/// - [`PhenoError::CannotOpenFile`] if the file cannot be opened
/// - [`PhenoError::InvalidInput`] if the file cannot be read
pub fn read_dataset<P: AsRef<Path>>(path: P) -> PhenoResult<Vec<PhenotypeSet>> {
    parse_dataset(open(path)?)
}

/// Parses all entities
///
/// - Rows without an entity identifier are skipped
/// - Rows without terms produce an empty [`PhenotypeSet`]
/// - Several rows with the same identifier are merged into one set
///
/// Entities are returned in the order of their first occurrence.
///
/// # Errors
///
/// [`PhenoError::InvalidInput`] if the data cannot be read
///
/// # Examples
///
/// ```
/// use phenosim::parser::dataset::parse_dataset;
///
/// let data = "ID\tHPO\nP1\tHP:1,HP:2\nP2\tHP:3\nP1\tHP:4\n";
/// let sets = parse_dataset(data.as_bytes()).unwrap();
///
/// assert_eq!(sets.len(), 2);
/// assert_eq!(sets[0].id(), "P1");
/// assert_eq!(sets[0].len(), 3);
/// assert_eq!(sets[1].terms()[0], "HP:3");
/// ```
pub fn parse_dataset<R: BufRead>(reader: R) -> PhenoResult<Vec<PhenotypeSet>> {
    let mut sets: Vec<PhenotypeSet> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.map_err(|err| PhenoError::InvalidInput(err.to_string()))?;
        // header
        if idx == 0 {
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let mut cols = line.split('\t');
        let id = cols.next().map(str::trim).unwrap_or_default();
        if id.is_empty() {
            warn!("Skipping row {} without entity identifier", idx + 1);
            continue;
        }
        let terms = cols
            .next()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|term| !term.is_empty());

        match positions.get(id) {
            Some(pos) => {
                for term in terms {
                    sets[*pos].insert(term);
                }
            }
            None => {
                positions.insert(id.to_string(), sets.len());
                sets.push(PhenotypeSet::new(id, terms));
            }
        }
    }

    debug!("Parsed {} entities", sets.len());
    Ok(sets)
}
