//! Calculates the pairwise similarity of all entities of a dataset
//!
//! ```text
//! cargo run --release --example resnik_matrix -- hp.obo patients.tsv matrix.tsv
//! ```
//!
//! The ontology is read from an OBO file, or from a file with tab-separated
//! `child<TAB>parent` relationships. Terms that are not part of the ontology
//! are dropped if `--drop-unknown` is given as the last argument.
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::process;

use phenosim::parser::dataset::read_dataset;
use phenosim::{FrequencySource, MatrixBuilder, MatrixOptions, Ontology, ValidationMode};

fn read_ontology(path_arg: &str) -> Result<Ontology, phenosim::PhenoError> {
    let path = Path::new(path_arg);

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("obo") => Ontology::from_obo(path),
        _ => Ontology::from_edge_file(path),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(tracing::Level::INFO)
        .compact()
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: resnik_matrix <ontology.obo|edges.tsv> <dataset.tsv> <output.tsv> [--drop-unknown]");
        process::exit(1);
    }

    let ontology = read_ontology(&args[1])?;
    let dataset = read_dataset(&args[2])?;

    let validation = if args.get(4).map(String::as_str) == Some("--drop-unknown") {
        ValidationMode::DropUnknownTerms
    } else {
        ValidationMode::Strict
    };
    let options = MatrixOptions::new(FrequencySource::Dataset).with_validation(validation);
    let matrix = MatrixBuilder::new(&ontology, options).build(&dataset)?;

    for exclusion in matrix.excluded() {
        eprintln!("Excluded {}: {}", exclusion.entity(), exclusion.reason());
    }

    let output = BufWriter::new(File::create(&args[3])?);
    matrix.write_tsv(output)?;
    println!("Wrote {0}x{0} matrix to {1}", matrix.len(), args[3]);
    Ok(())
}
