use phenosim::parser::dataset::read_dataset;
use phenosim::similarity::{GroupSimilarity, Resnik, Similarity, StandardCombiner};
use phenosim::{
    AnnotationCorpus, FrequencySource, InformationContent, MatrixBuilder, MatrixOptions, Ontology,
    PhenoError, PhenotypeSet, Smoothing, TermSet, ValidationMode,
};

const IC_A: f64 = 0.405_465_108_108_164_4;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn worked_example() -> (Ontology, Vec<PhenotypeSet>) {
    let ontology = Ontology::from_edge_file("tests/data/edges.tsv").unwrap();
    let patients = read_dataset("tests/data/patients.tsv").unwrap();
    (ontology, patients)
}

/// An ontology with several levels, multiple parents and two roots
fn larger_ontology() -> Ontology {
    let mut edges: Vec<(String, String)> = Vec::new();
    for i in 0..4 {
        edges.push((format!("L1-{i}"), "Root".to_string()));
        for j in 0..4 {
            edges.push((format!("L2-{i}-{j}"), format!("L1-{i}")));
            for k in 0..3 {
                edges.push((format!("L3-{i}-{j}-{k}"), format!("L2-{i}-{j}")));
            }
        }
    }
    // terms with several parents
    edges.push(("L3-0-0-0".to_string(), "L2-1-1".to_string()));
    edges.push(("L2-2-2".to_string(), "L1-3".to_string()));
    // second root
    edges.push(("Other-1".to_string(), "Other".to_string()));
    Ontology::from_edges(edges).unwrap()
}

fn larger_patients() -> Vec<PhenotypeSet> {
    (0..12)
        .map(|p: usize| {
            let terms = [
                format!("L3-{}-{}-{}", p % 4, (p / 2) % 4, p % 3),
                format!("L2-{}-{}", (p + 1) % 4, p % 4),
                format!("L3-{}-{}-{}", (p + 2) % 4, (p + 3) % 4, (p + 1) % 3),
            ];
            let mut set = PhenotypeSet::new(format!("P{p}"), terms);
            if p % 5 == 0 {
                set.insert("Other-1");
            }
            set
        })
        .collect()
}

#[test]
fn annotation_counts() {
    let (ontology, patients) = worked_example();
    let corpus = AnnotationCorpus::from_phenotype_sets(&ontology, &patients).unwrap();
    assert_eq!(corpus.total(), 3);
    assert_eq!(corpus.count_of("R").unwrap(), 3);
    assert_eq!(corpus.count_of("A").unwrap(), 2);
    assert_eq!(corpus.count_of("B").unwrap(), 2);

    let ic = InformationContent::new(&corpus, Smoothing::None);
    assert_eq!(ic.ic_of("R").unwrap(), 0.0);
    assert!(close(ic.ic_of("A").unwrap(), IC_A));
    assert!(close(ic.ic_of("B").unwrap(), IC_A));

    let resnik = Resnik::new(&ontology, &ic);
    let a = ontology.index_of("A").unwrap();
    let b = ontology.index_of("B").unwrap();
    assert_eq!(resnik.calculate(a, b).unwrap(), 0.0);
}

#[test]
fn worked_example_matrix() {
    let (ontology, patients) = worked_example();
    let matrix = MatrixBuilder::new(&ontology, MatrixOptions::new(FrequencySource::Dataset))
        .build(&patients)
        .unwrap();

    assert_eq!(matrix.ids(), &["P1", "P2", "P3"]);
    assert_eq!(matrix.get(0, 1), 0.0);
    assert!(close(matrix.get(0, 2), 0.304_098_831_081_123_3));
    assert!(close(matrix.get(0, 0), IC_A));
    assert!(close(matrix.get(2, 2), IC_A));
    assert_eq!(matrix.get(0, 2), matrix.get(2, 0));
    assert_eq!(matrix.get(1, 2), matrix.get(0, 2));

    let mut out = Vec::new();
    matrix.write_tsv(&mut out).unwrap();
    let out = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "ID\tP1\tP2\tP3");
    assert!(lines[1].starts_with("P1\t"));
    assert_eq!(lines[1].split('\t').nth(2), Some("0"));
}

#[test]
fn self_similarity_reduction() {
    let (ontology, patients) = worked_example();
    let sets: Vec<TermSet> = patients
        .iter()
        .map(|set| set.resolve(&ontology).unwrap())
        .collect();
    let corpus = AnnotationCorpus::from_sets(&ontology, &sets).unwrap();
    let ic = InformationContent::new(&corpus, Smoothing::None);
    let sim = GroupSimilarity::new(StandardCombiner::Bma, Resnik::new(&ontology, &ic));

    for set in &sets {
        assert_eq!(
            sim.self_similarity(set).unwrap(),
            sim.calculate(set, set).unwrap()
        );
    }
    assert!(close(sim.self_similarity(&sets[0]).unwrap(), IC_A));
}

#[test]
fn ontology_from_obo() {
    let ontology = Ontology::from_obo("tests/data/small.obo").unwrap();
    let patients = vec![
        PhenotypeSet::new("P1", ["HP:0000005"]),
        PhenotypeSet::new("P2", ["HP:0000002", "HP:0000004"]),
        PhenotypeSet::new("P3", ["HP:0000004"]),
    ];
    let matrix = MatrixBuilder::new(&ontology, MatrixOptions::new(FrequencySource::Dataset))
        .build(&patients)
        .unwrap();

    // HP:0000004 is annotated to every entity
    assert_eq!(matrix.score("P1", "P3"), Some(0.0));
    assert!(matrix.score("P1", "P2").unwrap() > 0.0);

    let err = MatrixBuilder::new(&ontology, MatrixOptions::new(FrequencySource::Dataset))
        .build(&[PhenotypeSet::new("P1", ["HP:0000009"])])
        .unwrap_err();
    assert!(matches!(err, PhenoError::UnknownTerm { .. }));
}

#[test]
fn matrix_properties() {
    let ontology = larger_ontology();
    let patients = larger_patients();
    let options = MatrixOptions::new(FrequencySource::Dataset);
    let matrix = MatrixBuilder::new(&ontology, options.clone())
        .build(&patients)
        .unwrap();

    let sets: Vec<TermSet> = patients
        .iter()
        .map(|set| set.resolve(&ontology).unwrap())
        .collect();
    let corpus = AnnotationCorpus::from_sets(&ontology, &sets).unwrap();
    let ic = InformationContent::new(&corpus, Smoothing::None);

    let n = matrix.len();
    assert_eq!(n, 12);
    for i in 0..n {
        let self_sim = sets[i]
            .iter()
            .map(|term| ic.get(term).unwrap())
            .sum::<f64>()
            / sets[i].len() as f64;
        assert!(close(matrix.get(i, i), self_sim));
        for j in 0..n {
            assert_eq!(matrix.get(i, j), matrix.get(j, i));
            assert!(matrix.get(i, j) >= 0.0);
        }
    }

    // identical inputs give bit-identical results
    let again = MatrixBuilder::new(&ontology, options.clone())
        .build(&patients)
        .unwrap();
    assert_eq!(matrix, again);

    let sequential = MatrixBuilder::new(&ontology, options.with_parallel(false))
        .build(&patients)
        .unwrap();
    assert_eq!(matrix, sequential);
}

#[test]
fn term_similarity_bounds_and_monotonicity() {
    let ontology = larger_ontology();
    let corpus = AnnotationCorpus::from_phenotype_sets(&ontology, &larger_patients()).unwrap();
    let ic = InformationContent::new(&corpus, Smoothing::AddOne);
    let resnik = Resnik::new(&ontology, &ic);

    for a in ontology.indices() {
        for ancestor in ontology.ancestors_of(a) {
            assert!(corpus.count(ancestor) >= corpus.count(a));
            assert!(ic.get(ancestor).unwrap() <= ic.get(a).unwrap());
        }
        for b in ontology.indices().step_by(3) {
            let score = resnik.calculate(a, b).unwrap();
            assert!(score >= 0.0);
            assert!(score <= ic.get(a).unwrap().min(ic.get(b).unwrap()));
            assert_eq!(score, resnik.calculate(b, a).unwrap());
        }
    }
    assert!(resnik.cache().hits() > 0);
}

#[test]
fn external_frequencies_need_annotations() {
    let (ontology, patients) = worked_example();
    let corpus = AnnotationCorpus::from_counts(&ontology, [("R", 10), ("A", 3)], 10).unwrap();

    let options = MatrixOptions::new(FrequencySource::External(corpus.clone()));
    let err = MatrixBuilder::new(&ontology, options)
        .build(&patients)
        .unwrap_err();
    assert_eq!(
        err,
        PhenoError::MissingAnnotation {
            term: "B".to_string(),
            entity: Some("P2".to_string())
        }
    );

    let options = MatrixOptions::new(FrequencySource::External(corpus.clone()))
        .with_validation(ValidationMode::DropUnknownTerms);
    let matrix = MatrixBuilder::new(&ontology, options).build(&patients).unwrap();
    assert_eq!(matrix.ids(), &["P1", "P3"]);
    assert_eq!(matrix.get(0, 1), matrix.get(0, 0));

    let options = MatrixOptions::new(FrequencySource::External(corpus))
        .with_smoothing(Smoothing::AddOne);
    let matrix = MatrixBuilder::new(&ontology, options).build(&patients).unwrap();
    assert_eq!(matrix.len(), 3);
    assert!(matrix.excluded().is_empty());
}
