//! Integration tests for vocab.

use std::fs;
use std::io::Write;

use flate2::Compression as GzLevel;
use flate2::write::GzEncoder;
use tempfile::{Builder, NamedTempFile, TempDir};

use vocab::{
    Compression, EnumLookupValidator, FormatValidator, IndexedTable, LineFormat, MatchRules,
    Source, TableLoader, ValidatorSetConfig, Verdict, VocabError,
};

/// Helper to create a temporary file with given content.
fn create_test_file(content: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .suffix(".tsv")
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

/// Helper to create a gzipped temporary file with given content.
fn create_gzip_file(content: &str) -> NamedTempFile {
    let file = Builder::new()
        .suffix(".tsv.gz")
        .tempfile()
        .expect("Failed to create temp file");
    let mut encoder = GzEncoder::new(file.reopen().unwrap(), GzLevel::default());
    encoder.write_all(content.as_bytes()).unwrap();
    encoder.finish().unwrap();
    file
}

fn row(cells: &[Option<&str>]) -> Vec<Option<String>> {
    cells.iter().map(|c| c.map(str::to_string)).collect()
}

const ANIMALS: &str = "Scientific_Name\tGenBank_Common_Name\tSynonyms\tOther_Common_Name\n\
                       Felis catus\tdomestic cat\tFelis domesticus, Felis silvestris catus\tcat, house cat\n\
                       Canis lupus familiaris\tdog\tCanis familiaris\tdog, domestic dog\n\
                       Lynx lynx\tEurasian lynx\tFelis lynx\tcat, lynx\n\
                       \n\
                       Mus musculus\thouse mouse\t\tmouse\n";

fn animal_format() -> LineFormat {
    LineFormat::new(["\t", "\t", "\t"])
        .unwrap()
        .with_sub_delimiter(2, ", ")
        .unwrap()
        .with_sub_delimiter(3, ", ")
        .unwrap()
}

fn animal_rules() -> MatchRules {
    MatchRules::new()
        .add_correct_columns(["Scientific_Name", "Synonyms"])
        .and_then(|r| r.add_suggested_columns(["GenBank_Common_Name", "Other_Common_Name"]))
        .unwrap()
}

const PROBES: &[&str] = &[
    "Felis catus",
    "Felis silvestris catus",
    "Felis domesticus, Felis silvestris catus",
    "Canis familiaris",
    "cat",
    "house cat",
    "dog",
    "domestic cat",
    "mouse",
    "lynx",
    "Felis",
    "",
    "zebra",
];

// =============================================================================
// Table Properties
// =============================================================================

#[test]
fn test_concrete_table_scenario() {
    let mut table = IndexedTable::new(["col1", "col2", "col3"], "col2").unwrap();
    table
        .add_row(row(&[Some("e1"), Some("e2"), Some("e3")]))
        .unwrap();

    assert_eq!(table.get("col1", "e2").unwrap(), Some("e1"));
    assert_eq!(table.get_at(0, 0).unwrap(), Some("e1"));
    assert_eq!(table.get("col3", "e2").unwrap(), Some("e3"));
    assert!(matches!(
        table.get("col1", "nope"),
        Err(VocabError::KeyNotFound(_))
    ));
}

#[test]
fn test_duplicate_key_leaves_table_unchanged() {
    let mut table = IndexedTable::new(["a", "b"], "a").unwrap();
    table.add_row(row(&[Some("k"), Some("1")])).unwrap();

    let err = table.add_row(row(&[Some("k"), Some("2")])).unwrap_err();
    assert!(matches!(err, VocabError::DuplicateKey(ref k) if k == "k"));
    assert_eq!(table.size(), (1, 2));
    assert_eq!(table.get("b", "k").unwrap(), Some("1"));
}

#[test]
fn test_secondary_lookup_through_loader() {
    let file = create_test_file(ANIMALS);
    let table = TableLoader::new(animal_format())
        .load(file.path(), "Scientific_Name", &["Other_Common_Name"])
        .unwrap();

    assert_eq!(table.row_count(), 4);
    assert_eq!(
        table
            .get_by_secondary("Scientific_Name", "cat", "Other_Common_Name")
            .unwrap(),
        vec![Some("Felis catus"), Some("Lynx lynx")]
    );
    // The raw cell resolves to its own row.
    assert_eq!(
        table
            .get_by_secondary("Scientific_Name", "dog, domestic dog", "Other_Common_Name")
            .unwrap(),
        vec![Some("Canis lupus familiaris")]
    );
}

#[test]
fn test_loader_reports_malformed_line() {
    let file = create_test_file("a\tb\nx\ty\nbroken\n");
    let err = TableLoader::new(LineFormat::new(["\t"]).unwrap())
        .load(file.path(), "a", &["b"])
        .unwrap_err();
    assert!(matches!(err, VocabError::Format { line: 3, .. }));
}

#[test]
fn test_loader_rejects_duplicate_primary() {
    let file = create_test_file("a\tb\nx\t1\nx\t2\n");
    let err = TableLoader::new(LineFormat::new(["\t"]).unwrap())
        .load(file.path(), "a", &["b"])
        .unwrap_err();
    assert!(matches!(err, VocabError::DuplicateKey(_)));
}

// =============================================================================
// Three-Tier Lookup
// =============================================================================

#[test]
fn test_three_tier_lookup_both_modes() {
    let file = create_test_file("A\tB\nx\ty\n");
    let format = LineFormat::new(["\t"]).unwrap();
    let rules = MatchRules::new()
        .add_correct("A")
        .and_then(|r| r.add_suggested("B"))
        .unwrap();

    let loaded =
        EnumLookupValidator::load("ab", file.path(), format.clone(), rules.clone()).unwrap();
    let streaming = EnumLookupValidator::streaming("ab", file.path(), format, rules).unwrap();

    for validator in [&loaded, &streaming] {
        assert_eq!(validator.check("x").unwrap(), Verdict::Accept);
        assert_eq!(
            validator.validate("y").unwrap().unwrap(),
            "Entered: y. Expected: any one of [x]"
        );
        assert_eq!(
            validator.validate("z").unwrap().unwrap(),
            "Entered: z. Expected: an entry from the columns [A]"
        );
    }
}

#[test]
fn test_correct_column_is_value_membership_both_modes() {
    // Primary column A holds "x", but only B is accepted and B never holds "x".
    let file = create_test_file("A\tB\nx\ty\nw\tx2\n");
    let format = LineFormat::new(["\t"]).unwrap();
    let rules = MatchRules::new().add_correct("B").unwrap();

    let table = TableLoader::new(format.clone())
        .load(file.path(), "A", &["B"])
        .unwrap();
    let loaded = EnumLookupValidator::materialized("b", table, rules.clone()).unwrap();
    let streaming = EnumLookupValidator::streaming("b", file.path(), format, rules).unwrap();

    for validator in [&loaded, &streaming] {
        assert_eq!(
            validator.validate("x").unwrap().unwrap(),
            "Entered: x. Expected: an entry from the columns [B]"
        );
        assert!(validator.check("y").unwrap().is_accept());
        assert!(validator.check("x2").unwrap().is_accept());
    }
}

#[test]
fn test_multi_value_membership() {
    let file = create_test_file("A\tB\nx\tp, q, r\n");
    let format = LineFormat::new(["\t"])
        .unwrap()
        .with_sub_delimiter(1, ", ")
        .unwrap();
    let rules = MatchRules::new()
        .add_correct("A")
        .and_then(|r| r.add_suggested("B"))
        .unwrap();
    let validator = EnumLookupValidator::load("ab", file.path(), format, rules).unwrap();

    let expected = |subject: &str| Verdict::Suggest {
        subject: subject.to_string(),
        options: vec!["x".to_string()],
    };
    for subject in ["p", "q", "r"] {
        assert_eq!(validator.check(subject).unwrap(), expected(subject));
    }
    assert!(matches!(
        validator.check("q, r").unwrap(),
        Verdict::Reject { .. }
    ));
}

#[test]
fn test_suggestions_keep_duplicates_and_order() {
    let file = create_test_file(ANIMALS);
    let validator =
        EnumLookupValidator::load("animal", file.path(), animal_format(), animal_rules()).unwrap();

    assert_eq!(
        validator.check("cat").unwrap(),
        Verdict::Suggest {
            subject: "cat".to_string(),
            options: vec![
                "Felis catus".to_string(),
                "Lynx lynx".to_string(),
                "Felis domesticus, Felis silvestris catus".to_string(),
                "Felis lynx".to_string(),
            ],
        }
    );
    // Mus musculus has no synonyms, so only its name is offered.
    assert_eq!(
        validator.validate("house mouse").unwrap().unwrap(),
        "Entered: house mouse. Expected: any one of [Mus musculus]"
    );
}

#[test]
fn test_first_suggestion_column_wins() {
    let file = create_test_file(ANIMALS);
    let validator =
        EnumLookupValidator::load("animal", file.path(), animal_format(), animal_rules()).unwrap();

    // "dog" is in both suggestion columns of one row.
    assert_eq!(
        validator.check("dog").unwrap(),
        Verdict::Suggest {
            subject: "dog".to_string(),
            options: vec![
                "Canis lupus familiaris".to_string(),
                "Canis familiaris".to_string(),
            ],
        }
    );
}

// =============================================================================
// Streaming vs Materialized
// =============================================================================

fn assert_modes_agree(path: &std::path::Path) {
    let loaded =
        EnumLookupValidator::load("animal", path, animal_format(), animal_rules()).unwrap();
    let streaming =
        EnumLookupValidator::streaming("animal", path, animal_format(), animal_rules()).unwrap();
    assert!(loaded.is_materialized());
    assert!(!streaming.is_materialized());

    for probe in PROBES {
        assert_eq!(
            loaded.check(probe).unwrap(),
            streaming.check(probe).unwrap(),
            "modes disagree on {:?}",
            probe
        );
        assert_eq!(
            loaded.validate(probe).unwrap(),
            streaming.validate(probe).unwrap()
        );
    }
}

#[test]
fn test_streaming_matches_materialized() {
    let file = create_test_file(ANIMALS);
    assert_modes_agree(file.path());
}

#[test]
fn test_streaming_matches_materialized_gzip() {
    let file = create_gzip_file(ANIMALS);
    assert_eq!(
        Source::new(file.path()).unwrap().compression(),
        Compression::Gzip
    );
    assert_modes_agree(file.path());
}

#[test]
fn test_gzip_and_plain_agree() {
    let plain = create_test_file(ANIMALS);
    let gzip = create_gzip_file(ANIMALS);
    let from_plain =
        EnumLookupValidator::streaming("animal", plain.path(), animal_format(), animal_rules())
            .unwrap();
    let from_gzip =
        EnumLookupValidator::load("animal", gzip.path(), animal_format(), animal_rules()).unwrap();

    for probe in PROBES {
        assert_eq!(from_plain.check(probe).unwrap(), from_gzip.check(probe).unwrap());
    }
}

#[test]
fn test_streaming_sees_file_changes() {
    let file = create_test_file("A\tB\nx\ty\n");
    let format = LineFormat::new(["\t"]).unwrap();
    let rules = MatchRules::new().add_correct("A").unwrap();
    let validator = EnumLookupValidator::streaming("ab", file.path(), format, rules).unwrap();

    assert!(!validator.check("w").unwrap().is_accept());
    fs::write(file.path(), "A\tB\nx\ty\nw\tv\n").unwrap();
    assert!(validator.check("w").unwrap().is_accept());
}

#[test]
fn test_unknown_rule_column_fails_at_construction() {
    let file = create_test_file(ANIMALS);
    let rules = MatchRules::new().add_correct("Genus").unwrap();
    assert!(matches!(
        EnumLookupValidator::streaming("animal", file.path(), animal_format(), rules.clone()),
        Err(VocabError::Config(_))
    ));
    assert!(matches!(
        EnumLookupValidator::load("animal", file.path(), animal_format(), rules),
        Err(VocabError::Config(_))
    ));
}

// =============================================================================
// Configuration and Registry
// =============================================================================

fn write_config(dir: &TempDir, load_into_memory: bool) -> std::path::PathBuf {
    fs::write(dir.path().join("animals.tsv"), ANIMALS).unwrap();
    let config = serde_json::json!({
        "string_format": [
            {
                "formatTag": "animal_subject",
                "filePath": "animals.tsv",
                "tableFormat": {
                    "format": ["\t", "\t", "\t"],
                    "entryFormat": [null, null, ", ", ", "]
                },
                "rules": {
                    "correct": ["Scientific_Name", "Synonyms"],
                    "suggestions": ["GenBank_Common_Name", "Other_Common_Name"]
                },
                "loadTableIntoMemory": load_into_memory
            },
            {
                "formatTag": "common_name",
                "filePath": "animals.tsv",
                "tableFormat": { "format": ["\t", "\t", "\t"] },
                "rules": { "correct": ["GenBank_Common_Name"] }
            }
        ]
    });
    let path = dir.path().join("formats.json");
    fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
    path
}

#[test]
fn test_registry_from_config() {
    let dir = TempDir::new().unwrap();
    let config = ValidatorSetConfig::from_path(write_config(&dir, true)).unwrap();
    let registry = config.build_registry().unwrap();

    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["animal_subject", "common_name"]
    );
    assert_eq!(registry.validate("animal_subject", "Felis lynx").unwrap(), None);
    assert_eq!(registry.validate("common_name", "dog").unwrap(), None);
    assert!(registry.validate("common_name", "Felis catus").unwrap().is_some());
    assert!(matches!(
        registry.validate("plant_subject", "x"),
        Err(VocabError::UnknownFormat(_))
    ));
}

#[test]
fn test_config_modes_agree() {
    let dir = TempDir::new().unwrap();
    let in_memory = ValidatorSetConfig::from_path(write_config(&dir, true))
        .unwrap()
        .build_registry()
        .unwrap();
    let streaming = ValidatorSetConfig::from_path(write_config(&dir, false))
        .unwrap()
        .build_registry()
        .unwrap();

    for probe in PROBES {
        assert_eq!(
            in_memory.validate("animal_subject", probe).unwrap(),
            streaming.validate("animal_subject", probe).unwrap()
        );
    }
}

#[test]
fn test_config_duplicate_format_tag() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, false);
    let mut config = ValidatorSetConfig::from_path(path).unwrap();
    let first = config.string_format[0].clone();
    config.string_format.push(first);

    assert!(matches!(
        config.build_registry(),
        Err(VocabError::DuplicateFormat(ref name)) if name == "animal_subject"
    ));
}

#[test]
fn test_config_missing_file() {
    let dir = TempDir::new().unwrap();
    let mut config = ValidatorSetConfig::from_path(write_config(&dir, true)).unwrap();
    config.string_format[0].file_path = "missing.tsv".into();
    assert!(matches!(
        config.build_registry(),
        Err(VocabError::Config(_))
    ));
}

#[test]
fn test_config_file_not_found() {
    assert!(matches!(
        ValidatorSetConfig::from_path("/nonexistent/formats.json"),
        Err(VocabError::Io { .. })
    ));
}

#[test]
fn test_validators_shared_across_threads() {
    let file = create_test_file(ANIMALS);
    let validator =
        EnumLookupValidator::load("animal", file.path(), animal_format(), animal_rules()).unwrap();

    std::thread::scope(|scope| {
        for probe in PROBES {
            let validator = &validator;
            scope.spawn(move || validator.check(probe).unwrap());
        }
    });
}
