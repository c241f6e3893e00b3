//! Loading keyword lexicons from disk.

use pdf2table::{ExtractionConfig, Lexicon, Pdf2TableError, PageResolver};
use std::io::Write;
use tempfile::NamedTempFile;

const GERMAN_ONLY: &str = r#"{
  "languages": {
    "de": {
      "page_words": ["seite", "seiten"],
      "range_connectors": ["bis"],
      "clause_connectors": ["und"],
      "ordinals": { "erste": { "nth": 1 }, "letzte": "last" }
    }
  }
}"#;

fn lexicon_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn lexicon_loads_from_path() {
    let file = lexicon_file(GERMAN_ONLY);
    let lexicon = Lexicon::from_path(file.path()).unwrap();
    assert_eq!(lexicon.languages.len(), 1);

    let resolver = PageResolver::new(&lexicon).unwrap();
    assert_eq!(resolver.resolve_global("Seiten 2 bis 3", 5).into_vec(), vec![1, 2]);
    assert_eq!(resolver.resolve_global("die letzte Seite", 5).into_vec(), vec![4]);
    // English keywords are gone with the default tables.
    assert_eq!(
        resolver.resolve_global("the last page", 3).into_vec(),
        vec![0, 1, 2]
    );
}

#[test]
fn loaded_lexicon_drives_a_config() {
    let file = lexicon_file(GERMAN_ONLY);
    let lexicon = Lexicon::from_path(file.path()).unwrap();
    let config = ExtractionConfig::builder().lexicon(lexicon).build().unwrap();
    assert!(config.lexicon.languages.contains_key("de"));
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.json");
    let err = Lexicon::from_path(&path).unwrap_err();
    match &err {
        Pdf2TableError::LexiconRead { path: p, .. } => assert_eq!(p, &path),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn malformed_file_is_invalid_lexicon() {
    let file = lexicon_file(r#"{"languages": {"de": {"ordinals": {"erste": "first"}}}}"#);
    let err = Lexicon::from_path(file.path()).unwrap_err();
    assert!(matches!(err, Pdf2TableError::InvalidLexicon { .. }));
}
