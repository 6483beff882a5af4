use super::*;

#[test]
fn parses_both_lists() {
    let sets = parse_keywords("brand:\n  - nike\n  - Just Do It\ncompetitors:\n  - adidas\n")
        .unwrap();
    assert_eq!(sets.brand, vec!["nike", "Just Do It"]);
    assert_eq!(sets.competitors, vec!["adidas"]);
}

#[test]
fn missing_lists_default_to_empty() {
    let sets = parse_keywords("brand:\n  - nike\n").unwrap();
    assert_eq!(sets.brand, vec!["nike"]);
    assert!(sets.competitors.is_empty());

    let sets = parse_keywords("{}").unwrap();
    assert_eq!(sets, KeywordSets::default());
}

#[test]
fn entries_are_trimmed() {
    let sets = parse_keywords("brand:\n  - '  nike  '\n").unwrap();
    assert_eq!(sets.brand, vec!["nike"]);
}

#[test]
fn rejects_blank_keyword() {
    let err = parse_keywords("brand:\n  - '   '\n").unwrap_err();
    assert!(err.to_string().contains("non-empty"), "got: {err}");
}

#[test]
fn rejects_case_insensitive_duplicate() {
    let err = parse_keywords("competitors:\n  - Adidas\n  - adidas\n").unwrap_err();
    assert!(
        err.to_string().contains("duplicate competitors keyword"),
        "got: {err}"
    );
}

#[test]
fn same_keyword_in_both_lists_is_allowed() {
    let sets = parse_keywords("brand:\n  - shoes\ncompetitors:\n  - shoes\n").unwrap();
    assert_eq!(sets.brand, sets.competitors);
}

#[test]
fn malformed_yaml_is_parse_error() {
    let err = parse_keywords("brand: [unterminated").unwrap_err();
    assert!(matches!(err, ConfigError::KeywordsFileParse(_)));
}

#[test]
fn missing_file_is_io_error() {
    let err = load_keywords(Path::new("/definitely/not/here/keywords.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::KeywordsFileIo { .. }));
}

#[test]
fn load_keywords_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("keywords.yaml");
    assert!(
        path.exists(),
        "keywords.yaml missing at {path:?}; required for this test"
    );
    let result = load_keywords(&path);
    assert!(result.is_ok(), "failed to load keywords.yaml: {result:?}");
    assert!(!result.unwrap().brand.is_empty());
}
