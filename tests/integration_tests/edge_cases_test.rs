// tests/integration_tests/edge_cases_test.rs
use super::common::{create_test_file, load};
use anyhow::Result;
use zks::{Config, Corpus, CorpusError, Diagnostic, NoteId};

#[test]
fn test_empty_directory() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let corpus = load(temp_dir.path())?;

    assert!(corpus.is_empty());
    assert!(corpus.importance().scores.is_empty());
    assert!(corpus.search("anything", &[] as &[&str])?.is_empty());
    assert!(corpus.query(&["status=draft"])?.is_empty());
    assert!(corpus.backlinks("x.md").is_empty());
    Ok(())
}

#[test]
fn test_single_note_without_links() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    create_test_file(temp_dir.path(), "solo.md", "just one note")?;
    let corpus = load(temp_dir.path())?;

    assert!((corpus.importance().get("solo.md") - 1.0).abs() < 1e-9);
    let results = corpus.search("note", &[] as &[&str])?;
    assert_eq!(results.len(), 1);
    assert!((results[0].combined_score - 1.0).abs() < 1e-9);
    assert!(corpus.backlinks("solo.md").is_empty());
    Ok(())
}

#[test]
fn test_missing_directory_is_fatal() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let err = Corpus::load(&Config::new(temp_dir.path().join("absent"))).unwrap_err();
    assert!(matches!(err, CorpusError::DirectoryMissing { .. }));
    Ok(())
}

#[test]
fn test_one_bad_note_does_not_block_the_rest() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    create_test_file(temp_dir.path(), "good.md", "---\ntitle: Good\n---\nsearchable text")?;
    create_test_file(temp_dir.path(), "bad.md", "---\ntitle: [broken\n---\nsearchable text")?;
    create_test_file(temp_dir.path(), "open.md", "---\ntitle: never closed\nsearchable text")?;
    std::fs::write(temp_dir.path().join("binary.md"), [0xff_u8, 0xfe, 0x00, 0x01])?;

    let corpus = load(temp_dir.path())?;
    let results = corpus.search("searchable", &[] as &[&str])?;
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document.id, NoteId::new("good.md"));

    let skipped = corpus
        .diagnostics()
        .iter()
        .filter(|d| matches!(d, Diagnostic::SkippedFile { .. }))
        .count();
    assert_eq!(skipped, 3);
    Ok(())
}

#[test]
fn test_discovery_order_does_not_change_scores() -> Result<()> {
    // Same graph under two naming schemes that sort in opposite orders.
    let first = tempfile::tempdir()?;
    create_test_file(first.path(), "a.md", "[[b]] [[c]]")?;
    create_test_file(first.path(), "b.md", "[[c]]")?;
    create_test_file(first.path(), "c.md", "[[a]]")?;

    let second = tempfile::tempdir()?;
    create_test_file(second.path(), "z.md", "[[y]] [[x]]")?;
    create_test_file(second.path(), "y.md", "[[x]]")?;
    create_test_file(second.path(), "x.md", "[[z]]")?;

    let first = load(first.path())?;
    let second = load(second.path())?;
    for (a, b) in [("a.md", "z.md"), ("b.md", "y.md"), ("c.md", "x.md")] {
        let (a, b) = (first.importance().get(a), second.importance().get(b));
        assert!((a - b).abs() < 1e-12, "{a} != {b}");
    }
    Ok(())
}

#[test]
fn test_links_inside_code_are_ignored() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    create_test_file(
        temp_dir.path(),
        "code.md",
        "Use `[[target]]` syntax.\n\n```\n[[target]]\n```\n",
    )?;
    create_test_file(temp_dir.path(), "target.md", "target")?;
    let corpus = load(temp_dir.path())?;

    assert!(corpus.backlinks("target.md").is_empty());
    assert!(corpus.graph().unresolved().is_empty());
    Ok(())
}

#[test]
fn test_excluded_directories() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    create_test_file(temp_dir.path(), "keep.md", "kept")?;
    create_test_file(temp_dir.path(), "templates/daily.md", "{{date}}")?;

    let mut config = Config::new(temp_dir.path().to_path_buf());
    config.scan.exclude = vec!["templates".to_owned()];
    let corpus = Corpus::load(&config)?;
    assert_eq!(corpus.len(), 1);
    Ok(())
}
