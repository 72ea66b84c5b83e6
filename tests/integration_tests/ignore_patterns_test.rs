// tests/integration_tests/ignore_patterns_test.rs
use super::common::{create_ignore_file, create_test_file, load, setup_vault};
use anyhow::Result;
use zks::core::ignore::load_ignore_patterns;

#[test]
fn test_ignore_patterns() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    create_ignore_file(
        temp_dir.path(),
        &[
            "# Comment line",
            "drafts/",
            "!drafts/keep.md",
            "*.{bak,tmp}",
            "/README.md",
            "archive/**/*.md",
        ],
    )?;

    let patterns = load_ignore_patterns(temp_dir.path())?;

    assert!(patterns.matches("drafts/idea.md"), "Should match drafts/ pattern");
    assert!(!patterns.matches("drafts/keep.md"), "Should respect negation pattern");
    assert!(patterns.matches("note.bak"), "Should match brace group");
    assert!(patterns.matches("README.md"), "Should match anchored path at root");
    assert!(
        !patterns.matches("docs/README.md"),
        "Anchored pattern should not match below the root"
    );
    assert!(patterns.matches("archive/2023/old.md"), "Should match globstar pattern");
    assert!(!patterns.matches("notes/current.md"), "Should not match other notes");
    Ok(())
}

#[test]
fn test_ignored_notes_leave_the_corpus() -> Result<()> {
    let temp_dir = setup_vault()?;
    create_test_file(temp_dir.path(), "drafts/wip.md", "Links to [[index]]")?;
    create_ignore_file(temp_dir.path(), &["journal/", "drafts/"])?;

    let corpus = load(temp_dir.path())?;
    let ids: Vec<&str> = corpus.notes().map(|note| note.id.as_str()).collect();
    assert_eq!(ids, vec!["index.md", "math/graphs.md", "math/trees.md"]);
    assert!(corpus.backlinks("index.md").is_empty());
    Ok(())
}

#[test]
fn test_ignore_file_in_parent_directory_applies() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    create_ignore_file(temp_dir.path(), &["private.md"])?;
    create_test_file(temp_dir.path(), "vault/public.md", "visible")?;
    create_test_file(temp_dir.path(), "vault/private.md", "hidden")?;

    let corpus = load(&temp_dir.path().join("vault"))?;
    let ids: Vec<&str> = corpus.notes().map(|note| note.id.as_str()).collect();
    assert_eq!(ids, vec!["public.md"]);
    Ok(())
}

#[test]
fn test_invalid_ignore_file_is_fatal() -> Result<()> {
    let temp_dir = setup_vault()?;
    create_ignore_file(temp_dir.path(), &["*.{md"])?;
    assert!(load(temp_dir.path()).is_err());
    Ok(())
}
