// tests/integration_tests/backlinks_test.rs
use super::common::{create_test_file, load, setup_hello_corpus, setup_vault};
use anyhow::Result;
use zks::{Config, NoteId, lookup_links};

fn ids(names: &[&str]) -> Vec<NoteId> {
    names.iter().map(|name| NoteId::new(*name)).collect()
}

#[test]
fn test_backlinks_of_mutual_pair() -> Result<()> {
    let temp_dir = setup_hello_corpus()?;
    let corpus = load(temp_dir.path())?;

    assert_eq!(corpus.backlinks("B.md"), ids(&["A.md"]));
    assert_eq!(corpus.backlinks("A.md"), ids(&["B.md"]));
    assert!(corpus.backlinks("C.md").is_empty());
    Ok(())
}

#[test]
fn test_backlinks_through_titles_aliases_and_paths() -> Result<()> {
    let temp_dir = setup_vault()?;
    let corpus = load(temp_dir.path())?;

    assert_eq!(
        corpus.backlinks("math/graphs.md"),
        ids(&["index.md", "journal/2024-03-01.md", "math/trees.md"])
    );
    assert_eq!(corpus.backlinks("Graph Theory"), corpus.backlinks("networks"));
    assert_eq!(corpus.backlinks("trees"), ids(&["index.md", "math/graphs.md"]));
    assert!(corpus.backlinks("index.md").is_empty());
    Ok(())
}

#[test]
fn test_unknown_note_has_no_backlinks() -> Result<()> {
    let temp_dir = setup_vault()?;
    let corpus = load(temp_dir.path())?;

    assert!(corpus.backlinks("does-not-exist.md").is_empty());
    assert!(corpus.backlink_edges("does-not-exist.md").is_empty());
    Ok(())
}

#[test]
fn test_repeated_links_collapse_in_backlinks_but_not_edges() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    create_test_file(temp_dir.path(), "a.md", "[[b]] and again [[b]]\n[[b]]")?;
    create_test_file(temp_dir.path(), "b.md", "target")?;
    let corpus = load(temp_dir.path())?;

    assert_eq!(corpus.backlinks("b.md"), ids(&["a.md"]));
    let lines: Vec<usize> = corpus.backlink_edges("b.md").iter().map(|e| e.line).collect();
    assert_eq!(lines, vec![1, 1, 2]);
    Ok(())
}

#[test]
fn test_self_link_only_counts_for_itself() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    create_test_file(temp_dir.path(), "loop.md", "I mention [[loop]].")?;
    create_test_file(temp_dir.path(), "other.md", "No links.")?;
    let corpus = load(temp_dir.path())?;

    assert_eq!(corpus.backlinks("loop.md"), ids(&["loop.md"]));
    assert!(corpus.backlinks("other.md").is_empty());
    Ok(())
}

#[test]
fn test_lookup_links_reports_unresolved_targets() -> Result<()> {
    let temp_dir = setup_vault()?;
    let summary = lookup_links(&Config::new(temp_dir.path().to_path_buf()), "index")?;

    assert_eq!(summary.note, NoteId::new("index.md"));
    let outbound: Vec<(&str, Option<&str>)> = summary
        .outbound
        .iter()
        .map(|link| (link.target.as_str(), link.resolved.as_ref().map(NoteId::as_str)))
        .collect();
    assert_eq!(
        outbound,
        vec![
            ("Graph Theory", Some("math/graphs.md")),
            ("math/trees.md", Some("math/trees.md")),
            ("Nowhere", None),
        ]
    );
    assert!(summary.inbound.is_empty());
    Ok(())
}

#[test]
fn test_every_edge_joins_existing_notes() -> Result<()> {
    let temp_dir = setup_vault()?;
    let corpus = load(temp_dir.path())?;

    assert_eq!(corpus.graph().edges().len(), 5);
    for edge in corpus.graph().edges() {
        assert!(corpus.note(edge.source.as_str()).is_some());
        assert!(corpus.note(edge.target.as_str()).is_some());
    }
    let unresolved: Vec<&str> = corpus
        .graph()
        .unresolved()
        .iter()
        .map(|link| link.target.as_str())
        .collect();
    assert_eq!(unresolved, vec!["Nowhere"]);
    Ok(())
}

#[test]
fn test_uppercase_extension_resolves() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    create_test_file(temp_dir.path(), "Note.MD", "hello")?;
    create_test_file(temp_dir.path(), "a.md", "[[Note]] and [again](Note.md)")?;
    let corpus = load(temp_dir.path())?;

    let note = corpus
        .note("Note.MD")
        .ok_or_else(|| anyhow::anyhow!("Note.MD missing"))?;
    assert_eq!(note.title, "Note");
    assert!(corpus.graph().unresolved().is_empty());
    assert_eq!(corpus.backlinks("Note.MD"), vec![NoteId::new("a.md")]);
    assert_eq!(corpus.backlink_edges("Note").len(), 2);
    Ok(())
}
