// tests/integration_tests/frontmatter_test.rs
use super::common::{create_test_file, load, setup_vault};
use anyhow::Result;
use std::collections::BTreeMap;
use zks::core::parser::parse_note;
use zks::{Diagnostic, Value};

#[test]
fn test_frontmatter_parsing() -> Result<()> {
    let content = "\
---
title: Graph Theory
rating: 4.5
draft: true
tags: [math, graphs]
---
# Content
Some content here.";

    let root = std::path::Path::new("/vault");
    let parsed = parse_note(root, &root.join("graphs.md"), content.as_bytes())?;
    let metadata = &parsed.note.metadata;
    assert_eq!(metadata.get("title"), Some(&Value::String("Graph Theory".into())));
    assert_eq!(metadata.get("rating"), Some(&Value::Number(4.5)));
    assert_eq!(metadata.get("draft"), Some(&Value::Boolean(true)));
    assert_eq!(
        metadata.get("tags"),
        Some(&Value::List(vec![
            Value::String("math".into()),
            Value::String("graphs".into()),
        ]))
    );
    assert!(parsed.note.body.starts_with("# Content"));

    let no_frontmatter = parse_note(root, &root.join("plain.md"), b"# Just content")?;
    assert!(no_frontmatter.note.metadata.is_empty());
    assert_eq!(no_frontmatter.note.title, "plain");
    Ok(())
}

#[test]
fn test_metadata_survives_into_results() -> Result<()> {
    let temp_dir = setup_vault()?;
    let corpus = load(temp_dir.path())?;

    let results = corpus.query(&["status?"])?;
    assert_eq!(results.len(), corpus.len());
    for note in corpus.notes() {
        let result = results
            .iter()
            .find(|r| r.document.id == note.id)
            .ok_or_else(|| anyhow::anyhow!("{} missing", note.id))?;
        for (key, value) in &note.metadata {
            assert_eq!(result.document.metadata.get(key), Some(value), "{key}");
        }
        assert!(result.document.metadata.contains_key("title"));
    }
    Ok(())
}

#[test]
fn test_nested_mapping_is_dropped_with_diagnostic() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    create_test_file(
        temp_dir.path(),
        "nested.md",
        "---\nauthor:\n  name: Ada\nstatus: draft\n---\nbody",
    )?;
    let corpus = load(temp_dir.path())?;

    let note = corpus
        .note("nested.md")
        .ok_or_else(|| anyhow::anyhow!("note missing"))?;
    let expected: BTreeMap<String, Value> =
        [("status".to_owned(), Value::String("draft".into()))].into();
    assert_eq!(note.metadata, expected);
    assert!(corpus.diagnostics().contains(&Diagnostic::DroppedAttribute {
        note: note.id.clone(),
        key: "author".to_owned(),
    }));
    Ok(())
}
