// tests/integration_tests/search_test.rs
use super::common::{create_test_file, load, setup_hello_corpus, setup_vault};
use anyhow::Result;
use zks::{Config, QueryError, SearchError, search};

fn ranked_ids(results: &[zks::QueryResult]) -> Vec<&str> {
    results.iter().map(|r| r.document.id.as_str()).collect()
}

#[test]
fn test_linked_notes_outrank_isolated_twin() -> Result<()> {
    let temp_dir = setup_hello_corpus()?;
    let corpus = load(temp_dir.path())?;

    let importance = corpus.importance();
    assert!(importance.get("A.md") > importance.get("C.md"));
    assert!(importance.get("B.md") > importance.get("C.md"));

    let results = corpus.search("hello", &[] as &[&str])?;
    assert_eq!(results.len(), 3);
    let ids = ranked_ids(&results);
    assert_eq!(ids[2], "C.md", "the unlinked note ranks last: {ids:?}");

    assert!(results[1].combined_score > results[2].combined_score);
    Ok(())
}

#[test]
fn test_unmatched_notes_are_excluded() -> Result<()> {
    let temp_dir = setup_vault()?;
    let corpus = load(temp_dir.path())?;

    let results = corpus.search("cycles", &[] as &[&str])?;
    assert_eq!(ranked_ids(&results), vec!["math/trees.md"]);
    assert!(corpus.search("nonexistentterm", &[] as &[&str])?.is_empty());
    Ok(())
}

#[test]
fn test_results_are_sorted_and_reproducible() -> Result<()> {
    let temp_dir = setup_vault()?;
    let corpus = load(temp_dir.path())?;

    let first = corpus.search("graph", &[] as &[&str])?;
    let second = corpus.search("graph", &[] as &[&str])?;
    assert_eq!(first, second);
    assert!(!first.is_empty());

    for pair in first.windows(2) {
        let ordering = pair[1].combined_score.total_cmp(&pair[0].combined_score);
        assert!(ordering.is_le(), "results out of order");
        if ordering.is_eq() {
            assert!(pair[0].document.id < pair[1].document.id);
        }
    }
    for result in &first {
        assert!(result.combined_score.is_finite() && result.combined_score >= 0.0);
        assert!(result.combined_score <= 1.0 + 1e-12);
    }
    Ok(())
}

#[test]
fn test_attribute_only_query_ranks_by_importance() -> Result<()> {
    let temp_dir = setup_vault()?;
    let corpus = load(temp_dir.path())?;

    let results = corpus.search("", &["status = \"draft\""])?;
    assert_eq!(results.len(), 2);
    // graphs.md is linked by three notes, trees.md by two.
    assert_eq!(ranked_ids(&results), vec!["math/graphs.md", "math/trees.md"]);
    for result in &results {
        assert!(result.text_score.abs() < f64::EPSILON);
        let expected = result.importance_score / corpus.importance().max();
        assert!((result.combined_score - expected).abs() < 1e-12);
    }
    Ok(())
}

#[test]
fn test_filters_restrict_before_scoring() -> Result<()> {
    let temp_dir = setup_vault()?;
    let corpus = load(temp_dir.path())?;

    let results = corpus.search("graph", &["rating>=4"])?;
    assert_eq!(ranked_ids(&results), vec!["math/graphs.md"]);

    let results = corpus.search("graph", &["tags=math", "not rating=5"])?;
    assert_eq!(ranked_ids(&results), vec!["math/trees.md"]);

    let results = corpus.query(&["created>=2024-01-01"])?;
    assert_eq!(ranked_ids(&results), vec!["journal/2024-03-01.md"]);
    Ok(())
}

#[test]
fn test_phrase_search() -> Result<()> {
    let temp_dir = setup_vault()?;
    let corpus = load(temp_dir.path())?;

    let results = corpus.search("\"connected graph\"", &[] as &[&str])?;
    assert_eq!(ranked_ids(&results), vec!["math/trees.md"]);
    assert!(corpus.search("\"graph connected\"", &[] as &[&str])?.is_empty());
    Ok(())
}

#[test]
fn test_title_is_always_in_result_metadata() -> Result<()> {
    let temp_dir = setup_vault()?;
    let corpus = load(temp_dir.path())?;

    let results = corpus.search("tree", &[] as &[&str])?;
    let trees = results
        .iter()
        .find(|r| r.document.id.as_str() == "math/trees.md")
        .ok_or_else(|| anyhow::anyhow!("trees.md missing from results"))?;
    assert_eq!(trees.document.title(), "trees");

    let json = serde_json::to_value(trees)?;
    assert_eq!(json["document"]["metadata"]["title"]["String"], "trees");
    assert_eq!(json["document"]["metadata"]["rating"]["Number"], 3.0);
    assert_eq!(json["document"]["metadata"]["tags"]["List"][0]["String"], "math");
    assert!(json["document"]["path"].as_str().is_some_and(|p| p.ends_with("trees.md")));
    Ok(())
}

#[test]
fn test_invalid_filter_is_an_error_not_empty() -> Result<()> {
    let temp_dir = setup_vault()?;
    let config = Config::new(temp_dir.path().to_path_buf());

    let err = search(&config, "graph", &["rating>"]).unwrap_err();
    assert!(matches!(err, SearchError::Query(QueryError::MissingValue(_))));

    let missing = Config::new(temp_dir.path().join("missing"));
    let err = search(&missing, "graph", &[] as &[&str]).unwrap_err();
    assert!(matches!(err, SearchError::Corpus(_)));
    Ok(())
}

#[test]
fn test_text_weight_zero_ranks_by_importance() -> Result<()> {
    let temp_dir = setup_vault()?;
    let mut config = Config::new(temp_dir.path().to_path_buf());
    config.search.text_weight = 0.0;

    let results = search(&config, "graph", &[] as &[&str])?;
    let corpus = load(temp_dir.path())?;
    for pair in results.windows(2) {
        let first = corpus.importance().get(pair[0].document.id.as_str());
        let second = corpus.importance().get(pair[1].document.id.as_str());
        assert!(first >= second);
    }
    Ok(())
}

#[test]
fn test_link_destinations_and_code_are_not_searchable() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    create_test_file(
        temp_dir.path(),
        "docs.md",
        "Read [docs](https://example.com/rust-lang).\n\n```\nlet hidden = 1;\n```\n",
    )?;
    create_test_file(temp_dir.path(), "other.md", "Nothing to see")?;
    let corpus = load(temp_dir.path())?;

    assert!(corpus.search("https", &[] as &[&str])?.is_empty());
    assert!(corpus.search("example", &[] as &[&str])?.is_empty());
    assert!(corpus.search("hidden", &[] as &[&str])?.is_empty());
    assert_eq!(corpus.search("docs", &[] as &[&str])?.len(), 1);
    Ok(())
}

#[test]
fn test_punctuation_only_text_matches_nothing() -> Result<()> {
    let temp_dir = setup_hello_corpus()?;
    let corpus = load(temp_dir.path())?;

    assert!(corpus.search("?!", &[] as &[&str])?.is_empty());
    assert!(corpus.search("\"\"", &[] as &[&str])?.is_empty());
    assert_eq!(corpus.search("  ", &[] as &[&str])?.len(), 3);
    Ok(())
}
