// tests/integration_tests/scoring_test.rs
use super::common::{create_test_file, load, setup_hello_corpus, setup_vault};
use anyhow::Result;
use zks::{Config, Corpus, Diagnostic};

fn close(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-6
}

#[test]
fn test_pagerank_values() -> Result<()> {
    let temp_dir = setup_hello_corpus()?;
    let corpus = load(temp_dir.path())?;
    let importance = corpus.importance();

    // C is dangling: its rank is spread evenly, so A and B each hold 20/43 and C 3/43.
    assert!(importance.converged);
    assert!(close(importance.get("A.md"), 20.0 / 43.0));
    assert!(close(importance.get("B.md"), 20.0 / 43.0));
    assert!(close(importance.get("C.md"), 3.0 / 43.0));
    let total: f64 = importance.scores.values().sum();
    assert!(close(total, 1.0));
    Ok(())
}

#[test]
fn test_katz_from_settings_file() -> Result<()> {
    let temp_dir = setup_hello_corpus()?;
    create_test_file(temp_dir.path(), ".zks.toml", "[scorer]\nmethod = \"katz\"\n")?;

    let corpus = Corpus::load(&Config::load(temp_dir.path())?)?;
    let importance = corpus.importance();
    assert!(close(importance.get("A.md"), 10.0 / 29.0));
    assert!(close(importance.get("B.md"), 10.0 / 29.0));
    assert!(close(importance.get("C.md"), 9.0 / 29.0));
    Ok(())
}

#[test]
fn test_scores_are_reproducible() -> Result<()> {
    let temp_dir = setup_vault()?;
    let first = load(temp_dir.path())?;
    let second = load(temp_dir.path())?;

    assert_eq!(first.importance().scores, second.importance().scores);
    assert_eq!(
        serde_json::to_string(&first.search("graph", &[] as &[&str])?)?,
        serde_json::to_string(&second.search("graph", &[] as &[&str])?)?
    );
    Ok(())
}

#[test]
fn test_linked_notes_gain_importance() -> Result<()> {
    let temp_dir = setup_vault()?;
    let corpus = load(temp_dir.path())?;
    let importance = corpus.importance();

    // Graph Theory is linked from three notes, the journal entry from none.
    assert!(importance.get("math/graphs.md") > importance.get("index.md"));
    assert!(importance.get("math/graphs.md") > importance.get("journal/2024-03-01.md"));
    assert!(importance.get("math/trees.md") > importance.get("journal/2024-03-01.md"));
    assert!(importance.scores.values().all(|score| *score > 0.0));
    Ok(())
}

#[test]
fn test_iteration_cap_is_reported() -> Result<()> {
    let temp_dir = setup_vault()?;
    create_test_file(temp_dir.path(), ".zks.toml", "[scorer]\nmax_iterations = 1\n")?;

    let corpus = Corpus::load(&Config::load(temp_dir.path())?)?;
    assert!(!corpus.importance().converged);
    assert!(
        corpus
            .diagnostics()
            .iter()
            .any(|d| matches!(d, Diagnostic::NonConvergence { iterations: 1, .. }))
    );
    // Scores are still usable for ranking.
    assert_eq!(corpus.search("graph", &[] as &[&str])?.len(), 3);
    Ok(())
}
