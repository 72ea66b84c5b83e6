// src/core/scorer.rs
use crate::config::{ScorerConfig, ScoringMethod};
use crate::models::NoteId;
use std::collections::{BTreeMap, BTreeSet};

/// Per-note centrality from one full computation over the link graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Importance {
    pub scores: BTreeMap<NoteId, f64>,
    pub iterations: usize,
    pub converged: bool,
    /// Largest score change of the last iteration.
    pub delta: f64,
}

impl Importance {
    /// Score of `id`, zero for unknown notes.
    #[must_use]
    pub fn get(&self, id: &str) -> f64 {
        self.scores.get(id).copied().unwrap_or(0.0)
    }

    /// Highest score of the corpus, zero when it is empty.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.scores.values().copied().fold(0.0, f64::max)
    }
}

/// Adjacency by position in the sorted id list.
struct Graph {
    incoming: Vec<Vec<usize>>,
    out_degree: Vec<usize>,
}

impl Graph {
    fn new(ids: &[&NoteId], arcs: &BTreeSet<(&NoteId, &NoteId)>) -> Self {
        let n = ids.len();
        let mut graph = Self {
            incoming: vec![Vec::new(); n],
            out_degree: vec![0; n],
        };
        for (source, target) in arcs {
            if source == target {
                continue;
            }
            let (Ok(s), Ok(t)) = (ids.binary_search(source), ids.binary_search(target)) else {
                continue;
            };
            graph.incoming[t].push(s);
            graph.out_degree[s] += 1;
        }
        graph
    }
}

/// Computes importance for `ids` over the collapsed arc set.
///
/// Scores depend only on the graph structure: nodes are processed in id order whatever
/// order the caller discovered them in. Self-loops are ignored. Both methods start from
/// the uniform vector `1/N` and stop once no score moves by more than the tolerance, or
/// at the iteration cap. A non-finite iterate stops the loop and falls back to the
/// uniform vector.
#[must_use]
pub fn compute<'a>(
    ids: impl IntoIterator<Item = &'a NoteId>,
    arcs: &BTreeSet<(&NoteId, &NoteId)>,
    config: &ScorerConfig,
) -> Importance {
    let mut ids: Vec<&NoteId> = ids.into_iter().collect();
    ids.sort();
    ids.dedup();

    let n = ids.len();
    if n == 0 {
        return Importance {
            converged: true,
            ..Importance::default()
        };
    }

    let graph = Graph::new(&ids, arcs);
    let uniform = 1.0 / n as f64;
    let mut scores = vec![uniform; n];
    let mut iterations = 0;
    let mut delta = f64::INFINITY;
    let mut converged = false;

    while iterations < config.max_iterations {
        let next = match config.method {
            ScoringMethod::PageRank => pagerank_step(&graph, &scores, config.damping, uniform),
            ScoringMethod::Katz => katz_step(&graph, &scores, config.alpha, uniform),
        };
        iterations += 1;

        if next.iter().any(|score| !score.is_finite()) {
            tracing::warn!(iterations, "importance diverged, using uniform scores");
            scores = vec![uniform; n];
            delta = f64::INFINITY;
            break;
        }

        delta = scores
            .iter()
            .zip(&next)
            .map(|(old, new)| (old - new).abs())
            .fold(0.0, f64::max);
        scores = next;
        if delta < config.tolerance {
            converged = true;
            break;
        }
    }

    if !converged {
        tracing::warn!(iterations, delta, "importance did not converge");
    }

    if config.method == ScoringMethod::Katz {
        normalize(&mut scores);
    }

    Importance {
        scores: ids.into_iter().cloned().zip(scores).collect(),
        iterations,
        converged,
        delta,
    }
}

/// `(1-d)/N + d*D/N + d * sum(r_j / outdeg_j)` where `D` is the mass held by dangling notes.
fn pagerank_step(graph: &Graph, scores: &[f64], damping: f64, uniform: f64) -> Vec<f64> {
    let dangling: f64 = scores
        .iter()
        .zip(&graph.out_degree)
        .filter(|&(_, &degree)| degree == 0)
        .map(|(score, _)| score)
        .sum();
    let base = (1.0 - damping).mul_add(uniform, damping * dangling * uniform);

    graph
        .incoming
        .iter()
        .map(|sources| {
            let inflow: f64 = sources
                .iter()
                .map(|&j| scores[j] / graph.out_degree[j] as f64)
                .sum();
            damping.mul_add(inflow, base)
        })
        .collect()
}

/// `1/N + alpha * sum(x_j)`
fn katz_step(graph: &Graph, scores: &[f64], alpha: f64, uniform: f64) -> Vec<f64> {
    graph
        .incoming
        .iter()
        .map(|sources| {
            let inflow: f64 = sources.iter().map(|&j| scores[j]).sum();
            alpha.mul_add(inflow, uniform)
        })
        .collect()
}

fn normalize(scores: &mut [f64]) {
    let total: f64 = scores.iter().sum();
    if total > 0.0 && total.is_finite() {
        for score in scores.iter_mut() {
            *score /= total;
        }
    }
}
