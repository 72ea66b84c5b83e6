// src/core/resolver.rs
use crate::models::{
    LinkEdge, LinkKind, Note, NoteId, RawLink, UnresolvedLink, strip_markdown_extension,
};
use std::collections::{BTreeMap, BTreeSet};

/// Maps link tokens to notes.
///
/// Tiers are tried in order and the first with a match wins:
/// 1. path, relative to the linking note's directory and then to the corpus root; exact
///    except for the case of the `.md` extension
/// 2. title, case-insensitive
/// 3. an entry of the `aliases` attribute, case-insensitive
/// 4. file stem, case-insensitive
///
/// Within a tier the smallest note id wins.
#[derive(Debug, Default)]
pub struct Resolver {
    ids: BTreeSet<NoteId>,
    /// Ids keyed with a lowercase `.md` extension.
    by_path: BTreeMap<String, NoteId>,
    by_title: BTreeMap<String, NoteId>,
    by_alias: BTreeMap<String, NoteId>,
    by_stem: BTreeMap<String, NoteId>,
}

impl Resolver {
    #[must_use]
    pub fn new(notes: &BTreeMap<NoteId, Note>) -> Self {
        let mut resolver = Self::default();
        // BTreeMap iteration is in id order, so the first insertion per key is the smallest id.
        for (id, note) in notes {
            resolver.ids.insert(id.clone());
            resolver
                .by_path
                .entry(fold_extension(id.as_str()))
                .or_insert_with(|| id.clone());
            resolver
                .by_title
                .entry(note.title.to_lowercase())
                .or_insert_with(|| id.clone());
            for alias in note.aliases() {
                resolver
                    .by_alias
                    .entry(alias.to_lowercase())
                    .or_insert_with(|| id.clone());
            }
            resolver
                .by_stem
                .entry(id.stem().to_lowercase())
                .or_insert_with(|| id.clone());
        }
        resolver
    }

    /// Resolves a link written in the note `source`.
    #[must_use]
    pub fn resolve(&self, source: &NoteId, link: &RawLink) -> Option<NoteId> {
        let relative_base = match link.kind {
            LinkKind::Markdown | LinkKind::Wiki => source.parent(),
        };
        self.resolve_from(relative_base, &link.target)
    }

    /// Resolves a token the way a link at the corpus root would be resolved. Lets callers
    /// name a note by path, title, alias or file name.
    #[must_use]
    pub fn resolve_token(&self, token: &str) -> Option<NoteId> {
        self.resolve_from("", token.trim())
    }

    fn resolve_from(&self, base_dir: &str, target: &str) -> Option<NoteId> {
        self.by_path(base_dir, target)
            .or_else(|| self.by_path("", target))
            .or_else(|| self.by_title.get(&target.to_lowercase()).cloned())
            .or_else(|| self.by_alias.get(&target.to_lowercase()).cloned())
            .or_else(|| {
                let lower = target.to_lowercase();
                let stem = lower.strip_suffix(".md").unwrap_or(&lower);
                self.by_stem.get(stem).cloned()
            })
    }

    fn by_path(&self, base_dir: &str, target: &str) -> Option<NoteId> {
        let candidate = normalize_path(base_dir, target)?;
        self.ids
            .get(candidate.as_str())
            .or_else(|| self.by_path.get(&fold_extension(&candidate)))
            .cloned()
    }
}

fn fold_extension(path: &str) -> String {
    format!("{}.md", strip_markdown_extension(path))
}

/// Joins `target` onto `base_dir`, folding `.` and `..` and appending `.md` when missing.
/// A leading `/` makes the target root-relative. Paths escaping the root have no
/// normalized form.
fn normalize_path(base_dir: &str, target: &str) -> Option<String> {
    let (base_dir, target) = match target.strip_prefix('/') {
        Some(rooted) => ("", rooted),
        None => (base_dir, target),
    };

    let mut parts: Vec<&str> = Vec::new();
    for segment in base_dir.split('/').chain(target.split(['/', '\\'])) {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    if parts.is_empty() {
        return None;
    }

    let mut path = parts.join("/");
    if !path.to_lowercase().ends_with(".md") {
        path.push_str(".md");
    }
    Some(path)
}

/// Resolved and dangling links of a corpus, with a reverse index for backlinks.
#[derive(Debug, Default)]
pub struct LinkGraph {
    /// One edge per link occurrence, ordered by source id and then by position.
    edges: Vec<LinkEdge>,
    unresolved: Vec<UnresolvedLink>,
    /// Per note, the resolution of each of its outbound links, in link order.
    resolutions: BTreeMap<NoteId, Vec<Option<NoteId>>>,
    /// Target → indices into `edges`.
    inbound: BTreeMap<NoteId, Vec<usize>>,
}

impl LinkGraph {
    /// Resolves every outbound link of every note.
    #[must_use]
    pub fn build(notes: &BTreeMap<NoteId, Note>, resolver: &Resolver) -> Self {
        let mut graph = Self::default();

        for (id, note) in notes {
            let mut resolved = Vec::with_capacity(note.outbound_links.len());
            for link in &note.outbound_links {
                let target = resolver.resolve(id, link);
                match &target {
                    Some(target) => {
                        graph
                            .inbound
                            .entry(target.clone())
                            .or_default()
                            .push(graph.edges.len());
                        graph.edges.push(LinkEdge {
                            source: id.clone(),
                            target: target.clone(),
                            line: link.line,
                        });
                    }
                    None => {
                        tracing::debug!(source = %id, target = %link.target, line = link.line, "unresolved link");
                        graph.unresolved.push(UnresolvedLink {
                            source: id.clone(),
                            target: link.target.clone(),
                            line: link.line,
                        });
                    }
                }
                resolved.push(target);
            }
            graph.resolutions.insert(id.clone(), resolved);
        }

        graph
    }

    #[inline]
    #[must_use]
    pub fn edges(&self) -> &[LinkEdge] {
        &self.edges
    }

    #[inline]
    #[must_use]
    pub fn unresolved(&self) -> &[UnresolvedLink] {
        &self.unresolved
    }

    /// Resolutions of `source`'s outbound links, parallel to `Note::outbound_links`.
    #[must_use]
    pub fn resolutions(&self, source: &str) -> &[Option<NoteId>] {
        self.resolutions.get(source).map_or(&[], Vec::as_slice)
    }

    /// Every link occurrence pointing at `target`.
    #[must_use]
    pub fn backlink_edges(&self, target: &str) -> Vec<&LinkEdge> {
        self.inbound
            .get(target)
            .map(|indices| indices.iter().filter_map(|&i| self.edges.get(i)).collect())
            .unwrap_or_default()
    }

    /// Distinct notes linking to `target`, in id order. Includes `target` itself only when
    /// it links to itself.
    #[must_use]
    pub fn backlinks(&self, target: &str) -> Vec<NoteId> {
        let mut sources: Vec<NoteId> = self
            .backlink_edges(target)
            .into_iter()
            .map(|edge| edge.source.clone())
            .collect();
        sources.dedup();
        sources
    }

    /// Distinct `(source, target)` pairs: parallel edges collapse to one arc.
    #[must_use]
    pub fn arcs(&self) -> BTreeSet<(&NoteId, &NoteId)> {
        self.edges
            .iter()
            .map(|edge| (&edge.source, &edge.target))
            .collect()
    }
}
