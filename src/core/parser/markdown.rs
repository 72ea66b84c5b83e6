// src/core/parser/markdown.rs
use crate::models::{LinkKind, RawLink};
use pulldown_cmark::{Event, LinkType, Parser, Tag, TagEnd, TextMergeWithOffset};
use std::borrow::Cow;

/// What the body of a note contributes beyond its raw text.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Body {
    /// Link tokens in reading order, duplicates kept.
    pub links: Vec<RawLink>,
    /// Prose as a reader sees it: no markup, link destinations, code blocks or images.
    pub text: String,
}

/// Reads a Markdown body.
///
/// Code blocks (fenced or indented) and inline code never yield links. `first_line` is the
/// file line the body starts on, so reported lines point into the file rather than the body.
#[must_use]
pub fn read_body(body: &str, first_line: usize) -> Body {
    let line_starts: Vec<usize> = std::iter::once(0)
        .chain(body.match_indices('\n').map(|(i, _)| i + 1))
        .collect();
    let line_at = |offset: usize| first_line + line_starts.partition_point(|&s| s <= offset) - 1;

    let mut read = Body::default();
    // Nesting depth of code blocks and images, whose content is skipped.
    let mut hidden = 0usize;

    for (event, range) in TextMergeWithOffset::new(Parser::new(body).into_offset_iter()) {
        match event {
            Event::Start(Tag::CodeBlock(_) | Tag::Image { .. }) => hidden += 1,
            Event::End(TagEnd::CodeBlock | TagEnd::Image) => hidden = hidden.saturating_sub(1),
            _ if hidden > 0 => {}
            Event::Start(Tag::Link {
                link_type: LinkType::Inline,
                dest_url,
                ..
            }) => {
                if let Some(target) = markdown_target(&dest_url) {
                    read.links.push(RawLink {
                        target,
                        kind: LinkKind::Markdown,
                        line: line_at(range.start),
                    });
                }
            }
            Event::Text(text) => {
                let line = line_at(range.start);
                read.links.extend(wiki_targets(&text).into_iter().map(|target| RawLink {
                    target,
                    kind: LinkKind::Wiki,
                    line,
                }));
                push_words(&mut read.text, &text);
            }
            Event::Code(code) => push_words(&mut read.text, &code),
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => {
                push_break(&mut read.text);
            }
            _ => {}
        }
    }

    read.text.truncate(read.text.trim_end().len());
    read
}

fn push_words(out: &mut String, words: &str) {
    if !out.is_empty() && !out.ends_with(char::is_whitespace) {
        out.push(' ');
    }
    out.push_str(words);
}

fn push_break(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// `[[target]]` tokens of a run of text. The inner part may not contain brackets.
fn wiki_targets(text: &str) -> Vec<String> {
    let mut targets = Vec::new();
    let mut from = 0;
    while let Some(found) = text[from..].find("[[") {
        let open = from + found;
        let inner_start = open + 2;
        let Some(len) = text[inner_start..].find("]]") else {
            break;
        };
        let inner = &text[inner_start..inner_start + len];
        if inner.is_empty() || inner.contains(['[', ']']) {
            from = open + 1;
            continue;
        }
        targets.extend(wiki_target(inner));
        from = inner_start + len + 2;
    }
    targets
}

/// `target#heading|label` → `target`. Links to a heading of the same note have no target.
fn wiki_target(inner: &str) -> Option<String> {
    let target = inner.split('|').next().unwrap_or(inner);
    let target = target.split('#').next().unwrap_or(target).trim();
    (!target.is_empty()).then(|| target.to_owned())
}

/// Keeps local destinations that can name a note: no URL scheme, no bare `#anchor`, and
/// either no extension or `.md`. The fragment is dropped and percent-encoding decoded.
fn markdown_target(dest: &str) -> Option<String> {
    if dest.starts_with('#') || has_scheme(dest) {
        return None;
    }

    let path = dest.split(['#', '?']).next().unwrap_or(dest).trim();
    if path.is_empty() {
        return None;
    }
    let decoded = urlencoding::decode(path).map_or_else(|_| path.to_owned(), Cow::into_owned);

    let file_name = decoded.rsplit('/').next().unwrap_or(&decoded);
    let names_note = match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.eq_ignore_ascii_case("md"),
        None => true,
    };
    names_note.then_some(decoded)
}

/// `scheme:` prefix as in RFC 3986: a letter, then letters, digits, `+`, `.` or `-`.
fn has_scheme(dest: &str) -> bool {
    dest.split_once(':').is_some_and(|(scheme, _)| {
        let mut chars = scheme.chars();
        chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
    })
}
