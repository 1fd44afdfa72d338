//! Semantic segmentation of a cleaned document
//!
//! Splits visible text into the primary article, the remaining page text and
//! the declared meta description. Article subtrees are consumed exactly once,
//! and a sentence repeated outside the article is reported in the article
//! only, so the two text buckets never share a sentence.

use crate::classify::{CleanedDocument, Element, Node};
use crate::types::{Heading, SegmentedContent};
use std::collections::HashSet;

/// Tags that start a new text block
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "body", "br", "caption", "dd", "details", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "form", "h1", "h2", "h3", "h4", "h5", "h6", "hr",
    "legend", "li", "main", "ol", "p", "pre", "section", "summary", "table", "td", "th", "tr",
    "ul",
];

/// Meta tags consulted for the page summary, in priority order
const DESCRIPTION_KEYS: &[(&str, &str)] = &[
    ("name", "description"),
    ("property", "og:description"),
    ("name", "twitter:description"),
];

/// Segment a cleaned document into article, main text and meta description
pub fn segment(doc: &CleanedDocument) -> SegmentedContent {
    let mut article = BlockWriter::default();
    let mut main = BlockWriter::default();

    for node in &doc.root().children {
        walk(node, &mut article, &mut main, false);
    }

    let article_body = article.finish().join(" ");
    let main_text = drop_shared_sentences(&main.finish().join(" "), &article_body);

    let content = SegmentedContent {
        article_body,
        main_text,
        meta_description: meta_description(doc),
        title: doc
            .find("title")
            .map(|t| collapse_whitespace(&inner_text(t)))
            .unwrap_or_default(),
        headings: headings(doc),
    };

    tracing::debug!(
        article_chars = content.article_body.chars().count(),
        main_chars = content.main_text.chars().count(),
        headings = content.headings.len(),
        "Segmented document"
    );

    content
}

fn walk(node: &Node, article: &mut BlockWriter, main: &mut BlockWriter, in_article: bool) {
    let el = match node {
        Node::Text(text) => {
            if in_article {
                article.push_text(text);
            } else {
                main.push_text(text);
            }
            return;
        }
        Node::Comment(_) => return,
        Node::Element(el) => el,
    };

    // Head content (title, meta) is metadata, not visible text
    if el.tag == "head" {
        return;
    }

    // Outermost primary container claims its whole subtree
    let enters_article = !in_article && is_primary_container(el);
    let in_article = in_article || enters_article;
    let block = BLOCK_TAGS.contains(&el.tag.as_str());

    let writer = if in_article { &mut *article } else { &mut *main };
    if block || enters_article {
        writer.break_block();
    }

    for child in &el.children {
        walk(child, article, main, in_article);
    }

    let writer = if in_article { article } else { main };
    if block || enters_article {
        writer.break_block();
    }
}

fn is_primary_container(el: &Element) -> bool {
    matches!(el.tag.as_str(), "article" | "main")
        || el
            .attr("role")
            .map(|r| {
                let r = r.trim();
                r.eq_ignore_ascii_case("main") || r.eq_ignore_ascii_case("article")
            })
            .unwrap_or(false)
}

fn meta_description(doc: &CleanedDocument) -> String {
    let metas: Vec<&Element> = doc
        .root()
        .descendants()
        .filter(|el| el.tag == "meta")
        .collect();

    for (key, wanted) in DESCRIPTION_KEYS {
        let found = metas.iter().find_map(|m| {
            let matches = m
                .attr(key)
                .map(|v| v.trim().eq_ignore_ascii_case(wanted))
                .unwrap_or(false);
            if matches {
                m.attr("content").map(collapse_whitespace)
            } else {
                None
            }
        });
        if let Some(desc) = found.filter(|d| !d.is_empty()) {
            return desc;
        }
    }

    String::new()
}

fn headings(doc: &CleanedDocument) -> Vec<Heading> {
    let Some(body) = doc.find("body") else {
        return Vec::new();
    };

    body.descendants()
        .filter_map(|el| {
            let level = match el.tag.as_str() {
                "h1" => 1,
                "h2" => 2,
                "h3" => 3,
                _ => return None,
            };
            let text = collapse_whitespace(&inner_text(el));
            (!text.is_empty()).then_some(Heading { level, text })
        })
        .collect()
}

/// Concatenated raw text of an element's subtree
pub(crate) fn inner_text(el: &Element) -> String {
    let mut out = String::new();
    let mut stack: Vec<&Node> = el.children.iter().rev().collect();
    while let Some(node) = stack.pop() {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(child) => stack.extend(child.children.iter().rev()),
            Node::Comment(_) => {}
        }
    }
    out
}

/// Sentence pieces of `text`: each ends at `.`, `!` or `?` (or at the end of
/// the text) and keeps its leading whitespace.
fn sentence_pieces(text: &str) -> impl Iterator<Item = &str> {
    text.split_inclusive(['.', '!', '?'])
}

/// Remove from `main` every sentence that also occurs in `article`.
///
/// Surviving pieces are concatenated untouched, so text without a repeated
/// sentence comes back unchanged.
fn drop_shared_sentences(main: &str, article: &str) -> String {
    let shared: HashSet<&str> = sentence_pieces(article)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if shared.is_empty() {
        return main.to_string();
    }

    let kept: String = sentence_pieces(main)
        .filter(|piece| !shared.contains(piece.trim()))
        .collect();
    collapse_whitespace(&kept)
}

/// Collapse whitespace runs to a single space and trim
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Accumulates inline text and emits one trimmed, collapsed block per
/// block-level boundary.
#[derive(Debug, Default)]
struct BlockWriter {
    current: String,
    blocks: Vec<String>,
}

impl BlockWriter {
    fn push_text(&mut self, text: &str) {
        self.current.push_str(text);
    }

    fn break_block(&mut self) {
        let block = collapse_whitespace(&self.current);
        self.current.clear();
        if !block.is_empty() {
            self.blocks.push(block);
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.break_block();
        self.blocks
    }
}
