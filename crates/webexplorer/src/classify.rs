//! HTML classifier: tolerant parse plus removal of non-informational elements
//!
//! Parsing goes through scraper (html5ever), which recovers from unclosed
//! tags and stray markup the same way browsers do. The parsed arena is then
//! copied into an owned [`Node`] tree, skipping every element that never
//! carries readable content. Nothing downstream touches scraper types.

use scraper::Html;

/// Elements dropped together with their whole subtree.
const REMOVE_TAGS: &[&str] = &[
    // scripts and styling
    "script", "style", "noscript", "template", "link",
    // form controls
    "button", "input", "select", "option", "optgroup", "textarea", "datalist",
    // embedded and vector content
    "svg", "math", "canvas", "iframe", "frame", "frameset", "object", "embed", "applet", "param",
    // navigation chrome
    "nav", "header", "footer", "aside", "dialog",
];

/// A node of the cleaned document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Element with lowercase tag name, attributes and children
    Element(Element),
    /// Raw (entity-decoded) text
    Text(String),
    /// HTML comment; kept for structure, never rendered
    Comment(String),
}

/// An element in the cleaned tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Attribute lookup, case-insensitive on the name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Depth-first iterator over descendant elements, in document order
    pub fn descendants(&self) -> impl Iterator<Item = &Element> {
        let mut stack: Vec<&Element> = self.child_elements().rev().collect();
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            stack.extend(next.child_elements().rev());
            Some(next)
        })
    }

    fn child_elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.children.iter().filter_map(|c| match c {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }
}

/// HTML with noise removed, owned by a single extraction
#[derive(Debug, Clone)]
pub struct CleanedDocument {
    root: Element,
    parse_errors: usize,
}

impl CleanedDocument {
    /// Synthetic root holding the top-level nodes (normally a single `<html>`)
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// True when the parser had to recover from malformed markup
    pub fn degraded(&self) -> bool {
        self.parse_errors > 0
    }

    /// Number of recoverable parse errors reported by the parser
    pub fn parse_errors(&self) -> usize {
        self.parse_errors
    }

    /// First element with the given tag, in document order
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.root.descendants().find(|el| el.tag == tag)
    }
}

/// Parse HTML and strip elements that contribute no readable content.
///
/// Never fails: malformed markup is recovered best-effort and reported via
/// [`CleanedDocument::degraded`].
pub fn clean(html: &str) -> CleanedDocument {
    let doc = Html::parse_document(html);
    let parse_errors = markup_errors(&doc);
    if parse_errors > 0 {
        tracing::warn!(errors = parse_errors, "Recovered from malformed HTML");
    }

    let root = Element {
        tag: String::new(),
        attrs: Vec::new(),
        children: convert_children(&doc.tree.root()),
    };

    CleanedDocument { root, parse_errors }
}

/// Parse errors caused by broken markup.
///
/// A missing or legacy DOCTYPE only switches the parser to quirks mode and is
/// not counted: html5ever reports a missing one as a single error on the first
/// token, and a legacy one as "Bad DOCTYPE".
fn markup_errors(doc: &Html) -> usize {
    let has_doctype = doc.tree.root().children().any(|n| n.value().is_doctype());
    let errors = doc
        .errors
        .iter()
        .filter(|e| !e.contains("DOCTYPE"))
        .count();
    if has_doctype {
        errors
    } else {
        errors.saturating_sub(1)
    }
}

fn convert_children(node: &ego_tree::NodeRef<scraper::node::Node>) -> Vec<Node> {
    node.children().filter_map(|child| convert(&child)).collect()
}

fn convert(node: &ego_tree::NodeRef<scraper::node::Node>) -> Option<Node> {
    use scraper::node::Node as Raw;

    match node.value() {
        Raw::Element(el) => {
            let tag = el.name().to_ascii_lowercase();
            if REMOVE_TAGS.contains(&tag.as_str()) {
                return None;
            }
            let attrs: Vec<(String, String)> = el
                .attrs()
                .map(|(k, v)| (k.to_ascii_lowercase(), v.to_string()))
                .collect();
            if is_hidden(&attrs) {
                return None;
            }
            Some(Node::Element(Element {
                tag,
                attrs,
                children: convert_children(node),
            }))
        }
        Raw::Text(text) => Some(Node::Text((*text.text).to_string())),
        Raw::Comment(comment) => Some(Node::Comment((*comment.comment).to_string())),
        // Doctype and processing instructions carry nothing we need
        _ => None,
    }
}

fn is_hidden(attrs: &[(String, String)]) -> bool {
    attrs.iter().any(|(name, value)| match name.as_str() {
        "hidden" => true,
        "aria-hidden" => value.trim().eq_ignore_ascii_case("true"),
        "style" => {
            let style: String = value
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_lowercase();
            style.contains("display:none") || style.contains("visibility:hidden")
        }
        _ => false,
    })
}
