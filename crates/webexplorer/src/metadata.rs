//! Document metadata: author, publication date, page kind, `<meta>` tags,
//! links and images
//!
//! Links and images are resolved against the page URL (or its `<base href>`)
//! and only absolute http(s) targets are kept.

use crate::classify::{CleanedDocument, Element};
use crate::segment::{collapse_whitespace, inner_text};
use crate::types::{ContentType, Image, Link, PageMetadata};
use std::collections::{BTreeMap, HashSet};
use url::Url;

/// Upper bound on links reported per page
const MAX_LINKS: usize = 200;

/// Upper bound on images reported per page
const MAX_IMAGES: usize = 50;

/// Meta keys holding the author, in priority order
const AUTHOR_KEYS: &[&str] = &["author", "dc.creator", "article:author"];

/// Meta keys holding the publication date, in priority order
const DATE_KEYS: &[&str] = &["article:published_time", "dc.date", "date", "pubdate"];

/// schema.org item types of threaded, multi-author pages
const DISCUSSION_TYPES: &[&str] = &["DiscussionForumPosting", "QAPage", "Question"];

/// Collect metadata from a cleaned document fetched from `source_url`
pub fn page_metadata(doc: &CleanedDocument, source_url: &str) -> PageMetadata {
    let meta = meta_map(doc);
    let base = base_url(doc, source_url);
    let body = doc.find("body");

    let metadata = PageMetadata {
        author: author(doc, &meta),
        published_date: published_date(doc, &meta),
        content_type: content_type(doc, &meta),
        links: body.map(|b| links(b, base.as_ref())).unwrap_or_default(),
        images: body.map(|b| images(b, base.as_ref())).unwrap_or_default(),
        meta,
    };

    tracing::debug!(
        content_type = ?metadata.content_type,
        links = metadata.links.len(),
        images = metadata.images.len(),
        meta = metadata.meta.len(),
        "Collected page metadata"
    );

    metadata
}

fn meta_map(doc: &CleanedDocument) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for el in doc.root().descendants().filter(|el| el.tag == "meta") {
        let Some(key) = el.attr("name").or_else(|| el.attr("property")) else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        let content = el.attr("content").map(collapse_whitespace).unwrap_or_default();
        if key.is_empty() || content.is_empty() {
            continue;
        }
        map.entry(key).or_insert(content);
    }
    map
}

fn first_meta(meta: &BTreeMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| meta.get(*k).cloned())
}

fn author(doc: &CleanedDocument, meta: &BTreeMap<String, String>) -> Option<String> {
    if let Some(author) = first_meta(meta, AUTHOR_KEYS) {
        return Some(author);
    }

    doc.root().descendants().find_map(|el| {
        let rel_author = el
            .attr("rel")
            .map(|r| r.split_whitespace().any(|t| t.eq_ignore_ascii_case("author")))
            .unwrap_or(false);
        let prop_author = has_itemprop(el, "author");
        if !rel_author && !prop_author {
            return None;
        }
        let text = el
            .attr("content")
            .map(collapse_whitespace)
            .unwrap_or_else(|| collapse_whitespace(&inner_text(el)));
        (!text.is_empty()).then_some(text)
    })
}

fn published_date(doc: &CleanedDocument, meta: &BTreeMap<String, String>) -> Option<String> {
    if let Some(date) = first_meta(meta, DATE_KEYS) {
        return Some(date);
    }

    let elements: Vec<&Element> = doc.root().descendants().collect();
    let from_itemprop = elements.iter().find_map(|el| {
        if !has_itemprop(el, "datePublished") {
            return None;
        }
        el.attr("content")
            .or_else(|| el.attr("datetime"))
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string)
    });

    from_itemprop.or_else(|| {
        elements.iter().find_map(|el| {
            if el.tag != "time" {
                return None;
            }
            el.attr("datetime")
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string)
        })
    })
}

fn content_type(doc: &CleanedDocument, meta: &BTreeMap<String, String>) -> ContentType {
    let discussion = doc.root().descendants().any(|el| {
        el.attr("itemtype")
            .map(|t| DISCUSSION_TYPES.iter().any(|d| t.contains(d)))
            .unwrap_or(false)
    });
    if discussion {
        return ContentType::Discussion;
    }

    let og_article = meta
        .get("og:type")
        .map(|t| t.eq_ignore_ascii_case("article"))
        .unwrap_or(false);
    if og_article || meta.contains_key("article:published_time") || doc.find("article").is_some()
    {
        return ContentType::Article;
    }

    ContentType::Webpage
}

fn has_itemprop(el: &Element, name: &str) -> bool {
    el.attr("itemprop")
        .map(|p| p.split_whitespace().any(|t| t == name))
        .unwrap_or(false)
}

fn base_url(doc: &CleanedDocument, source_url: &str) -> Option<Url> {
    let page = Url::parse(source_url).ok();
    let declared = doc
        .find("base")
        .and_then(|b| b.attr("href"))
        .map(str::trim)
        .filter(|h| !h.is_empty());

    match (page, declared) {
        (Some(page), Some(href)) => page.join(href).ok().or(Some(page)),
        (None, Some(href)) => Url::parse(href).ok(),
        (page, None) => page,
    }
}

/// Absolute http(s) URL for `href`, without its fragment
fn resolve(base: Option<&Url>, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let mut url = match base {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

fn links(body: &Element, base: Option<&Url>) -> Vec<Link> {
    let mut seen = HashSet::new();
    body.descendants()
        .filter(|el| el.tag == "a")
        .filter_map(|el| {
            let url = resolve(base, el.attr("href")?)?;
            Some(Link {
                text: collapse_whitespace(&inner_text(el)),
                url: url.to_string(),
            })
        })
        .filter(|link| seen.insert(link.url.clone()))
        .take(MAX_LINKS)
        .collect()
}

fn images(body: &Element, base: Option<&Url>) -> Vec<Image> {
    let mut seen = HashSet::new();
    body.descendants()
        .filter(|el| el.tag == "img")
        .filter_map(|el| {
            // Lazy-loaded images keep the real source in data-src
            let src = el
                .attr("src")
                .filter(|s| !s.trim().is_empty() && !s.trim_start().starts_with("data:"))
                .or_else(|| el.attr("data-src"))?;
            let url = resolve(base, src)?;
            Some(Image {
                url: url.to_string(),
                alt: el.attr("alt").map(collapse_whitespace).unwrap_or_default(),
            })
        })
        .filter(|image| seen.insert(image.url.clone()))
        .take(MAX_IMAGES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::clean;

    fn meta_of(html: &str) -> PageMetadata {
        page_metadata(&clean(html), "https://blog.example/posts/one")
    }

    #[test]
    fn test_meta_map_collects_name_and_property() {
        let m = meta_of(
            r#"<head>
                <meta name="Keywords" content=" rust,  async ">
                <meta property="og:title" content="Title">
                <meta name="keywords" content="ignored duplicate">
                <meta name="empty" content="">
                <meta charset="utf-8">
            </head>"#,
        );
        assert_eq!(m.meta.get("keywords").map(String::as_str), Some("rust, async"));
        assert_eq!(m.meta.get("og:title").map(String::as_str), Some("Title"));
        assert!(!m.meta.contains_key("empty"));
        assert_eq!(m.meta.len(), 2);
    }

    #[test]
    fn test_author_priority() {
        let m = meta_of(
            r#"<head><meta name="author" content="Meta Author"></head>
            <body><a rel="author" href="/me">Link Author</a></body>"#,
        );
        assert_eq!(m.author.as_deref(), Some("Meta Author"));

        let m = meta_of(r#"<body><p>By <a rel="author" href="/me">Link  Author</a></p></body>"#);
        assert_eq!(m.author.as_deref(), Some("Link Author"));

        let m = meta_of(r#"<body><span itemprop="author">Schema Author</span></body>"#);
        assert_eq!(m.author.as_deref(), Some("Schema Author"));

        assert_eq!(meta_of("<body><p>anonymous</p></body>").author, None);
    }

    #[test]
    fn test_published_date_priority() {
        let m = meta_of(
            r#"<head><meta property="article:published_time" content="2024-01-15T10:30:00Z"></head>
            <body><time datetime="2023-01-01">old</time></body>"#,
        );
        assert_eq!(m.published_date.as_deref(), Some("2024-01-15T10:30:00Z"));

        let m = meta_of(
            r#"<body><time datetime="2020-02-02">x</time><meta itemprop="datePublished" content="2024-03-20"></body>"#,
        );
        assert_eq!(m.published_date.as_deref(), Some("2024-03-20"));

        let m = meta_of(r#"<body><p>Posted <time datetime=" 2024-03-20T14:00:00Z ">March 20</time></p></body>"#);
        assert_eq!(m.published_date.as_deref(), Some("2024-03-20T14:00:00Z"));

        assert_eq!(meta_of("<body><time>no attr</time></body>").published_date, None);
    }

    #[test]
    fn test_content_type_detection() {
        let m = meta_of(
            r#"<body><div itemscope itemtype="http://schema.org/DiscussionForumPosting"><article>post</article></div></body>"#,
        );
        assert_eq!(m.content_type, ContentType::Discussion);

        let m = meta_of(r#"<head><meta property="og:type" content="article"></head><body><p>x</p></body>"#);
        assert_eq!(m.content_type, ContentType::Article);

        let m = meta_of("<body><article><p>story</p></article></body>");
        assert_eq!(m.content_type, ContentType::Article);

        assert_eq!(meta_of("<body><p>x</p></body>").content_type, ContentType::Webpage);
    }

    #[test]
    fn test_links_resolved_and_filtered() {
        let m = meta_of(
            r##"<body>
                <a href="/about">About  us</a>
                <a href="two">Relative</a>
                <a href="https://other.example/x#frag">Other</a>
                <a href="https://other.example/x">Other again</a>
                <a href="#top">Top</a>
                <a href="mailto:me@example.com">Mail</a>
                <a href="javascript:void(0)">JS</a>
                <a>No href</a>
            </body>"##,
        );
        assert_eq!(
            m.links,
            vec![
                Link { text: "About us".to_string(), url: "https://blog.example/about".to_string() },
                Link { text: "Relative".to_string(), url: "https://blog.example/posts/two".to_string() },
                Link { text: "Other".to_string(), url: "https://other.example/x".to_string() },
            ]
        );
    }

    #[test]
    fn test_links_skip_removed_chrome() {
        let m = meta_of(r#"<body><nav><a href="/home">Home</a></nav><p><a href="/post">Post</a></p></body>"#);
        assert_eq!(m.links.len(), 1);
        assert_eq!(m.links[0].url, "https://blog.example/post");
    }

    #[test]
    fn test_base_href_is_honoured() {
        let m = meta_of(
            r#"<head><base href="https://cdn.example/assets/"></head><body><img src="a.png" alt="A"></body>"#,
        );
        assert_eq!(m.images[0].url, "https://cdn.example/assets/a.png");
    }

    #[test]
    fn test_images_resolved() {
        let m = meta_of(
            r#"<body>
                <img src="/logo.png" alt=" Logo ">
                <img src="/logo.png" alt="duplicate">
                <img src="data:image/gif;base64,R0lGOD" data-src="/lazy.jpg">
                <img src="">
                <img src="data:image/png;base64,AAAA">
            </body>"#,
        );
        assert_eq!(
            m.images,
            vec![
                Image { url: "https://blog.example/logo.png".to_string(), alt: "Logo".to_string() },
                Image { url: "https://blog.example/lazy.jpg".to_string(), alt: String::new() },
            ]
        );
    }

    #[test]
    fn test_unparsable_source_url_keeps_absolute_targets() {
        let m = page_metadata(
            &clean(r#"<body><a href="/rel">rel</a><a href="https://abs.example/">abs</a></body>"#),
            "not a url",
        );
        assert_eq!(m.links.len(), 1);
        assert_eq!(m.links[0].url, "https://abs.example/");
    }

    #[test]
    fn test_link_cap() {
        let html: String = (0..MAX_LINKS + 20)
            .map(|i| format!(r#"<a href="/p/{i}">{i}</a>"#))
            .collect();
        let m = meta_of(&format!("<body>{html}</body>"));
        assert_eq!(m.links.len(), MAX_LINKS);
    }
}
