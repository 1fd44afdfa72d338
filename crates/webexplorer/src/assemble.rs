//! Composition of segmented content into the final extraction result

use crate::classify::clean;
use crate::error::ExplorerError;
use crate::metadata::page_metadata;
use crate::paginate::{paginate, truncate_chars};
use crate::segment::segment;
use crate::types::{ExtractionResult, PrimarySource, RenderedPage, SegmentedContent};

/// Build the result for one page of the primary text stream.
///
/// A non-empty article is the paginated stream, with `main_text` kept as
/// bounded context. Otherwise `main_text` itself is paginated. Every text
/// field is capped at `max_chars` code points.
pub fn assemble(
    segmented: SegmentedContent,
    page: usize,
    max_chars: usize,
    source_url: &str,
) -> Result<ExtractionResult, ExplorerError> {
    let primary_source = if segmented.article_body.is_empty() {
        PrimarySource::MainText
    } else {
        PrimarySource::Article
    };

    let (article_body, main_text, main_text_truncated, pagination) = match primary_source {
        PrimarySource::Article => {
            let pagination = paginate(&segmented.article_body, page, max_chars)?;
            let (context, cut) = truncate_chars(&segmented.main_text, max_chars);
            (pagination.content.clone(), context.to_string(), cut, pagination)
        }
        PrimarySource::MainText => {
            let pagination = paginate(&segmented.main_text, page, max_chars)?;
            (String::new(), pagination.content.clone(), false, pagination)
        }
    };

    let (description, _) = truncate_chars(&segmented.meta_description, max_chars);
    let length = pagination.content.chars().count();

    tracing::debug!(
        url = source_url,
        source = ?primary_source,
        page,
        total_pages = pagination.total_pages,
        "Assembled extraction result"
    );

    Ok(ExtractionResult {
        url: source_url.to_string(),
        title: segmented.title,
        description: description.to_string(),
        primary_source,
        article_body,
        main_text,
        main_text_truncated,
        headings: segmented.headings,
        page: pagination.page,
        total_pages: pagination.total_pages,
        has_next_page: pagination.has_next,
        total_chars: pagination.total_chars,
        length,
        ..Default::default()
    })
}

/// Run the whole pipeline (clean, segment, assemble) over a rendered page
/// and attach the page metadata
pub fn extract(
    rendered: &RenderedPage,
    page: usize,
    max_chars: usize,
) -> Result<ExtractionResult, ExplorerError> {
    let doc = clean(&rendered.html);
    let mut result = assemble(segment(&doc), page, max_chars, &rendered.source_url)?;

    let metadata = page_metadata(&doc, &rendered.source_url);
    result.author = metadata.author;
    result.published_date = metadata.published_date;
    result.content_type = metadata.content_type;
    result.links = metadata.links;
    result.images = metadata.images;
    result.metadata = metadata.meta;
    result.parse_degraded = doc.degraded();
    Ok(result)
}
