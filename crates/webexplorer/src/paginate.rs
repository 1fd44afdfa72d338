//! Code-point based pagination of a text buffer

use crate::error::ExplorerError;
use crate::types::PaginationResult;

/// Return page `page` (1-indexed) of `text`, `max_chars` code points per page.
///
/// Page *k* covers code points `[(k-1)*max_chars, k*max_chars)`. Pages past
/// the end come back empty with `has_next = false`. Empty text still has one
/// (empty) page.
pub fn paginate(text: &str, page: usize, max_chars: usize) -> Result<PaginationResult, ExplorerError> {
    if max_chars == 0 {
        return Err(ExplorerError::invalid("max_chars must be positive"));
    }
    if page == 0 {
        return Err(ExplorerError::invalid("Page number must be 1 or greater"));
    }

    let total_chars = text.chars().count();
    let total_pages = total_chars.div_ceil(max_chars).max(1);

    let content = match (page - 1).checked_mul(max_chars) {
        Some(start) if start < total_chars => {
            let end = start.saturating_add(max_chars);
            slice_chars(text, start, end).to_string()
        }
        _ => String::new(),
    };

    Ok(PaginationResult {
        content,
        page,
        total_pages,
        has_next: page < total_pages,
        total_chars,
    })
}

/// First `max_chars` code points of `text`, and whether anything was cut
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => (&text[..byte], true),
        None => (text, false),
    }
}

/// Slice by code-point offsets; `end` is clipped to the text length
fn slice_chars(text: &str, start: usize, end: usize) -> &str {
    let mut indices = text.char_indices().map(|(i, _)| i);
    let from = indices.nth(start).unwrap_or(text.len());
    let to = if end > start {
        indices.nth(end - start - 1).unwrap_or(text.len())
    } else {
        from
    };
    &text[from..to]
}
