//! Extract the playable document from a backend response.
//!
//! Backends are asked for bare HTML but routinely wrap it in markdown fences
//! or surround it with chatter. Extraction is a fixed, deterministic policy:
//!
//! 1. If the text contains a fence marker, take the first fenced block.
//!    Otherwise take the whole trimmed text.
//! 2. Require an `<html` root followed by `</html>` and cut everything outside
//!    that span (keeping a leading `<!DOCTYPE`).
//!
//! If the fenced block fails step 2, the whole text is tried instead, but only
//! when every fence marker lies inside the resulting document (a fence inside
//! a script). A fence outside it means the first block was the answer.

use std::ops::Range;

use gamesmith_core::{ArtifactContent, RawResponse};
use gamesmith_error::{ExtractionError, ExtractionErrorKind};

const FENCE: &str = "```";
const DOCTYPE_OPEN: &str = "<!doctype";
const ROOT_OPEN: &str = "<html";
const ROOT_CLOSE: &str = "</html>";

/// Bytes of raw text kept from each end of a rejected response in logs.
const LOG_EXCERPT_LEN: usize = 200;

/// Extract the artifact from a raw backend response.
///
/// # Errors
///
/// Returns an [`ExtractionError`] when no plausible HTML document is present.
/// The failure is logged with the response length and bounded excerpts so
/// prompt or backend drift can be diagnosed.
pub fn extract(raw: &RawResponse) -> Result<ArtifactContent, ExtractionError> {
    match extract_document(raw.text()) {
        Ok(document) => {
            tracing::debug!(
                raw_len = raw.len(),
                document_len = document.len(),
                "Extracted HTML document"
            );
            Ok(ArtifactContent::from(document))
        }
        Err(e) => {
            let text = raw.text();
            tracing::warn!(
                raw_len = text.len(),
                head = %head(text, LOG_EXCERPT_LEN),
                tail = %tail(text, LOG_EXCERPT_LEN),
                error = %e,
                "Backend response is not a usable document"
            );
            Err(e)
        }
    }
}

/// Extract an HTML document from text that may contain fences or prose.
///
/// # Examples
///
/// ```
/// use gamesmith_pipeline::extract_document;
///
/// let response = "Here is your game!\n\
///     ```html\n\
///     <!DOCTYPE html><html><body>Play</body></html>\n\
///     ```\n\
///     Have fun!";
///
/// let html = extract_document(response).unwrap();
/// assert_eq!(html, "<!DOCTYPE html><html><body>Play</body></html>");
/// ```
pub fn extract_document(response: &str) -> Result<String, ExtractionError> {
    let whole = response.trim();

    match extract_from_code_block(response) {
        Some(block) => match document_span(block) {
            Ok(document) => Ok(document.to_string()),
            Err(fenced_err) => match document_range(whole) {
                Ok(range) if fences_within(whole, &range) => Ok(whole[range].to_string()),
                _ => Err(fenced_err),
            },
        },
        None => document_span(whole).map(str::to_string),
    }
}

/// Content of the first fenced block.
///
/// Looks for patterns like:
/// - ```html\n...\n```
/// - ``` ... ``` (no language specified)
///
/// A missing closing fence, usually a truncated response, yields everything
/// after the opening fence.
fn extract_from_code_block(response: &str) -> Option<&str> {
    let start = response.find(FENCE)?;
    let content_start = start + FENCE.len();

    // Skip to next newline (in case there's a language specifier)
    let skip_to = response[content_start..]
        .find('\n')
        .map(|n| content_start + n + 1)
        .unwrap_or(content_start);

    match response[skip_to..].find(FENCE) {
        Some(end) => Some(response[skip_to..skip_to + end].trim()),
        None => Some(response[skip_to..].trim()),
    }
}

/// The `<!DOCTYPE`/`<html` … `</html>` span of `candidate`.
fn document_span(candidate: &str) -> Result<&str, ExtractionError> {
    document_range(candidate).map(|range| &candidate[range])
}

/// True when every fence marker in `text` sits inside `range`.
fn fences_within(text: &str, range: &Range<usize>) -> bool {
    text.match_indices(FENCE)
        .all(|(at, _)| at >= range.start && at + FENCE.len() <= range.end)
}

/// Byte range of the document within `candidate`.
fn document_range(candidate: &str) -> Result<Range<usize>, ExtractionError> {
    if candidate.is_empty() {
        return Err(ExtractionError::new(ExtractionErrorKind::EmptyResponse));
    }

    // ASCII lowercasing keeps byte offsets identical to `candidate`.
    let lower = candidate.to_ascii_lowercase();

    let root = lower.find(ROOT_OPEN).ok_or_else(|| {
        ExtractionError::new(ExtractionErrorKind::MissingRootElement(candidate.len()))
    })?;

    let start = match lower.find(DOCTYPE_OPEN) {
        Some(doctype) if doctype < root => doctype,
        _ => root,
    };

    let end = lower
        .rfind(ROOT_CLOSE)
        .filter(|close| *close > root)
        .map(|close| close + ROOT_CLOSE.len())
        .ok_or_else(|| {
            ExtractionError::new(ExtractionErrorKind::UnclosedDocument(candidate.len()))
        })?;

    Ok(start..end)
}

fn head(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

fn tail(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut start = text.len() - max;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    &text[start..]
}
