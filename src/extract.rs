//! Page text extraction
//!
//! Turns an uploaded PDF into one text string per page, in page order.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid PDF: {0}")]
    Parse(String),

    #[error("failed to extract text from page {page}: {reason}")]
    PageText { page: u32, reason: String },
}

/// Extracts page text from raw document bytes
pub trait TextExtractor: Send + Sync {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractError>;
}

/// Tail of the text lopdf emits in place of glyphs from encodings it cannot
/// decode, e.g. `?Identity-H Unimplemented?`
const UNDECODED_MARKER: &str = " Unimplemented?";

/// lopdf-backed extractor
///
/// Pages whose fonts lopdf cannot decode come back without the undecoded
/// runs, or as an empty string when nothing else is left.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfExtractor;

impl TextExtractor for LopdfExtractor {
    fn extract_pages(&self, bytes: &[u8]) -> Result<Vec<String>, ExtractError> {
        let doc = lopdf::Document::load_mem(bytes).map_err(|e| ExtractError::Parse(e.to_string()))?;

        doc.get_pages()
            .keys()
            .map(|&page| {
                doc.extract_text(&[page])
                    .map(strip_undecoded)
                    .map_err(|e| ExtractError::PageText {
                        page,
                        reason: e.to_string(),
                    })
            })
            .collect()
    }
}

fn strip_undecoded(text: String) -> String {
    if !text.contains(UNDECODED_MARKER) {
        return text;
    }

    let mut kept = String::with_capacity(text.len());
    let mut rest = text.as_str();
    while let Some(end) = rest.find(UNDECODED_MARKER) {
        let head = &rest[..end];
        kept.push_str(head.rfind('?').map_or(head, |start| &head[..start]));
        rest = &rest[end + UNDECODED_MARKER.len()..];
    }
    kept.push_str(rest);

    if kept.trim().is_empty() {
        String::new()
    } else {
        kept
    }
}
