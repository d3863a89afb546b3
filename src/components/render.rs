//! Display region markup
//!
//! Page and result content comes straight from the backend and is treated as
//! untrusted text: everything interpolated into markup is escaped.

use html_escape::encode_text;

use super::ViewerState;
use crate::types::{Page, SearchResult};

/// Render the whole display region
pub fn render(state: &ViewerState) -> String {
    match state {
        ViewerState::Empty => String::new(),
        ViewerState::ShowingDocument { pages, .. } => pages.iter().map(page_block).collect(),
        ViewerState::ShowingResults { results, .. } => results.iter().map(result_block).collect(),
        ViewerState::ShowingError { message } => encode_text(message).into_owned(),
    }
}

pub fn page_block(page: &Page) -> String {
    format!(
        r#"<div class="page"><div class="page-number">Page {}</div><div class="content">{}</div></div>"#,
        page.page_number,
        encode_text(&page.content)
    )
}

pub fn result_block(result: &SearchResult) -> String {
    format!(
        r#"<div class="page"><div class="page-number">{} - Page {}</div><div class="content">{}</div></div>"#,
        encode_text(&result.document_name),
        result.page_number,
        encode_text(&result.content)
    )
}
