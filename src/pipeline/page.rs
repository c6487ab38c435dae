//! Page text extraction: pull the plain text of one 1-indexed page.
//!
//! ## Why spawn_blocking?
//!
//! pdf-extract parses the whole document synchronously and can chew CPU for
//! seconds on scanned or font-heavy files. `tokio::task::spawn_blocking`
//! moves that work onto the blocking thread pool so the async caller is not
//! stalled on a worker thread.
//!
//! ## What comes out
//!
//! Linear text in layout order, nothing more. Tables lose their grid
//! structure here — recovering it is the model's job, not this stage's.

use crate::error::ExtractError;
use gag::Gag;
use std::path::Path;
use tracing::debug;

/// The text of one page plus the document's page count.
#[derive(Debug, Clone)]
pub struct PageText {
    /// 1-indexed page number the text came from.
    pub page: usize,
    /// Total pages in the document.
    pub total_pages: usize,
    /// Raw linear text of the page.
    pub text: String,
}

/// Extract the text of `page` (1-indexed) from the PDF at `path`.
///
/// Runs inside `spawn_blocking` since pdf-extract is CPU-bound.
///
/// # Errors
/// - [`ExtractError::PageOutOfRange`] when `page` is 0 or exceeds the
///   document's page count — raised before any model call happens.
/// - [`ExtractError::TextExtractionFailed`] when the document cannot be parsed.
pub async fn page_text(path: &Path, page: usize) -> Result<PageText, ExtractError> {
    let path = path.to_path_buf();

    tokio::task::spawn_blocking(move || {
        let pages = extract_pages_quiet(&path)?;
        select_page(pages, page)
    })
    .await
    .map_err(|e| ExtractError::Internal(format!("Extraction task panicked: {}", e)))?
}

/// Parse the document into per-page text with the parser's console noise muted.
///
/// pdf-extract prints font and encoding warnings straight to stdout/stderr;
/// gag silences both for the duration of the parse.
fn extract_pages_quiet(path: &Path) -> Result<Vec<String>, ExtractError> {
    let _gag_out = Gag::stdout().ok();
    let _gag_err = Gag::stderr().ok();

    pdf_extract::extract_text_by_pages(path).map_err(|e| ExtractError::TextExtractionFailed {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Pick one 1-indexed page out of the extracted pages.
///
/// The interface is 1-based; the page collection is 0-based, so the index
/// is `page - 1`.
fn select_page(mut pages: Vec<String>, page: usize) -> Result<PageText, ExtractError> {
    let total_pages = pages.len();
    if page == 0 || page > total_pages {
        return Err(ExtractError::PageOutOfRange {
            page,
            total: total_pages,
        });
    }

    let text = std::mem::take(&mut pages[page - 1]);
    debug!("Page {}/{}: {} chars of text", page, total_pages, text.len());

    Ok(PageText {
        page,
        total_pages,
        text,
    })
}
