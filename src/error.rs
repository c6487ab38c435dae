//! Error types for the pdf2tab library.
//!
//! One error enum covers the whole pipeline because every failure is
//! terminal for the current request: there is no retry and no partial
//! result to salvage (a run either produces a table or it does not).
//!
//! The one failure that is *not* a dead end for the user is
//! [`ExtractError::NoTableFound`] — the model answered, it just did not
//! answer with a table. That variant carries the full raw reply so callers
//! can show it verbatim for manual inspection instead of discarding it.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2tab library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The input exists and was read, but is not a PDF.
    #[error("Input is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Page errors ───────────────────────────────────────────────────────
    /// Requested page number exceeds the actual page count (or is 0).
    ///
    /// Pages are 1-indexed at the interface. Raised before any model call.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdf-extract could not parse the document.
    #[error("Text extraction failed for '{path}': {detail}")]
    TextExtractionFailed { path: PathBuf, detail: String },

    // ── Model errors ──────────────────────────────────────────────────────
    /// The chat endpoint could not be reached at all.
    #[error("Cannot reach the model at '{host}': {detail}\nIs Ollama running? Start it with: ollama serve")]
    ModelUnavailable { host: String, detail: String },

    /// The chat call exceeded the configured timeout.
    #[error("Model call timed out after {secs}s\nIncrease --api-timeout, or check that the model is loaded (ollama ps).")]
    ApiTimeout { secs: u64 },

    /// The chat endpoint answered with a non-success status or a malformed body.
    #[error("Model API error (HTTP {status}): {message}")]
    LlmApiError { status: u16, message: String },

    // ── Table errors ──────────────────────────────────────────────────────
    /// The model reply did not contain a recognisable markdown table.
    ///
    /// Carries the full raw reply so the caller can surface it verbatim
    /// for manual inspection.
    #[error("Model reply did not contain a markdown table (header + separator + data rows).\nInspect the raw reply and re-run, or try a different page/model.")]
    NoTableFound { reply: String },

    /// A matched data row did not split into exactly 3 cells.
    ///
    /// The parser rejects rather than pads or truncates; the offending
    /// line is kept for the error message.
    #[error("Table row has {cells} cells, expected 3: '{line}'")]
    ColumnMismatch { line: String, cells: usize },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_out_of_range_display() {
        let e = ExtractError::PageOutOfRange { page: 9, total: 4 };
        let msg = e.to_string();
        assert!(msg.contains("Page 9"), "got: {msg}");
        assert!(msg.contains("4 pages"), "got: {msg}");
    }

    #[test]
    fn column_mismatch_display() {
        let e = ExtractError::ColumnMismatch {
            line: "| Revenue | 40,463,469 |".into(),
            cells: 2,
        };
        let msg = e.to_string();
        assert!(msg.contains("2 cells"), "got: {msg}");
        assert!(msg.contains("expected 3"), "got: {msg}");
        assert!(msg.contains("Revenue"), "got: {msg}");
    }

    #[test]
    fn no_table_found_keeps_reply() {
        let e = ExtractError::NoTableFound {
            reply: "I could not find any 2024 data on this page.".into(),
        };
        // Display must not dump the reply; the caller decides how to show it.
        assert!(!e.to_string().contains("2024 data"));
        if let ExtractError::NoTableFound { reply } = e {
            assert!(reply.contains("2024 data"));
        }
    }

    #[test]
    fn api_timeout_display() {
        let e = ExtractError::ApiTimeout { secs: 120 };
        assert!(e.to_string().contains("120s"));
    }

    #[test]
    fn model_unavailable_mentions_host() {
        let e = ExtractError::ModelUnavailable {
            host: "http://localhost:11434".into(),
            detail: "connection refused".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("localhost:11434"));
        assert!(msg.contains("connection refused"));
    }
}
