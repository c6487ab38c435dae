//! # pdf2tab
//!
//! Extract financial tables from PDF pages into Markdown and CSV using a
//! locally hosted LLM.
//!
//! ## Why this crate?
//!
//! Interim financial statements publish their figures as PDF tables whose
//! grid structure evaporates under plain text extraction — merged headers,
//! repeated column groups, and footnotes come out as one undifferentiated
//! stream. Instead of trying to reconstruct the grid geometrically, this
//! crate hands the page text to a local chat model with strict formatting
//! instructions and parses the model's markdown table reply into exactly
//! three columns: metric, 6-month value, 3-month value.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input   resolve local file or download from URL (temp file, auto-removed)
//!  ├─ 2. Page    extract one page's plain text (pdf-extract, spawn_blocking)
//!  ├─ 3. Prompt  embed the text in the fixed table-shape instructions
//!  ├─ 4. Chat    one user message to Ollama, temperature 0, no streaming
//!  ├─ 5. Table   regex-match the first markdown table, parse 3-column rows
//!  └─ 6. Export  canonical markdown + CSV (structured_table.md / .csv)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2tab::{extract, ExtractionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ExtractionConfig::builder().page(3).build()?;
//!     let output = extract("https://example.com/interim_2024.pdf", &config).await?;
//!     println!("{}", output.table.canonical_text);
//!     eprintln!("{} rows, {}ms", output.table.len(), output.stats.total_ms);
//!     Ok(())
//! }
//! ```
//!
//! ## Failure surface
//!
//! The model's reply is free text; when it does not contain a recognisable
//! table, [`extract`] returns [`ExtractError::NoTableFound`] carrying the
//! full raw reply so a human can inspect what the model actually said. A
//! matched table whose rows do not split into exactly 3 cells fails with
//! [`ExtractError::ColumnMismatch`] — the parser rejects rather than
//! guesses.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2tab` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf2tab = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder, DEFAULT_HOST, DEFAULT_MODEL};
pub use error::ExtractError;
pub use extract::{extract, extract_sync, fetch_page_text, reformat_page_text};
pub use output::{ExtractionOutput, ExtractionStats, ModelReply, StructuredTable, TableRow, COLUMNS};
pub use pipeline::export::{to_csv, to_markdown, write_csv, write_markdown, CSV_FILENAME, MD_FILENAME};
pub use pipeline::llm::{ChatModel, OllamaClient};
pub use pipeline::page::PageText;
