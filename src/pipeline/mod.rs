//! Pipeline stages for table extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different chat backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ page ──▶ prompt ──▶ llm ──▶ table ──▶ export
//! (URL/path) (text)  (template) (chat)  (regex +  (markdown
//!                                        parse)    + CSV)
//! ```
//!
//! 1. [`input`]  — canonicalise the user-supplied path or URL to a local file
//! 2. [`page`]   — extract one page's plain text; runs in `spawn_blocking`
//!    because pdf-extract is CPU-bound
//! 3. [`crate::prompts`] — embed the page text in the instruction template
//! 4. [`llm`]    — send the single-message chat request; the only stage with
//!    network I/O against the model
//! 5. [`table`]  — scan the reply for the first contiguous markdown table and
//!    parse it into strict 3-column rows
//! 6. [`export`] — serialise the rows as markdown and CSV, optionally to disk

pub mod export;
pub mod input;
pub mod llm;
pub mod page;
pub mod table;
