//! Eager extraction entry points.
//!
//! One call runs the whole pipeline: resolve input, pull the page text,
//! prompt the model, parse the reply. Everything is linear and
//! single-request — there is nothing to stream and nothing to parallelise,
//! so the eager API is the only API.

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::{ExtractionOutput, ExtractionStats, ModelReply, StructuredTable};
use crate::pipeline::llm::{ChatModel, OllamaClient};
use crate::pipeline::page::PageText;
use crate::pipeline::{input, page, table};
use crate::prompts;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Extract a structured financial table from one page of a PDF.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str` — Local file path or HTTP/HTTPS URL to a PDF
/// * `config` — Run configuration (page, model, timeouts)
///
/// # Errors
/// Every failure is terminal for the run; see [`ExtractError`]. The one
/// variant callers usually want to handle specially is
/// [`ExtractError::NoTableFound`], which carries the raw model reply for
/// manual inspection.
pub async fn extract(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting extraction: {} (page {})", input_str, config.page);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let fetch_start = Instant::now();
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;
    let fetch_ms = fetch_start.elapsed().as_millis() as u64;

    // ── Step 2: Page text ────────────────────────────────────────────────
    let extract_start = Instant::now();
    let page = page::page_text(resolved.path(), config.page).await?;
    let extract_ms = extract_start.elapsed().as_millis() as u64;
    info!(
        "Page {}/{}: {} chars of text",
        page.page,
        page.total_pages,
        page.text.len()
    );

    // The downloaded temp file is only needed up to this point.
    drop(resolved);

    // ── Step 3: Prompt the model and parse the reply ─────────────────────
    let llm_start = Instant::now();
    let (table, reply) = reformat_page_text(&page.text, config).await?;
    let llm_ms = llm_start.elapsed().as_millis() as u64;

    let stats = ExtractionStats {
        page: page.page,
        total_pages: page.total_pages,
        fetch_ms,
        extract_ms,
        llm_ms,
        total_ms: total_start.elapsed().as_millis() as u64,
        input_tokens: reply.input_tokens,
        output_tokens: reply.output_tokens,
    };

    info!(
        "Extraction complete: {} data rows, {}ms total",
        table.len(),
        stats.total_ms
    );

    Ok(ExtractionOutput {
        table,
        reply,
        stats,
    })
}

/// Run the model-side tail of the pipeline on already-extracted page text:
/// build the prompt, send one chat message, parse the first table out of
/// the reply.
///
/// Exposed separately so callers (and tests) can drive everything
/// downstream of the PDF without a document on disk.
pub async fn reformat_page_text(
    page_text: &str,
    config: &ExtractionConfig,
) -> Result<(StructuredTable, ModelReply), ExtractError> {
    let model = resolve_model(config)?;
    let template = config
        .prompt_template
        .as_deref()
        .unwrap_or(prompts::DEFAULT_PROMPT_TEMPLATE);
    let prompt = prompts::build_prompt(template, page_text);

    debug!("Prompting {} ({} bytes)", model.id(), prompt.len());
    let reply = model.chat(&prompt).await?;
    debug!(
        "Reply: {} bytes, {} tokens in / {} out",
        reply.content.len(),
        reply.input_tokens,
        reply.output_tokens
    );

    let table = table::extract_table(&reply.content)?;
    Ok((table, reply))
}

/// Resolve the input and return one page's text without calling the model.
///
/// Powers the CLI's `--text-only` mode and lets callers sanity-check what
/// the model would actually be shown.
pub async fn fetch_page_text(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<PageText, ExtractError> {
    let resolved =
        input::resolve_input(input_str.as_ref(), config.download_timeout_secs).await?;
    page::page_text(resolved.path(), config.page).await
}

/// Synchronous wrapper around [`extract`].
///
/// Creates a temporary tokio runtime internally.
pub fn extract_sync(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| ExtractError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(extract(input_str, config))
}

/// Resolve the chat model, most-specific first: a pre-built override from
/// the config, else an Ollama client for the configured host and model.
fn resolve_model(config: &ExtractionConfig) -> Result<Arc<dyn ChatModel>, ExtractError> {
    if let Some(ref model) = config.model_override {
        return Ok(Arc::clone(model));
    }
    Ok(Arc::new(OllamaClient::from_config(config)?))
}
