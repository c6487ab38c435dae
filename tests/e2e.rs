//! End-to-end tests for pdf2tab.
//!
//! These tests need a live Ollama server and a real PDF, so they are gated
//! behind the `E2E_ENABLED` environment variable and skip themselves when
//! their prerequisites are missing.
//!
//! Run with:
//!   E2E_ENABLED=1 PDF2TAB_E2E_PDF=./interim_2024.pdf cargo test --test e2e -- --nocapture
//!
//! Optional:
//!   OLLAMA_HOST          defaults to http://localhost:11434
//!   PDF2TAB_E2E_MODEL    defaults to llama3.2
//!   PDF2TAB_E2E_PAGE     defaults to 1

use pdf2tab::{extract, fetch_page_text, ExtractError, ExtractionConfig};

fn e2e_pdf() -> Option<String> {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
        return None;
    }
    match std::env::var("PDF2TAB_E2E_PDF") {
        Ok(p) => Some(p),
        Err(_) => {
            println!("SKIP — set PDF2TAB_E2E_PDF to a PDF path or URL");
            None
        }
    }
}

fn e2e_config(page: usize) -> ExtractionConfig {
    let mut builder = ExtractionConfig::builder().page(page);
    if let Ok(host) = std::env::var("OLLAMA_HOST") {
        builder = builder.ollama_host(host);
    }
    if let Ok(model) = std::env::var("PDF2TAB_E2E_MODEL") {
        builder = builder.model(model);
    }
    builder.build().expect("valid config")
}

fn e2e_page() -> usize {
    std::env::var("PDF2TAB_E2E_PAGE")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(1)
}

/// Helper: check if Ollama is reachable at the configured host.
async fn ollama_is_available() -> bool {
    let host =
        std::env::var("OLLAMA_HOST").unwrap_or_else(|_| "http://localhost:11434".to_string());
    reqwest::Client::new()
        .get(format!("{host}/api/tags"))
        .timeout(std::time::Duration::from_secs(3))
        .send()
        .await
        .is_ok()
}

// ── Page-text tests (no model needed) ────────────────────────────────────────

#[tokio::test]
async fn test_page_text_is_nonempty_for_valid_page() {
    let Some(pdf) = e2e_pdf() else { return };

    let page = fetch_page_text(&pdf, &e2e_config(e2e_page()))
        .await
        .expect("page text extraction should succeed");

    assert!(page.total_pages >= 1);
    assert!(
        !page.text.trim().is_empty(),
        "page {} should have text",
        page.page
    );
    println!(
        "[page-text] page {}/{} — {} chars",
        page.page,
        page.total_pages,
        page.text.len()
    );
}

#[tokio::test]
async fn test_page_past_the_end_is_out_of_range() {
    let Some(pdf) = e2e_pdf() else { return };

    // First learn the real page count, then ask for one past it.
    let page = fetch_page_text(&pdf, &e2e_config(1))
        .await
        .expect("page 1 should exist");
    let beyond = page.total_pages + 1;

    let err = fetch_page_text(&pdf, &e2e_config(beyond)).await;
    match err {
        Err(ExtractError::PageOutOfRange { page: p, total }) => {
            assert_eq!(p, beyond);
            assert_eq!(total, beyond - 1);
        }
        other => panic!("expected PageOutOfRange, got {other:?}"),
    }
}

#[tokio::test]
async fn test_nonexistent_input_is_an_error() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP");
        return;
    }

    let result = fetch_page_text("/definitely/not/a/real/file.pdf", &e2e_config(1)).await;
    assert!(result.is_err());
}

// ── Full-pipeline tests (need a live model) ──────────────────────────────────

#[tokio::test]
async fn test_extract_produces_a_three_column_table() {
    let Some(pdf) = e2e_pdf() else { return };

    if !ollama_is_available().await {
        println!("SKIP — Ollama not reachable (start with: ollama serve)");
        return;
    }

    let result = extract(&pdf, &e2e_config(e2e_page())).await;

    match result {
        Ok(output) => {
            assert!(!output.table.is_empty(), "table should have data rows");
            for row in &output.table.rows {
                assert!(!row.metric.is_empty(), "metric names must be non-empty");
            }
            // The canonical text is a substring of the raw reply.
            assert!(output.reply.content.contains(&output.table.canonical_text));
            println!(
                "[extract] {} rows, {} tokens in / {} out, {}ms",
                output.table.len(),
                output.stats.input_tokens,
                output.stats.output_tokens,
                output.stats.total_ms
            );
            println!("--- TABLE ---\n{}--- END ---", output.table.canonical_text);
        }
        // A model is free to answer without a table; that is a documented
        // outcome, not a test failure — but the raw reply must be carried.
        Err(ExtractError::NoTableFound { reply }) => {
            assert!(!reply.is_empty());
            println!("[extract] model produced no table; raw reply:\n{reply}");
        }
        Err(e) => panic!("extraction failed: {e}"),
    }
}
