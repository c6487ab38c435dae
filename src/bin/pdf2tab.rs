//! CLI binary for pdf2tab.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig`, shows a spinner while the pipeline runs, and prints
//! or writes the results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2tab::{
    extract, fetch_page_text, to_csv, write_csv, write_markdown, ExtractError, ExtractionConfig,
    ExtractionOutput, CSV_FILENAME, MD_FILENAME,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract the table on page 3 of an interim report
  pdf2tab https://www.cse.lk/cmt/upload_report_file/interim_2024.pdf --page 3

  # Local file, custom model, write artifacts into ./out
  pdf2tab interim_2024.pdf -p 3 --model llama3.1 -o out

  # See the raw page text the model would be shown (no model call)
  pdf2tab interim_2024.pdf -p 3 --text-only

  # Full result (table + raw reply + stats) as JSON
  pdf2tab interim_2024.pdf -p 3 --json > result.json

OUTPUT:
  On success the canonical markdown table is printed to stdout and two
  artifacts are written (default names, override with --md-out/--csv-out):
    structured_table.md    the table exactly as the model wrote it
    structured_table.csv   Metric,06-month (Rs. '000),03-month (Rs. '000)

  When the model reply contains no recognisable table, the raw reply is
  printed verbatim for manual inspection and the exit code is non-zero.

ENVIRONMENT VARIABLES:
  OLLAMA_HOST       Ollama server URL (default: http://localhost:11434)
  PDF2TAB_MODEL     Model tag (default: llama3.2)

SETUP:
  1. Start Ollama:    ollama serve
  2. Pull the model:  ollama pull llama3.2
  3. Extract:         pdf2tab report.pdf --page 3
"#;

/// Extract financial tables from PDF pages using a local LLM.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2tab",
    version,
    about = "Extract financial tables from PDF pages into Markdown and CSV using a local LLM",
    long_about = "Download a PDF (or open a local one), extract the text of one page, have a \
locally hosted chat model reformat it into a 3-column markdown financial table, and export \
the result as Markdown and CSV.",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Page to extract (1-indexed).
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Model tag passed to the chat endpoint.
    #[arg(long, env = "PDF2TAB_MODEL", default_value = "llama3.2")]
    model: String,

    /// Ollama server URL.
    #[arg(long, env = "OLLAMA_HOST", default_value = "http://localhost:11434")]
    host: String,

    /// Sampling temperature (0.0 = deterministic).
    #[arg(long, default_value_t = 0.0)]
    temperature: f32,

    /// Directory for the output artifacts.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Write the markdown artifact to this path instead of <output-dir>/structured_table.md.
    #[arg(long)]
    md_out: Option<PathBuf>,

    /// Write the CSV artifact to this path instead of <output-dir>/structured_table.csv.
    #[arg(long)]
    csv_out: Option<PathBuf>,

    /// Print the full result (table, raw reply, stats) as JSON.
    #[arg(long)]
    json: bool,

    /// Print the extracted page text and exit without calling the model.
    #[arg(long)]
    text_only: bool,

    /// Disable the spinner.
    #[arg(long)]
    no_spinner: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors and the table itself.
    #[arg(short, long)]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, default_value_t = 120)]
    download_timeout: u64,

    /// Chat-call timeout in seconds.
    #[arg(long, default_value_t = 120)]
    api_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library INFO logs would fight the spinner for the terminal; keep them
    // at error level unless the user asked for more.
    let show_spinner = !cli.quiet && !cli.no_spinner && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_spinner {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let config = build_config(&cli)?;

    // ── Text-only mode ───────────────────────────────────────────────────
    if cli.text_only {
        let page = fetch_page_text(&cli.input, &config)
            .await
            .context("Failed to extract page text")?;
        if !cli.quiet {
            eprintln!(
                "{}",
                dim(&format!(
                    "page {}/{} — {} chars",
                    page.page,
                    page.total_pages,
                    page.text.len()
                ))
            );
        }
        println!("{}", page.text);
        return Ok(());
    }

    // ── Run the pipeline ─────────────────────────────────────────────────
    let spinner = if show_spinner {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("Processing page {} with {}…", cli.page, cli.model));
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let result = extract(&cli.input, &config).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    match result {
        Ok(output) => {
            present_output(&cli, &output).await?;
            Ok(())
        }
        Err(ExtractError::NoTableFound { reply }) => {
            // The reply is the artifact now — show it verbatim so the user
            // can see what the model actually said.
            eprintln!(
                "{} {}",
                red("✗"),
                bold("Model reply did not contain a markdown table. Raw reply:")
            );
            println!("{reply}");
            std::process::exit(1);
        }
        Err(e) => Err(e).context("Extraction failed"),
    }
}

/// Print the table, write both artifacts, and summarise the run.
async fn present_output(cli: &Cli, output: &ExtractionOutput) -> Result<()> {
    let md_path = cli
        .md_out
        .clone()
        .unwrap_or_else(|| cli.output_dir.join(MD_FILENAME));
    let csv_path = cli
        .csv_out
        .clone()
        .unwrap_or_else(|| cli.output_dir.join(CSV_FILENAME));

    write_markdown(&output.table, &md_path)
        .await
        .context("Failed to write markdown artifact")?;
    write_csv(&output.table, &csv_path)
        .await
        .context("Failed to write CSV artifact")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(output).context("Failed to serialise output")?
        );
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.table.canonical_text.as_bytes())
            .context("Failed to write to stdout")?;
        if !output.table.canonical_text.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if !cli.quiet {
        let s = &output.stats;
        eprintln!(
            "{} {} rows  →  {}  {}",
            green("✔"),
            bold(&output.table.len().to_string()),
            md_path.display(),
            csv_path.display(),
        );
        eprintln!(
            "   {}",
            dim(&format!(
                "fetch {}ms · extract {}ms · model {}ms · total {}ms · {} tokens in / {} out",
                s.fetch_ms, s.extract_ms, s.llm_ms, s.total_ms, s.input_tokens, s.output_tokens
            ))
        );
    }

    // The CSV view is cheap to rebuild; sanity-log it at debug level so
    // --verbose runs show both serialisations.
    tracing::debug!("CSV artifact:\n{}", to_csv(&output.table)?);

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli) -> Result<ExtractionConfig> {
    ExtractionConfig::builder()
        .page(cli.page)
        .model(&cli.model)
        .ollama_host(&cli.host)
        .temperature(cli.temperature)
        .download_timeout_secs(cli.download_timeout)
        .api_timeout_secs(cli.api_timeout)
        .build()
        .context("Invalid configuration")
}
