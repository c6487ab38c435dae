//! Output types: the structured table, the raw model reply, and run stats.
//!
//! Everything here is transient — one extraction produces one
//! [`ExtractionOutput`] and nothing persists across runs. All types derive
//! `Serialize`/`Deserialize` so the CLI `--json` mode and downstream
//! consumers get the whole result in one document.

use serde::{Deserialize, Serialize};

/// The three column names of the tabular structure, in order.
///
/// These exact strings are the CSV header row and the header the prompt
/// instructs the model to emit.
pub const COLUMNS: [&str; 3] = ["Metric", "06-month (Rs. '000)", "03-month (Rs. '000)"];

/// One data row of the extracted table: a metric name and its two values.
///
/// Values are kept as strings — the source formats numbers with thousands
/// separators and parenthesised negatives, and the contract is exact
/// preservation, not numeric interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub metric: String,
    pub six_month: String,
    pub three_month: String,
}

/// The parsed table plus the canonical markdown text it was built from.
///
/// `canonical_text` is the exact substring matched out of the model reply
/// (header + separator + data rows), byte for byte. `rows` excludes the
/// header and separator lines; every row has exactly 3 cells — the parser
/// rejects anything else, so the invariant holds by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredTable {
    pub canonical_text: String,
    pub rows: Vec<TableRow>,
}

impl StructuredTable {
    /// Number of data rows (header and separator are never counted).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The model's reply, verbatim, with Ollama's token accounting.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelReply {
    /// Assistant message content, untouched.
    pub content: String,
    /// `prompt_eval_count` from the chat response (0 if absent).
    pub input_tokens: u32,
    /// `eval_count` from the chat response (0 if absent).
    pub output_tokens: u32,
}

/// Timing and token accounting for one extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// 1-indexed page that was extracted.
    pub page: usize,
    /// Total pages in the source document.
    pub total_pages: usize,
    /// Time to resolve the input (download for URLs, validation for paths).
    pub fetch_ms: u64,
    /// Time to parse the PDF and pull the page text.
    pub extract_ms: u64,
    /// Time spent waiting on the model.
    pub llm_ms: u64,
    /// Wall-clock time for the whole run.
    pub total_ms: u64,
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// The complete result of one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// The parsed 3-column table.
    pub table: StructuredTable,
    /// The raw model reply the table was matched out of.
    pub reply: ModelReply,
    pub stats: ExtractionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_are_the_documented_header() {
        assert_eq!(COLUMNS[0], "Metric");
        assert_eq!(COLUMNS[1], "06-month (Rs. '000)");
        assert_eq!(COLUMNS[2], "03-month (Rs. '000)");
    }

    #[test]
    fn output_round_trips_through_json() {
        let out = ExtractionOutput {
            table: StructuredTable {
                canonical_text: "| a | b | c |\n|---|---|---|\n| 1 | 2 | 3 |\n".into(),
                rows: vec![TableRow {
                    metric: "1".into(),
                    six_month: "2".into(),
                    three_month: "3".into(),
                }],
            },
            reply: ModelReply {
                content: "…".into(),
                input_tokens: 10,
                output_tokens: 20,
            },
            stats: ExtractionStats::default(),
        };

        let json = serde_json::to_string(&out).expect("must serialise");
        let back: ExtractionOutput = serde_json::from_str(&json).expect("must deserialise");
        assert_eq!(back.table, out.table);
        assert_eq!(back.reply.output_tokens, 20);
    }
}
