//! The prompt template for reformatting page text into a financial table.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — tightening a rule or changing the table
//!    shape requires editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the built prompt directly
//!    without a live model, so prompt regressions are caught cheaply.
//!
//! Callers can override the template via
//! [`crate::config::ExtractionConfig::prompt_template`]; the constant here
//! is used only when no override is provided.

/// Placeholder substituted with the extracted page text.
pub const PAGE_TEXT_SLOT: &str = "{page_text}";

/// Default prompt template.
///
/// The rules are enforced by instruction only — nothing downstream verifies
/// that the model actually restricted itself to 2024 data or preserved
/// values exactly. The strict table parser catches shape violations; content
/// violations are the model's to make.
pub const DEFAULT_PROMPT_TEMPLATE: &str = r#"You are a financial data expert. Convert this complex table into a clean markdown format with:
1. SINGLE header row: | Metric | 06-month (Rs. '000) | 03-month (Rs. '000) |
2. ONE row per metric with all corresponding values
3. Negative values in parentheses
4. Remove duplicate headers
5. Preserve exact values from source
6. Extract only data related to the year 2024
7. Extract all relevant metrics, including revenue, expenses, profits, tax, and dividends
8. Reject any data from previous years
9. Always get correct numerical value

Rules:
1. Include ALL metrics from the source table for the year 2024 only
2. Preserve exact numerical formatting
3. Maintain original metric names
4. Include final metrics like EPS and Dividends

Example format:
| Metric | 06-month (Rs. '000) | 03-month (Rs. '000) |
|---|---|---|
| Revenue from contracts (2024) | 40,463,469 | 21,277,143 |

Source text:
{page_text}
"#;

/// Build the prompt by substituting the page text into the template.
///
/// The page text goes in verbatim — pipe characters are not escaped, so a
/// page whose text contains `|` can mislead the model into emitting rows
/// the strict parser will reject.
pub fn build_prompt(template: &str, page_text: &str) -> String {
    template.replace(PAGE_TEXT_SLOT, page_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_has_exactly_one_slot() {
        assert_eq!(DEFAULT_PROMPT_TEMPLATE.matches(PAGE_TEXT_SLOT).count(), 1);
    }

    #[test]
    fn build_embeds_the_page_text() {
        let prompt = build_prompt(DEFAULT_PROMPT_TEMPLATE, "Revenue  40,463,469  21,277,143");
        assert!(prompt.contains("Revenue  40,463,469"));
        assert!(!prompt.contains(PAGE_TEXT_SLOT));
    }

    #[test]
    fn default_template_states_the_header_and_terminal_metrics() {
        assert!(DEFAULT_PROMPT_TEMPLATE.contains("| Metric | 06-month (Rs. '000) | 03-month (Rs. '000) |"));
        assert!(DEFAULT_PROMPT_TEMPLATE.contains("EPS and Dividends"));
        assert!(DEFAULT_PROMPT_TEMPLATE.contains("year 2024"));
    }

    #[test]
    fn pipes_in_page_text_are_not_escaped() {
        let prompt = build_prompt(DEFAULT_PROMPT_TEMPLATE, "a | b | c");
        assert!(prompt.contains("a | b | c"));
    }
}
