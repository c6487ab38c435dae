//! Export: serialise a [`StructuredTable`] as markdown and CSV.
//!
//! The two serialisations are deliberately independent views of the same
//! rows:
//!
//! - **Markdown** is the canonical table text exactly as matched out of the
//!   model reply — byte-identical, so what the user downloads is what the
//!   model wrote.
//! - **CSV** is rebuilt from the parsed rows with a fixed header; the
//!   writer quotes only where needed, so comma-grouped numerics come out
//!   quoted and plain metric names do not.
//!
//! Both are pure functions of the table, so exporting twice yields
//! byte-identical output.

use crate::error::ExtractError;
use crate::output::{StructuredTable, COLUMNS};
use std::path::Path;
use tracing::info;

/// Default markdown artifact filename.
pub const MD_FILENAME: &str = "structured_table.md";

/// Default CSV artifact filename.
pub const CSV_FILENAME: &str = "structured_table.csv";

/// The markdown serialisation: the canonical table text, untouched.
pub fn to_markdown(table: &StructuredTable) -> &str {
    &table.canonical_text
}

/// The CSV serialisation: fixed 3-column header plus one record per row.
pub fn to_csv(table: &StructuredTable) -> Result<String, ExtractError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(COLUMNS)
        .and_then(|_| {
            table.rows.iter().try_for_each(|row| {
                writer.write_record([
                    row.metric.as_str(),
                    row.six_month.as_str(),
                    row.three_month.as_str(),
                ])
            })
        })
        .map_err(|e| ExtractError::Internal(format!("CSV serialisation: {}", e)))?;

    let bytes = writer
        .into_inner()
        .map_err(|e| ExtractError::Internal(format!("CSV flush: {}", e)))?;

    String::from_utf8(bytes).map_err(|e| ExtractError::Internal(format!("CSV encoding: {}", e)))
}

/// Write the markdown serialisation to `path` atomically.
pub async fn write_markdown(table: &StructuredTable, path: &Path) -> Result<(), ExtractError> {
    write_atomic(path, table.canonical_text.as_bytes()).await?;
    info!("Wrote markdown table to {}", path.display());
    Ok(())
}

/// Write the CSV serialisation to `path` atomically.
pub async fn write_csv(table: &StructuredTable, path: &Path) -> Result<(), ExtractError> {
    let csv = to_csv(table)?;
    write_atomic(path, csv.as_bytes()).await?;
    info!("Wrote CSV table to {}", path.display());
    Ok(())
}

/// Atomic write: temp file + rename, so a failed run never leaves a
/// partial artifact at the destination.
async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), ExtractError> {
    let write_err = |source: std::io::Error| ExtractError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
        }
    }

    let ext = path
        .extension()
        .map(|e| format!("{}.tmp", e.to_string_lossy()))
        .unwrap_or_else(|| "tmp".to_string());
    let tmp_path = path.with_extension(ext);

    tokio::fs::write(&tmp_path, bytes).await.map_err(write_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_err)?;

    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::table::parse_table;

    const REVENUE_TABLE: &str = "| Metric | 06-month (Rs. '000) | 03-month (Rs. '000) |\n\
                                 |---|---|---|\n\
                                 | Revenue | 40,463,469 | 21,277,143 |\n";

    fn revenue_table() -> StructuredTable {
        parse_table(REVENUE_TABLE).unwrap()
    }

    #[test]
    fn markdown_is_byte_identical_to_the_canonical_text() {
        assert_eq!(to_markdown(&revenue_table()), REVENUE_TABLE);
    }

    #[test]
    fn csv_matches_the_documented_shape() {
        // Comma-grouped values must be quoted; the header must not be.
        let csv = to_csv(&revenue_table()).unwrap();
        assert_eq!(
            csv,
            "Metric,06-month (Rs. '000),03-month (Rs. '000)\n\
             Revenue,\"40,463,469\",\"21,277,143\"\n"
        );
    }

    #[test]
    fn csv_has_no_index_column() {
        let csv = to_csv(&revenue_table()).unwrap();
        assert!(csv.lines().all(|l| !l.starts_with(',') && !l.starts_with('0')));
    }

    #[test]
    fn export_is_idempotent() {
        let table = revenue_table();
        assert_eq!(to_markdown(&table), to_markdown(&table));
        assert_eq!(to_csv(&table).unwrap(), to_csv(&table).unwrap());
    }

    #[test]
    fn csv_round_trips_the_triples_in_order() {
        let canonical = "| Metric | 06-month (Rs. '000) | 03-month (Rs. '000) |\n\
                         |---|---|---|\n\
                         | Revenue | 40,463,469 | 21,277,143 |\n\
                         | Cost of sales | (32,551,694) | (17,219,317) |\n\
                         | EPS | 10.02 | 5.27 |\n";
        let table = parse_table(canonical).unwrap();
        let csv = to_csv(&table).unwrap();

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers, csv::StringRecord::from(COLUMNS.to_vec()));

        let records: Vec<csv::StringRecord> =
            reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), table.rows.len());
        for (record, row) in records.iter().zip(&table.rows) {
            assert_eq!(&record[0], row.metric.as_str());
            assert_eq!(&record[1], row.six_month.as_str());
            assert_eq!(&record[2], row.three_month.as_str());
        }
    }

    #[tokio::test]
    async fn files_are_written_with_the_exact_serialisations() {
        let dir = tempfile::tempdir().unwrap();
        let md_path = dir.path().join(MD_FILENAME);
        let csv_path = dir.path().join(CSV_FILENAME);

        let table = revenue_table();
        write_markdown(&table, &md_path).await.unwrap();
        write_csv(&table, &csv_path).await.unwrap();

        assert_eq!(std::fs::read_to_string(&md_path).unwrap(), REVENUE_TABLE);
        assert_eq!(
            std::fs::read_to_string(&csv_path).unwrap(),
            to_csv(&table).unwrap()
        );

        // No leftover temp files
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|x| x.to_string_lossy().ends_with("tmp")))
            .collect();
        assert!(leftovers.is_empty(), "temp files left behind: {leftovers:?}");
    }

    #[tokio::test]
    async fn write_into_missing_directory_creates_it() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out/reports").join(MD_FILENAME);
        write_markdown(&revenue_table(), &nested).await.unwrap();
        assert!(nested.exists());
    }
}
