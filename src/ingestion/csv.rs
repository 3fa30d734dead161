//! CSV ingestion implementation.

use std::io::Read;

use crate::error::{SweepError, SweepResult};
use crate::types::Table;

use super::infer::{assemble_table, normalize_headers, Cell, NaValues};

/// Decode CSV bytes into an in-memory [`Table`].
///
/// Rules:
///
/// - The first record is the header row (blank/duplicate names are normalized).
/// - Blank lines are skipped.
/// - Rows shorter than the header are padded with missing values; longer rows are rejected.
/// - Column types are inferred from the cells (see [`crate::ingestion`]).
pub fn ingest_csv_from_bytes(bytes: &[u8], na: &NaValues) -> SweepResult<Table> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);
    ingest_csv_from_reader(&mut rdr, na)
}

/// Decode CSV data from an existing CSV reader.
///
/// The reader should be built with `has_headers(false)` and `flexible(true)`; the header row is
/// taken from the first record so header normalization and ragged-row checks happen here.
pub fn ingest_csv_from_reader<R: Read>(rdr: &mut csv::Reader<R>, na: &NaValues) -> SweepResult<Table> {
    let mut records = rdr.records();

    let header = match records.next() {
        Some(record) => record?,
        None => {
            return Err(SweepError::Malformed {
                message: "No columns to parse from file".to_string(),
            });
        }
    };
    let raw_headers: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(idx, h)| {
            if idx == 0 {
                h.trim_start_matches('\u{feff}').to_owned()
            } else {
                h.to_owned()
            }
        })
        .collect();
    let width = raw_headers.len();
    let headers = normalize_headers(raw_headers);

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for result in records {
        let record = result?;
        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(SweepError::Malformed {
                message: format!(
                    "Expected {width} fields in line {line}, saw {}",
                    record.len()
                ),
            });
        }
        rows.push(record.iter().map(|raw| Cell::parse_text(raw, na)).collect());
    }

    Ok(assemble_table(headers, rows))
}
