//! Workbook (`.xlsx`) ingestion implementation.

use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};

use crate::error::{SweepError, SweepResult};
use crate::types::Table;

use super::infer::{assemble_table, normalize_headers, Cell, CellKind, NaValues};

/// Decode an `.xlsx` workbook held in memory into a [`Table`].
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Reads remaining rows; numeric cells holding whole numbers count as integers
/// - Error cells (`#N/A`, `#DIV/0!`, ...) and NA-token strings become missing values
/// - A sheet with no non-empty rows yields an empty table
pub fn ingest_xlsx_from_bytes(bytes: &[u8], sheet_name: Option<&str>, na: &NaValues) -> SweepResult<Table> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let sheet = match sheet_name {
        Some(name) => name.to_owned(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| SweepError::Malformed {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    Ok(ingest_sheet_range(&range, na))
}

fn ingest_sheet_range(range: &Range<Data>, na: &NaValues) -> Table {
    let mut rows = range
        .rows()
        .skip_while(|row| row.iter().all(|c| matches!(c, Data::Empty)));

    let Some(header_row) = rows.next() else {
        return Table::default();
    };
    let headers = normalize_headers(header_row.iter().map(cell_to_header_string).collect());

    let body: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(|c| classify_cell(c, na)).collect())
        .collect();

    assemble_table(headers, body)
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(f) => f.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("{e:?}"),
        Data::Empty => "".to_string(),
    }
}

fn classify_cell(c: &Data, na: &NaValues) -> Cell {
    match c {
        Data::Empty | Data::Error(_) => Cell::missing(),
        Data::Int(i) => Cell::new(CellKind::Int(*i), i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                let i = *f as i64;
                Cell::new(CellKind::Int(i), i.to_string())
            } else {
                Cell::new(CellKind::Float(*f), f.to_string())
            }
        }
        Data::Bool(b) => Cell::new(CellKind::Bool(*b), if *b { "True" } else { "False" }),
        Data::String(s) => {
            if na.contains(s) {
                Cell::missing()
            } else {
                // Workbook strings stay text even when they look numeric.
                Cell::new(CellKind::Text, s.clone())
            }
        }
        Data::DateTime(d) => Cell::new(CellKind::Text, d.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::new(CellKind::Text, s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use calamine::CellErrorType;

    use super::*;

    #[test]
    fn whole_floats_classify_as_integers() {
        let na = NaValues::default();
        assert_eq!(classify_cell(&Data::Float(3.0), &na).kind, CellKind::Int(3));
        assert_eq!(classify_cell(&Data::Float(3.5), &na).kind, CellKind::Float(3.5));
    }

    #[test]
    fn na_strings_and_empty_cells_are_missing() {
        let na = NaValues::default();
        assert_eq!(classify_cell(&Data::String("NA".to_string()), &na).kind, CellKind::Missing);
        assert_eq!(classify_cell(&Data::Empty, &na).kind, CellKind::Missing);
        assert_eq!(classify_cell(&Data::String("7".to_string()), &na).kind, CellKind::Text);
    }

    #[test]
    fn error_cells_are_missing() {
        let na = NaValues::default();
        for err in [CellErrorType::NA, CellErrorType::Div0, CellErrorType::Ref] {
            assert_eq!(classify_cell(&Data::Error(err), &na).kind, CellKind::Missing);
        }
    }

    #[test]
    fn garbage_bytes_fail_to_open() {
        let err = ingest_xlsx_from_bytes(b"definitely not a zip archive", None, &NaValues::default()).unwrap_err();
        assert!(err.is_decode_failure());
    }
}
