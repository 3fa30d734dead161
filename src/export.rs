//! Re-encoding a [`Table`] into a downloadable in-memory file.
//!
//! Both encoders write the header row and no row-index column. The returned
//! [`ExportedFile::buffer`] is rewound to offset 0, ready to be streamed to the client.

use std::fmt;
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use std::str::FromStr;

use rust_xlsxwriter::Workbook;
use serde::{Deserialize, Serialize};

use crate::error::{SweepError, SweepResult};
use crate::types::{Table, Value};

/// MIME type of CSV downloads.
pub const CSV_MIME: &str = "text/csv";
/// MIME type of `.xlsx` downloads.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Target format of a conversion request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
}

impl ExportFormat {
    /// MIME type sent with the download.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Csv => CSV_MIME,
            Self::Excel => XLSX_MIME,
        }
    }

    /// Extension of the output file, with the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => ".csv",
            Self::Excel => ".xlsx",
        }
    }

    /// Lowercase name, as accepted by [`FromStr`](std::str::FromStr).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Excel => "excel",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "excel" | "xlsx" => Ok(Self::Excel),
            other => Err(format!("unknown export format '{other}' (expected csv or excel)")),
        }
    }
}

/// An encoded table ready for download.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    /// `<original stem>.csv` or `<original stem>.xlsx`.
    pub file_name: String,
    pub mime_type: &'static str,
    /// Button caption, e.g. `Download a.csv as EXCEL`.
    pub label: String,
    /// Encoded bytes, positioned at offset 0.
    pub buffer: Cursor<Vec<u8>>,
}

impl ExportedFile {
    /// All encoded bytes, regardless of the buffer position.
    pub fn bytes(&self) -> &[u8] {
        self.buffer.get_ref()
    }

    /// Take the encoded bytes out of the buffer.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.into_inner()
    }
}

/// Output name for `original_name` converted to `format`: the extension is replaced, or
/// appended when the name has none.
pub fn output_file_name(original_name: &str, format: ExportFormat) -> String {
    let path = Path::new(original_name);
    let stem = match path.extension() {
        Some(_) => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        None => path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| original_name.to_owned()),
    };
    format!("{stem}{}", format.extension())
}

/// Encode `table` as `format` into an in-memory buffer named after `original_name`.
///
/// ```rust
/// use std::io::Read;
///
/// use data_sweeper::export::{export_table, ExportFormat};
/// use data_sweeper::types::{DataType, Field, Schema, Table, Value};
///
/// let table = Table::new(
///     Schema::new(vec![
///         Field::new("name", DataType::Utf8),
///         Field::new("val", DataType::Int64),
///     ]),
///     vec![
///         vec![Value::Utf8("x".into()), Value::Int64(1)],
///         vec![Value::Utf8("y".into()), Value::Null],
///     ],
/// );
/// let mut out = export_table(&table, "a.xlsx", ExportFormat::Csv).unwrap();
/// assert_eq!(out.file_name, "a.csv");
///
/// let mut text = String::new();
/// out.buffer.read_to_string(&mut text).unwrap();
/// assert_eq!(text, "name,val\nx,1\ny,\n");
/// ```
pub fn export_table(table: &Table, original_name: &str, format: ExportFormat) -> SweepResult<ExportedFile> {
    let mut buffer = Cursor::new(Vec::new());
    match format {
        ExportFormat::Csv => write_csv(table, &mut buffer)?,
        ExportFormat::Excel => buffer.write_all(&encode_xlsx(table)?)?,
    }
    buffer.rewind()?;

    let file_name = output_file_name(original_name, format);
    tracing::info!(
        file = %original_name,
        output = %file_name,
        format = %format,
        bytes = buffer.get_ref().len(),
        "exported table"
    );

    Ok(ExportedFile {
        label: format!(
            "Download {original_name} as {}",
            format.as_str().to_ascii_uppercase()
        ),
        file_name,
        mime_type: format.mime_type(),
        buffer,
    })
}

/// Write `table` as CSV (header row, no index column) to `writer`.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> SweepResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if table.column_count() > 0 {
        wtr.write_record(table.schema.field_names())?;
        for row in &table.rows {
            wtr.write_record(row.iter().map(|v| v.to_string()))?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Encode `table` as a single-sheet `.xlsx` workbook (header row, no index column).
///
/// Missing values and NaN become blank cells; infinities are written as text.
pub fn encode_xlsx(table: &Table) -> SweepResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (c, name) in table.schema.field_names().enumerate() {
        sheet.write_string(0, sheet_col(c)?, name)?;
    }

    for (r, row) in table.rows.iter().enumerate() {
        let row_num = sheet_row(r + 1)?;
        for (c, value) in row.iter().enumerate() {
            let col = sheet_col(c)?;
            match value {
                Value::Null => {}
                Value::Int64(i) => {
                    sheet.write_number(row_num, col, *i as f64)?;
                }
                Value::Float64(f) if f.is_nan() => {}
                Value::Float64(f) if f.is_infinite() => {
                    sheet.write_string(row_num, col, value.to_string())?;
                }
                Value::Float64(f) => {
                    sheet.write_number(row_num, col, *f)?;
                }
                Value::Bool(b) => {
                    sheet.write_boolean(row_num, col, *b)?;
                }
                Value::Utf8(s) => {
                    sheet.write_string(row_num, col, s)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn sheet_row(idx: usize) -> SweepResult<u32> {
    u32::try_from(idx).map_err(|_| SweepError::Malformed {
        message: format!("row {idx} exceeds the worksheet row limit"),
    })
}

fn sheet_col(idx: usize) -> SweepResult<u16> {
    u16::try_from(idx).map_err(|_| SweepError::Malformed {
        message: format!("column {idx} exceeds the worksheet column limit"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema};

    fn sample_table() -> Table {
        let schema = Schema::new(vec![
            Field::new("name", DataType::Utf8),
            Field::new("val", DataType::Float64),
            Field::new("ok", DataType::Bool),
        ]);
        Table::new(
            schema,
            vec![
                vec![Value::Utf8("x, y".to_string()), Value::Float64(2.0), Value::Bool(true)],
                vec![Value::Utf8("z".to_string()), Value::Null, Value::Bool(false)],
            ],
        )
    }

    #[test]
    fn output_name_replaces_extension() {
        assert_eq!(output_file_name("a.csv", ExportFormat::Excel), "a.xlsx");
        assert_eq!(output_file_name("a.xlsx", ExportFormat::Csv), "a.csv");
        assert_eq!(output_file_name("sales.2024.CSV", ExportFormat::Csv), "sales.2024.csv");
        assert_eq!(output_file_name("noext", ExportFormat::Csv), "noext.csv");
    }

    #[test]
    fn format_parses_from_radio_values() {
        assert_eq!("csv".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("Excel".parse::<ExportFormat>(), Ok(ExportFormat::Excel));
        assert!("pdf".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn csv_has_header_no_index_and_quotes_commas() {
        let mut buf = Vec::new();
        write_csv(&sample_table(), &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "name,val,ok\n\"x, y\",2.0,True\nz,,False\n"
        );
    }

    #[test]
    fn csv_export_metadata_and_rewound_buffer() {
        let out = export_table(&sample_table(), "a.xlsx", ExportFormat::Csv).unwrap();
        assert_eq!(out.file_name, "a.csv");
        assert_eq!(out.mime_type, "text/csv");
        assert_eq!(out.label, "Download a.xlsx as CSV");
        assert_eq!(out.buffer.position(), 0);
        assert!(out.bytes().starts_with(b"name,val,ok\n"));
    }

    #[test]
    fn excel_export_is_a_zip_container() {
        let out = export_table(&sample_table(), "a.csv", ExportFormat::Excel).unwrap();
        assert_eq!(out.file_name, "a.xlsx");
        assert_eq!(out.mime_type, XLSX_MIME);
        assert_eq!(out.label, "Download a.csv as EXCEL");
        assert_eq!(out.buffer.position(), 0);
        assert!(out.bytes().starts_with(b"PK"));
    }
}
