//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest_upload`], which decodes an [`UploadedFile`] into an
//! in-memory [`crate::types::Table`].
//!
//! - If [`IngestionOptions::format`] is `None`, the format is inferred from the file extension.
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{SweepError, SweepResult};
use crate::types::Table;

use super::infer::{NaValues, DEFAULT_NA_VALUES};
use super::observability::{report_outcome, IngestionContext, IngestionObserver, IngestionSeverity};
use super::{csv, excel};

/// Supported ingestion formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// Office Open XML workbook.
    Excel,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive, with or without the
    /// leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// How to choose the sheet when ingesting a workbook.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExcelSheetSelection {
    /// Ingest the first sheet (default).
    #[default]
    First,
    /// Ingest a single named sheet.
    Sheet(String),
}

/// Raw upload handed over by the UI layer: declared filename plus byte content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Declared filename; its extension selects the decoder.
    pub name: String,
    /// Raw file content.
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Wrap in-memory content under a declared name.
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, using its file name as the declared name.
    pub fn from_path(path: impl AsRef<Path>) -> SweepResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    /// Lowercased extension including the dot (`.csv`), or `""` when the name has none.
    pub fn extension(&self) -> String {
        file_extension(&self.name)
    }
}

/// Lowercased extension of `name` including the dot, or `""` when there is none.
///
/// Dotfiles such as `.env` have no extension.
pub fn file_extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|s| s.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default()
}

/// Options controlling unified ingestion behavior.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from the file extension.
    pub format: Option<IngestionFormat>,
    /// Workbook-specific options.
    pub excel_sheet_selection: ExcelSheetSelection,
    /// Cell texts decoded as missing values.
    pub na_values: Vec<String>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("excel_sheet_selection", &self.excel_sheet_selection)
            .field("na_values", &self.na_values)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            excel_sheet_selection: ExcelSheetSelection::default(),
            na_values: DEFAULT_NA_VALUES.iter().map(|s| s.to_string()).collect(),
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// A successfully decoded upload.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestedFile {
    /// Declared name of the upload.
    pub file_name: String,
    /// Lowercased extension including the dot.
    pub extension: String,
    pub format: IngestionFormat,
    pub table: Table,
}

/// Unified ingestion entry point for uploads.
///
/// - If `options.format` is `None`, format is inferred from the file extension; anything other
///   than `.csv`/`.xlsx` fails with [`SweepError::UnsupportedFormat`] before any decoding.
/// - Use `options.excel_sheet_selection` to read a sheet other than the first.
///
/// When an observer is configured, this function reports:
///
/// - `on_success` on success, with row/column stats
/// - `on_failure` on decode failure, with a computed severity
/// - `on_alert` on failure when the computed severity is >= `options.alert_at_or_above`
///
/// # Examples
///
/// ```rust
/// use data_sweeper::ingestion::{ingest_upload, IngestionOptions, UploadedFile};
///
/// # fn main() -> Result<(), data_sweeper::SweepError> {
/// let upload = UploadedFile::new("people.csv", "id,name\n1,Ada\n2,Grace\n");
/// let ingested = ingest_upload(&upload, &IngestionOptions::default())?;
/// assert_eq!(ingested.table.row_count(), 2);
/// assert_eq!(ingested.extension, ".csv");
/// # Ok(())
/// # }
/// ```
pub fn ingest_upload(file: &UploadedFile, options: &IngestionOptions) -> SweepResult<IngestedFile> {
    let extension = file.extension();
    let format = match options.format {
        Some(f) => f,
        None => IngestionFormat::from_extension(&extension).ok_or_else(|| SweepError::UnsupportedFormat {
            extension: extension.clone(),
        })?,
    };

    let ctx = IngestionContext {
        file_name: file.name.clone(),
        format,
    };

    let na = NaValues::new(options.na_values.iter().cloned());
    let result = match format {
        IngestionFormat::Csv => csv::ingest_csv_from_bytes(&file.bytes, &na),
        IngestionFormat::Excel => {
            let sheet = match &options.excel_sheet_selection {
                ExcelSheetSelection::First => None,
                ExcelSheetSelection::Sheet(name) => Some(name.as_str()),
            };
            excel::ingest_xlsx_from_bytes(&file.bytes, sheet, &na)
        }
    };

    if let Some(obs) = options.observer.as_deref() {
        report_outcome(obs, &ctx, &result, options.alert_at_or_above);
    }

    Ok(IngestedFile {
        file_name: file.name.clone(),
        extension,
        format,
        table: result?,
    })
}
