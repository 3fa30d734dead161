//! One batch pass over uploaded files: ingest → clean → select → chart → export.
//!
//! [`run_batch`] mirrors a UI that re-runs everything on each interaction. Every file is
//! rebuilt from its bytes, the commands for that file are applied, and results plus
//! user-facing [`Notification`]s are returned. Nothing is kept between passes; see
//! [`crate::session::Session`] for the stateful alternative.
//!
//! Failures never cross a file boundary: an unsupported or unreadable file produces an error
//! notification and the pass moves on to the next file.

use std::collections::HashMap;

use serde::Serialize;

use crate::chart::BarChart;
use crate::error::{SweepError, SweepResult};
use crate::export::{export_table, ExportFormat, ExportedFile};
use crate::ingestion::{ingest_upload, IngestedFile, IngestionOptions, UploadedFile};
use crate::processing::{fill_missing_with_mean, remove_duplicates, select_columns};
use crate::types::Table;

/// Rows shown in a file preview.
pub const PREVIEW_ROWS: usize = 5;

/// Warning for a batch with no uploads.
pub const NO_FILES_MESSAGE: &str = "Please upload at least one CSV or Excel file.";
/// Success message after duplicate removal.
pub const DUPLICATES_REMOVED_MESSAGE: &str = "Duplicates removed successfully!";
/// Success message after mean imputation.
pub const MISSING_FILLED_MESSAGE: &str = "Missing values filled with column mean!";
/// Emitted at the end of every non-empty batch, even when some files failed.
pub const BATCH_DONE_MESSAGE: &str = "All files processed successfully!";

/// How a notification should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A user-facing message produced by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NoticeLevel,
    /// File the message is about; `None` for batch-level messages.
    pub file: Option<String>,
    pub message: String,
}

impl Notification {
    /// Build a notification and log it through `tracing` at the matching level.
    pub fn new(level: NoticeLevel, file: Option<&str>, message: impl Into<String>) -> Self {
        let note = Self {
            level,
            file: file.map(str::to_owned),
            message: message.into(),
        };
        note.trace();
        note
    }

    /// Shorthand for [`NoticeLevel::Success`].
    pub fn success(file: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, file, message)
    }

    /// Shorthand for [`NoticeLevel::Warning`].
    pub fn warning(file: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, file, message)
    }

    /// Shorthand for [`NoticeLevel::Error`].
    pub fn error(file: Option<&str>, message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, file, message)
    }

    /// Error notification for a file that failed to load or process.
    pub fn for_error(file_name: &str, err: &SweepError) -> Self {
        let message = match err {
            SweepError::UnsupportedFormat { .. } => err.to_string(),
            e if e.is_decode_failure() => format!("Error reading file {file_name}: {e}"),
            e => format!("Error processing file {file_name}: {e}"),
        };
        Self::error(Some(file_name), message)
    }

    fn trace(&self) {
        let file = self.file.as_deref().unwrap_or("-");
        match self.level {
            NoticeLevel::Info | NoticeLevel::Success => {
                tracing::info!(file, message = %self.message, "notification")
            }
            NoticeLevel::Warning => tracing::warn!(file, message = %self.message, "notification"),
            NoticeLevel::Error => tracing::error!(file, message = %self.message, "notification"),
        }
    }
}

/// User triggers for one file during one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCommands {
    /// Cleaning options are enabled; the two cleaning triggers are ignored without it.
    pub clean: bool,
    /// Drop exact duplicate rows.
    pub remove_duplicates: bool,
    /// Fill missing numeric cells with the column mean.
    pub fill_missing: bool,
    /// Columns to keep, in order. `None` keeps every column.
    pub columns: Option<Vec<String>>,
    /// Build a bar chart of the projected table.
    pub show_chart: bool,
    /// Convert and offer a download in this format.
    pub export: Option<ExportFormat>,
}

/// Configuration for one [`run_batch`] pass.
#[derive(Debug, Clone, Default)]
pub struct BatchRequest {
    pub ingestion: IngestionOptions,
    /// Per-file commands keyed by upload name. Files without an entry get the defaults.
    pub commands: HashMap<String, FileCommands>,
}

impl BatchRequest {
    /// Set the commands for the upload named `file_name`.
    pub fn with_commands(mut self, file_name: impl Into<String>, commands: FileCommands) -> Self {
        self.commands.insert(file_name.into(), commands);
        self
    }

    fn commands_for(&self, file_name: &str) -> FileCommands {
        self.commands.get(file_name).cloned().unwrap_or_default()
    }
}

/// Everything produced for one successfully loaded file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub file_name: String,
    /// First [`PREVIEW_ROWS`] rows as loaded, before cleaning.
    pub preview: Table,
    /// The table after cleaning and column selection.
    pub table: Table,
    pub chart: Option<BarChart>,
    pub export: Option<ExportedFile>,
}

/// Result of a [`run_batch`] pass.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub files: Vec<FileOutcome>,
    /// Notifications in the order they were raised.
    pub notifications: Vec<Notification>,
}

impl BatchReport {
    /// Outcome for a loaded file; `None` when it failed or was not uploaded.
    pub fn file(&self, file_name: &str) -> Option<&FileOutcome> {
        self.files.iter().find(|f| f.file_name == file_name)
    }

    /// Error notifications, in order.
    pub fn errors(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter().filter(|n| n.level == NoticeLevel::Error)
    }
}

/// Run one pass over `files`, sequentially and independently per file.
///
/// ```rust
/// use data_sweeper::export::ExportFormat;
/// use data_sweeper::ingestion::UploadedFile;
/// use data_sweeper::pipeline::{run_batch, BatchRequest, FileCommands};
///
/// let files = vec![
///     UploadedFile::new("a.csv", "name,val\nx,1\nx,1\ny,2\n"),
///     UploadedFile::new("b.txt", "ignored"),
/// ];
/// let request = BatchRequest::default().with_commands(
///     "a.csv",
///     FileCommands {
///         clean: true,
///         remove_duplicates: true,
///         export: Some(ExportFormat::Excel),
///         ..Default::default()
///     },
/// );
///
/// let report = run_batch(&files, &request);
/// let a = report.file("a.csv").unwrap();
/// assert_eq!(a.table.row_count(), 2);
/// assert_eq!(a.export.as_ref().unwrap().file_name, "a.xlsx");
/// assert_eq!(report.errors().next().unwrap().message, "Unsupported file type: .txt");
/// ```
pub fn run_batch(files: &[UploadedFile], request: &BatchRequest) -> BatchReport {
    let mut report = BatchReport::default();
    if files.is_empty() {
        report.notifications.push(Notification::warning(None, NO_FILES_MESSAGE));
        return report;
    }

    for file in files {
        let ingested = match ingest_upload(file, &request.ingestion) {
            Ok(ingested) => ingested,
            Err(e) => {
                report.notifications.push(Notification::for_error(&file.name, &e));
                continue;
            }
        };

        let commands = request.commands_for(&file.name);
        match process_file(ingested, &commands, &mut report.notifications) {
            Ok(outcome) => report.files.push(outcome),
            Err(e) => report.notifications.push(Notification::for_error(&file.name, &e)),
        }
    }

    report.notifications.push(Notification::success(None, BATCH_DONE_MESSAGE));
    tracing::info!(
        files = files.len(),
        loaded = report.files.len(),
        "batch pass finished"
    );
    report
}

fn process_file(
    ingested: IngestedFile,
    commands: &FileCommands,
    notes: &mut Vec<Notification>,
) -> SweepResult<FileOutcome> {
    let IngestedFile {
        file_name,
        mut table,
        ..
    } = ingested;
    let preview = table.head(PREVIEW_ROWS);

    if commands.clean {
        if commands.remove_duplicates {
            remove_duplicates(&mut table);
            notes.push(Notification::success(Some(&file_name), DUPLICATES_REMOVED_MESSAGE));
        }
        if commands.fill_missing {
            fill_missing_with_mean(&mut table);
            notes.push(Notification::success(Some(&file_name), MISSING_FILLED_MESSAGE));
        }
    }

    if let Some(columns) = &commands.columns {
        table = select_columns(&table, columns)?;
    }

    let chart = commands.show_chart.then(|| BarChart::from_table(&table));
    let export = commands
        .export
        .map(|format| export_table(&table, &file_name, format))
        .transpose()?;

    Ok(FileOutcome {
        file_name,
        preview,
        table,
        chart,
        export,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batch_warns_and_stops() {
        let report = run_batch(&[], &BatchRequest::default());
        assert!(report.files.is_empty());
        assert_eq!(
            report.notifications,
            vec![Notification {
                level: NoticeLevel::Warning,
                file: None,
                message: NO_FILES_MESSAGE.to_string(),
            }]
        );
    }

    #[test]
    fn cleaning_triggers_need_clean_enabled() {
        let files = vec![UploadedFile::new("a.csv", "v\n1\n1\n")];
        let request = BatchRequest::default().with_commands(
            "a.csv",
            FileCommands {
                remove_duplicates: true,
                ..Default::default()
            },
        );
        let report = run_batch(&files, &request);
        assert_eq!(report.file("a.csv").unwrap().table.row_count(), 2);
        assert_eq!(report.notifications.len(), 1);
        assert_eq!(report.notifications[0].message, BATCH_DONE_MESSAGE);
    }

    #[test]
    fn file_without_extension_reports_empty_type() {
        let files = vec![UploadedFile::new("README", "x")];
        let report = run_batch(&files, &BatchRequest::default());
        let err = report.errors().next().unwrap();
        assert_eq!(err.message, "Unsupported file type: ");
        assert_eq!(err.file.as_deref(), Some("README"));
    }

    #[test]
    fn decode_failure_names_the_file() {
        let files = vec![UploadedFile::new("broken.xlsx", "not a workbook")];
        let report = run_batch(&files, &BatchRequest::default());
        let err = report.errors().next().unwrap();
        assert_eq!(err.file.as_deref(), Some("broken.xlsx"));
        assert!(err.message.starts_with("Error reading file broken.xlsx: "));
    }

    #[test]
    fn unknown_selected_column_skips_only_that_file() {
        let files = vec![
            UploadedFile::new("a.csv", "x\n1\n"),
            UploadedFile::new("b.csv", "y\n2\n"),
        ];
        let request = BatchRequest::default().with_commands(
            "a.csv",
            FileCommands {
                columns: Some(vec!["nope".to_string()]),
                ..Default::default()
            },
        );
        let report = run_batch(&files, &request);
        assert!(report.file("a.csv").is_none());
        assert!(report.file("b.csv").is_some());
        assert_eq!(
            report.errors().next().unwrap().message,
            "Error processing file a.csv: column 'nope' not found"
        );
    }

    #[test]
    fn preview_is_taken_before_cleaning() {
        let files = vec![UploadedFile::new("a.csv", "v\n1\n1\n1\n")];
        let request = BatchRequest::default().with_commands(
            "a.csv",
            FileCommands {
                clean: true,
                remove_duplicates: true,
                ..Default::default()
            },
        );
        let report = run_batch(&files, &request);
        let out = report.file("a.csv").unwrap();
        assert_eq!(out.preview.row_count(), 3);
        assert_eq!(out.table.row_count(), 1);
    }
}
