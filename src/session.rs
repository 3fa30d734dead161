//! Explicit per-session state.
//!
//! A [`Session`] keeps one [`FileSession`] per uploaded file: the table as loaded, the current
//! (cleaned) table, the current column selection and a log of applied operations. Discrete
//! commands mutate that state, so cleaning survives later interactions until the file is
//! re-uploaded or [`Session::reset`] is called.
//!
//! Cleaning always runs on the full current table; the column selection is a view applied when
//! the table is read, charted or exported.

use serde::Serialize;

use crate::chart::BarChart;
use crate::error::{SweepError, SweepResult};
use crate::export::{export_table, ExportFormat, ExportedFile};
use crate::ingestion::{ingest_upload, IngestionOptions, UploadedFile};
use crate::pipeline::{
    Notification, BATCH_DONE_MESSAGE, DUPLICATES_REMOVED_MESSAGE, MISSING_FILLED_MESSAGE, NO_FILES_MESSAGE,
};
use crate::processing::{fill_missing_with_mean, remove_duplicates, select_columns};
use crate::types::Table;

/// An operation applied to a file's table, as recorded in its log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Duplicate rows dropped.
    RemoveDuplicates { removed: usize },
    /// Missing numeric cells filled with column means.
    FillMissing { filled: usize },
    /// Column selection replaced.
    SelectColumns { columns: Vec<String> },
}

/// State of one uploaded file.
#[derive(Debug, Clone)]
pub struct FileSession {
    pub file_name: String,
    /// Lowercased extension including the dot.
    pub extension: String,
    original: Table,
    table: Table,
    selection: Option<Vec<String>>,
    log: Vec<Operation>,
}

impl FileSession {
    /// Table as decoded from the upload.
    pub fn original(&self) -> &Table {
        &self.original
    }

    /// Current table with every column, after cleaning.
    pub fn cleaned(&self) -> &Table {
        &self.table
    }

    /// Selected columns, or `None` when every column is kept.
    pub fn selection(&self) -> Option<&[String]> {
        self.selection.as_deref()
    }

    /// Applied operations, oldest first.
    pub fn log(&self) -> &[Operation] {
        &self.log
    }

    /// Current table with the column selection applied.
    pub fn current(&self) -> SweepResult<Table> {
        match &self.selection {
            Some(columns) => select_columns(&self.table, columns),
            None => Ok(self.table.clone()),
        }
    }
}

/// Uploaded files and their state for one user.
#[derive(Debug, Default)]
pub struct Session {
    options: IngestionOptions,
    files: Vec<FileSession>,
}

impl Session {
    /// Empty session decoding uploads with `options`.
    pub fn new(options: IngestionOptions) -> Self {
        Self {
            options,
            files: Vec::new(),
        }
    }

    /// Load a batch of uploads.
    ///
    /// Each file is decoded on its own; failures become error notifications and the file is
    /// skipped. A file whose name is already loaded is replaced with fresh state.
    pub fn upload(&mut self, uploads: &[UploadedFile]) -> Vec<Notification> {
        if uploads.is_empty() {
            return vec![Notification::warning(None, NO_FILES_MESSAGE)];
        }

        let mut notes = Vec::new();
        for upload in uploads {
            match ingest_upload(upload, &self.options) {
                Ok(ingested) => {
                    let state = FileSession {
                        file_name: ingested.file_name,
                        extension: ingested.extension,
                        original: ingested.table.clone(),
                        table: ingested.table,
                        selection: None,
                        log: Vec::new(),
                    };
                    match self.files.iter_mut().find(|f| f.file_name == state.file_name) {
                        Some(existing) => *existing = state,
                        None => self.files.push(state),
                    }
                }
                Err(e) => notes.push(Notification::for_error(&upload.name, &e)),
            }
        }
        notes.push(Notification::success(None, BATCH_DONE_MESSAGE));
        notes
    }

    /// Names of loaded files, in upload order.
    pub fn file_names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.file_name.as_str()).collect()
    }

    /// State of a loaded file, or [`SweepError::UnknownFile`].
    pub fn file(&self, file_name: &str) -> SweepResult<&FileSession> {
        self.files
            .iter()
            .find(|f| f.file_name == file_name)
            .ok_or_else(|| SweepError::UnknownFile {
                name: file_name.to_owned(),
            })
    }

    fn file_mut(&mut self, file_name: &str) -> SweepResult<&mut FileSession> {
        self.files
            .iter_mut()
            .find(|f| f.file_name == file_name)
            .ok_or_else(|| SweepError::UnknownFile {
                name: file_name.to_owned(),
            })
    }

    /// Drop a file and its state. Returns `false` if it was not loaded.
    pub fn remove(&mut self, file_name: &str) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.file_name != file_name);
        self.files.len() != before
    }

    /// First `rows` rows of the table as loaded.
    pub fn preview(&self, file_name: &str, rows: usize) -> SweepResult<Table> {
        Ok(self.file(file_name)?.original.head(rows))
    }

    /// Drop duplicate rows from the file's current table.
    pub fn remove_duplicates(&mut self, file_name: &str) -> SweepResult<Notification> {
        let file = self.file_mut(file_name)?;
        let removed = remove_duplicates(&mut file.table);
        file.log.push(Operation::RemoveDuplicates { removed });
        Ok(Notification::success(Some(file_name), DUPLICATES_REMOVED_MESSAGE))
    }

    /// Fill missing numeric cells of the file's current table with column means.
    pub fn fill_missing(&mut self, file_name: &str) -> SweepResult<Notification> {
        let file = self.file_mut(file_name)?;
        let filled = fill_missing_with_mean(&mut file.table);
        file.log.push(Operation::FillMissing { filled });
        Ok(Notification::success(Some(file_name), MISSING_FILLED_MESSAGE))
    }

    /// Replace the column selection. Every name must be a column of the file.
    pub fn select_columns<S: AsRef<str>>(&mut self, file_name: &str, columns: &[S]) -> SweepResult<()> {
        let file = self.file_mut(file_name)?;
        let projected = select_columns(&file.table, columns)?;
        let columns = projected.column_names();
        file.log.push(Operation::SelectColumns {
            columns: columns.clone(),
        });
        file.selection = Some(columns);
        Ok(())
    }

    /// Current table of a file, with its column selection applied.
    pub fn table(&self, file_name: &str) -> SweepResult<Table> {
        self.file(file_name)?.current()
    }

    /// Bar chart of the current table.
    pub fn chart(&self, file_name: &str) -> SweepResult<BarChart> {
        Ok(BarChart::from_table(&self.table(file_name)?))
    }

    /// Encode the current table as a download named after the upload.
    pub fn export(&self, file_name: &str, format: ExportFormat) -> SweepResult<ExportedFile> {
        export_table(&self.table(file_name)?, file_name, format)
    }

    /// Discard cleaning and selection, going back to the table as loaded.
    pub fn reset(&mut self, file_name: &str) -> SweepResult<()> {
        let file = self.file_mut(file_name)?;
        file.table = file.original.clone();
        file.selection = None;
        file.log.clear();
        tracing::debug!(file = %file_name, "reset file state");
        Ok(())
    }
}
