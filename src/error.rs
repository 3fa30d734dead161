use thiserror::Error;

/// Convenience result type used across the crate.
pub type SweepResult<T> = Result<T, SweepError>;

/// Error type returned by ingestion, processing and export functions.
///
/// One enum is shared by every stage; the pipeline catches it at the per-file boundary and turns
/// it into a user-facing [`crate::pipeline::Notification`].
#[derive(Debug, Error)]
pub enum SweepError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decode or encode error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook decode error.
    #[error("excel error: {0}")]
    Excel(#[from] calamine::XlsxError),

    /// Workbook encode error.
    #[error("excel write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// The filename extension does not map to a supported format.
    ///
    /// `extension` includes the leading dot (`.txt`), or is empty when the name has none.
    #[error("Unsupported file type: {extension}")]
    UnsupportedFormat { extension: String },

    /// The bytes were readable but do not form a table (no header, ragged rows, ...).
    #[error("malformed input: {message}")]
    Malformed { message: String },

    /// A referenced column does not exist in the table.
    #[error("column '{name}' not found")]
    ColumnNotFound { name: String },

    /// A session command referenced a file that was never uploaded (or failed to load).
    #[error("no file named '{name}' in session")]
    UnknownFile { name: String },
}

impl SweepError {
    /// Whether the error means the uploaded bytes could not be decoded.
    ///
    /// Decode failures are reported as `Error reading file <name>: <cause>`; unsupported formats
    /// are reported on their own.
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            Self::Io(_) | Self::Csv(_) | Self::Excel(_) | Self::Malformed { .. }
        )
    }
}
