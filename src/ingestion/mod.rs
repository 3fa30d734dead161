//! Ingestion entrypoints and implementations.
//!
//! Most callers should use [`ingest_upload`] (from [`unified`]) which:
//!
//! - detects the format from the upload's file extension (`.csv` or `.xlsx`)
//! - decodes the bytes into an in-memory [`crate::types::Table`]
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Column types are inferred from the decoded cells: a column whose present cells are all
//! integers is [`crate::types::DataType::Int64`], all numbers is `Float64`, all `true`/`false` is
//! `Bool`, anything else is `Utf8`. Cells matching [`IngestionOptions::na_values`] are missing.
//!
//! Format-specific functions are also available under [`csv`] and [`excel`].

pub mod csv;
pub mod excel;
pub mod infer;
pub mod observability;
pub mod unified;

pub use infer::{NaValues, DEFAULT_NA_VALUES};
pub use observability::{
    severity_for_error, CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    TracingObserver,
};
pub use unified::{
    file_extension, ingest_upload, ExcelSheetSelection, IngestedFile, IngestionFormat, IngestionOptions,
    UploadedFile,
};
