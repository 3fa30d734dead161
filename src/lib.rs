//! `data-sweeper` turns uploaded tabular files into cleaned, projected and re-encoded downloads.
//!
//! The pipeline has five stages; only visualization leaves the table untouched:
//!
//! 1. **Ingestion** ([`ingestion`]): the filename extension picks the decoder (`.csv` or
//!    `.xlsx`); bytes become an in-memory [`types::Table`].
//! 2. **Cleaning** ([`processing`]): [`processing::remove_duplicates`] and
//!    [`processing::fill_missing_with_mean`], both in place and idempotent.
//! 3. **Projection** ([`processing::select_columns`]): keep an ordered subset of columns.
//! 4. **Visualization** ([`chart`]): the first two numeric columns as a bar chart.
//! 5. **Export** ([`export`]): CSV or `.xlsx` bytes in a rewound in-memory buffer, with the
//!    output filename and MIME type.
//!
//! Rendering, upload handling and downloads belong to the caller. Two drivers are provided:
//! [`pipeline::run_batch`] runs a stateless pass over a batch of uploads, and
//! [`session::Session`] keeps per-file state between discrete commands.
//!
//! ## Column types
//!
//! Every column carries one [`types::DataType`], inferred at ingestion:
//!
//! - [`types::DataType::Int64`] and [`types::DataType::Float64`] are numeric (imputed, charted)
//! - [`types::DataType::Bool`]
//! - [`types::DataType::Utf8`]
//!
//! Missing cells are [`types::Value::Null`] in every column type.
//!
//! ## Example
//!
//! ```rust
//! use data_sweeper::export::{ExportFormat, XLSX_MIME};
//! use data_sweeper::ingestion::UploadedFile;
//! use data_sweeper::session::Session;
//! use data_sweeper::types::Value;
//!
//! # fn main() -> Result<(), data_sweeper::SweepError> {
//! let mut session = Session::default();
//! session.upload(&[UploadedFile::new("a.csv", "name,val\nx,1\nx,1\ny,\nz,3\n")]);
//!
//! session.remove_duplicates("a.csv")?;
//! session.fill_missing("a.csv")?;
//! assert_eq!(session.table("a.csv")?.rows[1][1], Value::Float64(2.0));
//!
//! let download = session.export("a.csv", ExportFormat::Excel)?;
//! assert_eq!(download.file_name, "a.xlsx");
//! assert_eq!(download.mime_type, XLSX_MIME);
//! assert_eq!(download.buffer.position(), 0);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: upload decoding, format detection and observer hooks
//! - [`types`]: schema and in-memory table types
//! - [`processing`]: cleaning and projection
//! - [`chart`]: bar-chart specs
//! - [`export`]: CSV/XLSX encoding
//! - [`pipeline`]: batch pass and notifications
//! - [`session`]: stateful per-file commands
//! - [`error`]: the crate error type

pub mod chart;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod pipeline;
pub mod processing;
pub mod session;
pub mod types;

pub use error::{SweepError, SweepResult};
