//! In-memory table transformations.
//!
//! The processing layer operates on [`crate::types::Table`] values produced by ingestion.
//!
//! Currently implemented:
//!
//! - [`remove_duplicates()`]: drop exact-duplicate rows, in place
//! - [`fill_missing_with_mean()`]: mean imputation for numeric columns, in place
//! - [`select_columns()`]: projection onto an ordered column selection
//!
//! ## Example: dedup → fill → select
//!
//! ```rust
//! use data_sweeper::processing::{fill_missing_with_mean, remove_duplicates, select_columns};
//! use data_sweeper::types::{DataType, Field, Schema, Table, Value};
//!
//! let schema = Schema::new(vec![
//!     Field::new("name", DataType::Utf8),
//!     Field::new("val", DataType::Int64),
//! ]);
//! let mut table = Table::new(
//!     schema,
//!     vec![
//!         vec![Value::Utf8("x".into()), Value::Int64(1)],
//!         vec![Value::Utf8("x".into()), Value::Int64(1)],
//!         vec![Value::Utf8("y".into()), Value::Null],
//!         vec![Value::Utf8("z".into()), Value::Int64(3)],
//!     ],
//! );
//!
//! assert_eq!(remove_duplicates(&mut table), 1);
//! assert_eq!(fill_missing_with_mean(&mut table), 1);
//! assert_eq!(table.rows[1][1], Value::Float64(2.0));
//!
//! let vals = select_columns(&table, &["val"]).unwrap();
//! assert_eq!(vals.column_names(), vec!["val"]);
//! ```

pub mod dedup;
pub mod impute;
pub mod select;

pub use dedup::remove_duplicates;
pub use impute::fill_missing_with_mean;
pub use select::select_columns;
