//! Core data model types.
//!
//! Uploaded files are decoded into an in-memory [`Table`]: a [`Schema`] (ordered, uniquely named,
//! typed [`Field`]s) plus row-major [`Value`] storage.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical data type for a column.
///
/// Assigned once at ingestion and only changed by operations that change the column's
/// representation (mean imputation promotes [`DataType::Int64`] to [`DataType::Float64`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
}

impl DataType {
    /// Whether cleaning and charting treat this column as numeric.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Int64 | Self::Float64)
    }
}

/// A single named, typed field in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field/column name.
    pub name: String,
    /// Field data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the columns of a [`Table`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Returns the index of a field by name, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Indexes of numeric fields, in column order.
    pub fn numeric_indexes(&self) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.data_type.is_numeric())
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// A single typed cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Missing value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// True for a missing cell.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numeric view of the cell; `None` for missing and non-numeric cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int64(v) => Some(*v as f64),
            Self::Float64(v) => Some(*v),
            _ => None,
        }
    }
}

/// Text form used by the CSV encoder. Missing values render as an empty string and floats keep
/// enough digits to decode back to the same value (`2.0`, not `2`).
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v:?}"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Utf8(s) => f.write_str(s),
        }
    }
}

/// In-memory tabular data.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields. Every row
/// holds exactly one value per field and field names are unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a table from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        debug_assert!(
            rows.iter().all(|r| r.len() == schema.fields.len()),
            "row length does not match schema length"
        );
        Self { schema, rows }
    }

    /// Number of rows in the table.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the table.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }

    /// Column names in order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema.field_names().map(str::to_owned).collect()
    }

    /// Iterate the cells of column `idx` top to bottom.
    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// First `n` rows, for previews.
    pub fn head(&self, n: usize) -> Self {
        Self {
            schema: self.schema.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Keep only rows for which `predicate` returns `true`, in place and in order.
    pub fn retain_rows<F>(&mut self, mut predicate: F)
    where
        F: FnMut(&[Value]) -> bool,
    {
        self.rows.retain(|row| predicate(row.as_slice()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let schema = Schema::new(vec![
            Field::new("id", DataType::Int64),
            Field::new("active", DataType::Bool),
            Field::new("score", DataType::Float64),
            Field::new("name", DataType::Utf8),
        ]);
        Table::new(
            schema,
            vec![
                vec![
                    Value::Int64(1),
                    Value::Bool(true),
                    Value::Float64(1.5),
                    Value::Utf8("a".to_string()),
                ],
                vec![Value::Int64(2), Value::Bool(false), Value::Null, Value::Utf8("b".to_string())],
            ],
        )
    }

    #[test]
    fn schema_index_of_works() {
        let t = sample_table();
        assert_eq!(t.schema.index_of("id"), Some(0));
        assert_eq!(t.schema.index_of("name"), Some(3));
        assert_eq!(t.schema.index_of("missing"), None);
    }

    #[test]
    fn numeric_indexes_skip_bool_and_text() {
        let t = sample_table();
        assert_eq!(t.schema.numeric_indexes(), vec![0, 2]);
    }

    #[test]
    fn display_keeps_float_fraction_and_blank_nulls() {
        assert_eq!(Value::Float64(2.0).to_string(), "2.0");
        assert_eq!(Value::Float64(0.1).to_string(), "0.1");
        assert_eq!(Value::Int64(-4).to_string(), "-4");
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Bool(true).to_string(), "True");
    }

    #[test]
    fn head_and_retain_rows() {
        let mut t = sample_table();
        assert_eq!(t.head(1).row_count(), 1);
        assert_eq!(t.head(10).row_count(), 2);

        t.retain_rows(|row| matches!(row[1], Value::Bool(true)));
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.column(0).collect::<Vec<_>>(), vec![&Value::Int64(1)]);
    }
}
