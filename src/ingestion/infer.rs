//! Column assembly shared by the CSV and workbook decoders.
//!
//! Decoders classify every cell into a [`Cell`]; [`assemble_table`] then picks one [`DataType`]
//! per column from the classified cells and builds the row-major [`Table`].

use std::collections::HashSet;

use crate::types::{DataType, Field, Schema, Table, Value};

/// Tokens decoded as missing values unless the caller overrides them.
pub const DEFAULT_NA_VALUES: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A", "<NA>",
];

/// Lookup set built from [`crate::ingestion::IngestionOptions::na_values`].
#[derive(Debug, Clone)]
pub struct NaValues(HashSet<String>);

impl NaValues {
    /// Build the set from the given tokens only; the defaults are not added.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    /// Whether `raw` is exactly one of the tokens.
    pub fn contains(&self, raw: &str) -> bool {
        self.0.contains(raw)
    }
}

impl Default for NaValues {
    fn default() -> Self {
        Self::new(DEFAULT_NA_VALUES.iter().copied())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum CellKind {
    Missing,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text,
}

/// A decoded cell before its column type is known.
///
/// `text` is what the cell becomes if its column ends up as [`DataType::Utf8`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Cell {
    pub(crate) kind: CellKind,
    pub(crate) text: String,
}

impl Cell {
    pub(crate) fn missing() -> Self {
        Self {
            kind: CellKind::Missing,
            text: String::new(),
        }
    }

    pub(crate) fn new(kind: CellKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Classify a raw text field (CSV cells, workbook string cells are handled separately).
    ///
    /// NA tokens match the raw text exactly; surrounding whitespace is only ignored when parsing
    /// numbers and booleans.
    pub(crate) fn parse_text(raw: &str, na: &NaValues) -> Self {
        if na.contains(raw) {
            return Self::missing();
        }
        let trimmed = raw.trim();
        let kind = if let Ok(i) = trimmed.parse::<i64>() {
            CellKind::Int(i)
        } else if let Ok(f) = trimmed.parse::<f64>() {
            CellKind::Float(f)
        } else if trimmed.eq_ignore_ascii_case("true") {
            CellKind::Bool(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            CellKind::Bool(false)
        } else {
            CellKind::Text
        };
        Self::new(kind, raw)
    }
}

/// Make header names unique and non-empty.
///
/// Blank names become `Unnamed: <index>`; repeats of `x` become `x.1`, `x.2`, ...
pub(crate) fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(raw.len());
    let mut out = Vec::with_capacity(raw.len());
    for (idx, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut suffix = 1usize;
        while seen.contains(&candidate) {
            candidate = format!("{base}.{suffix}");
            suffix += 1;
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

/// Build a [`Table`] from normalized headers and classified rows.
///
/// Rows shorter than the header are padded with missing values; callers reject longer rows.
pub(crate) fn assemble_table(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Table {
    let width = headers.len();
    let row_count = rows.len();

    // Transpose to columns so each column can be typed on its own.
    let mut columns: Vec<Vec<Cell>> = (0..width).map(|_| Vec::with_capacity(row_count)).collect();
    for row in rows {
        let mut cells = row.into_iter();
        for column in columns.iter_mut() {
            column.push(cells.next().unwrap_or_else(Cell::missing));
        }
    }

    let mut fields = Vec::with_capacity(width);
    let mut typed_columns: Vec<Vec<Value>> = Vec::with_capacity(width);
    for (name, cells) in headers.into_iter().zip(columns) {
        let data_type = infer_column_type(&cells);
        typed_columns.push(cells.into_iter().map(|c| to_value(c, data_type)).collect());
        fields.push(Field::new(name, data_type));
    }

    let mut table_rows: Vec<Vec<Value>> = (0..row_count).map(|_| Vec::with_capacity(width)).collect();
    for column in typed_columns {
        for (row, value) in table_rows.iter_mut().zip(column) {
            row.push(value);
        }
    }

    Table::new(Schema::new(fields), table_rows)
}

fn infer_column_type(cells: &[Cell]) -> DataType {
    let (mut ints, mut floats, mut bools, mut texts) = (false, false, false, false);
    for cell in cells {
        match cell.kind {
            CellKind::Missing => {}
            CellKind::Int(_) => ints = true,
            CellKind::Float(_) => floats = true,
            CellKind::Bool(_) => bools = true,
            CellKind::Text => texts = true,
        }
    }

    if texts || (bools && (ints || floats)) {
        DataType::Utf8
    } else if bools {
        DataType::Bool
    } else if ints && !floats {
        DataType::Int64
    } else {
        // Mixed int/float, plain float, and all-missing columns.
        DataType::Float64
    }
}

fn to_value(cell: Cell, data_type: DataType) -> Value {
    match (cell.kind, data_type) {
        (CellKind::Missing, _) => Value::Null,
        (_, DataType::Utf8) => Value::Utf8(cell.text),
        (CellKind::Int(i), DataType::Int64) => Value::Int64(i),
        (CellKind::Int(i), DataType::Float64) => Value::Float64(i as f64),
        (CellKind::Float(f), DataType::Float64) => Value::Float64(f),
        (CellKind::Bool(b), DataType::Bool) => Value::Bool(b),
        // infer_column_type never pairs any other kind with a non-text type.
        _ => Value::Utf8(cell.text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(raw: &str) -> Cell {
        Cell::parse_text(raw, &NaValues::default())
    }

    #[test]
    fn parse_text_classifies_cells() {
        assert_eq!(text("42").kind, CellKind::Int(42));
        assert_eq!(text(" 2.5 ").kind, CellKind::Float(2.5));
        assert_eq!(text("TRUE").kind, CellKind::Bool(true));
        assert_eq!(text("NA").kind, CellKind::Missing);
        assert_eq!(text("").kind, CellKind::Missing);
        assert_eq!(text("hello").kind, CellKind::Text);
    }

    #[test]
    fn whitespace_is_text_not_missing() {
        assert_eq!(text(" ").kind, CellKind::Text);
        assert_eq!(text(" NA ").kind, CellKind::Text);
        assert_eq!(text(" 7 ").kind, CellKind::Int(7));

        let t = assemble_table(vec!["s".to_string()], vec![vec![text("x")], vec![text(" ")]]);
        assert_eq!(t.schema.fields[0].data_type, DataType::Utf8);
        assert_eq!(t.rows[1][0], Value::Utf8(" ".to_string()));
    }

    #[test]
    fn custom_na_values_replace_defaults() {
        let na = NaValues::new(["-"]);
        assert_eq!(Cell::parse_text("-", &na).kind, CellKind::Missing);
        assert_eq!(Cell::parse_text("NA", &na).kind, CellKind::Text);
    }

    #[test]
    fn normalize_headers_fills_blanks_and_dedups() {
        let out = normalize_headers(vec![
            "a".to_string(),
            "".to_string(),
            "a".to_string(),
            "a.1".to_string(),
        ]);
        assert_eq!(out, vec!["a", "Unnamed: 1", "a.1", "a.1.1"]);
    }

    #[test]
    fn assemble_infers_one_type_per_column() {
        let headers = vec!["i".to_string(), "f".to_string(), "s".to_string(), "e".to_string()];
        let rows = vec![
            vec![text("1"), text("1"), text("x"), text("")],
            vec![text(""), text("2.5"), text("3")],
        ];
        let t = assemble_table(headers, rows);

        let types: Vec<DataType> = t.schema.fields.iter().map(|f| f.data_type).collect();
        assert_eq!(
            types,
            vec![DataType::Int64, DataType::Float64, DataType::Utf8, DataType::Float64]
        );
        assert_eq!(
            t.rows[0],
            vec![
                Value::Int64(1),
                Value::Float64(1.0),
                Value::Utf8("x".to_string()),
                Value::Null
            ]
        );
        // Short row padded; numeric-looking text in a text column keeps its original form.
        assert_eq!(
            t.rows[1],
            vec![Value::Null, Value::Float64(2.5), Value::Utf8("3".to_string()), Value::Null]
        );
    }

    #[test]
    fn bool_mixed_with_numbers_is_text() {
        let t = assemble_table(vec!["m".to_string()], vec![vec![text("true")], vec![text("1")]]);
        assert_eq!(t.schema.fields[0].data_type, DataType::Utf8);
    }
}
