//! Exact-duplicate row removal for [`crate::types::Table`].

use std::collections::HashSet;

use crate::types::{Table, Value};

/// Hashable view of a cell. Floats compare by value, so `-0.0` equals `0.0` and every NaN
/// equals every other NaN (missing values already compare equal).
#[derive(Debug, PartialEq, Eq, Hash)]
enum CellKey<'a> {
    Null,
    Int(i64),
    Float(u64),
    Bool(bool),
    Text(&'a str),
}

impl<'a> From<&'a Value> for CellKey<'a> {
    fn from(v: &'a Value) -> Self {
        match v {
            Value::Null => Self::Null,
            Value::Int64(i) => Self::Int(*i),
            Value::Float64(f) => Self::Float(canonical_bits(*f)),
            Value::Bool(b) => Self::Bool(*b),
            Value::Utf8(s) => Self::Text(s.as_str()),
        }
    }
}

fn canonical_bits(f: f64) -> u64 {
    if f == 0.0 {
        0.0f64.to_bits()
    } else if f.is_nan() {
        f64::NAN.to_bits()
    } else {
        f.to_bits()
    }
}

/// Remove rows that exactly repeat an earlier row across all columns, in place.
///
/// The first occurrence of each row is kept and the relative order of kept rows is unchanged.
/// Returns the number of removed rows.
pub fn remove_duplicates(table: &mut Table) -> usize {
    let before = table.row_count();

    let keep: Vec<bool> = {
        let mut seen: HashSet<Vec<CellKey<'_>>> = HashSet::with_capacity(before);
        table
            .rows
            .iter()
            .map(|row| seen.insert(row.iter().map(CellKey::from).collect()))
            .collect()
    };

    let mut mask = keep.into_iter();
    table.retain_rows(|_| mask.next().unwrap_or(true));

    let removed = before - table.row_count();
    tracing::debug!(removed, rows = table.row_count(), "removed duplicate rows");
    removed
}
