//! Column projection for [`crate::types::Table`].

use crate::error::{SweepError, SweepResult};
use crate::types::{Schema, Table};

/// Returns a new [`Table`] holding only `columns`, in the order given, with every row kept.
///
/// A name listed twice is kept once, at its first position. Fails with
/// [`SweepError::ColumnNotFound`] if a name is not a column of `table`.
pub fn select_columns<S: AsRef<str>>(table: &Table, columns: &[S]) -> SweepResult<Table> {
    let mut idxs: Vec<usize> = Vec::with_capacity(columns.len());
    for name in columns {
        let name = name.as_ref();
        let idx = table
            .schema
            .index_of(name)
            .ok_or_else(|| SweepError::ColumnNotFound { name: name.to_owned() })?;
        if !idxs.contains(&idx) {
            idxs.push(idx);
        }
    }

    let schema = Schema::new(idxs.iter().map(|&i| table.schema.fields[i].clone()).collect());
    let rows = table
        .rows
        .iter()
        .map(|row| idxs.iter().map(|&i| row[i].clone()).collect())
        .collect();

    Ok(Table::new(schema, rows))
}
