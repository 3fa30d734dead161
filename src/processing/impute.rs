//! Mean imputation for numeric columns.

use crate::types::{DataType, Table, Value};

/// Fill missing cells of every numeric column with that column's mean, in place.
///
/// - The mean is taken over the column's present values before any cell is filled.
/// - Non-numeric columns, columns without missing cells and all-missing columns are untouched.
/// - An [`DataType::Int64`] column that receives a fill becomes [`DataType::Float64`].
///
/// Returns the number of filled cells.
pub fn fill_missing_with_mean(table: &mut Table) -> usize {
    let mut filled = 0usize;

    for idx in table.schema.numeric_indexes() {
        let (mut sum, mut present, mut missing) = (0.0f64, 0usize, 0usize);
        for v in table.column(idx) {
            match v.as_f64() {
                Some(x) => {
                    sum += x;
                    present += 1;
                }
                None => missing += 1,
            }
        }
        if missing == 0 || present == 0 {
            continue;
        }
        let mean = sum / present as f64;

        for row in table.rows.iter_mut() {
            let replacement = match &row[idx] {
                Value::Null => {
                    filled += 1;
                    Some(Value::Float64(mean))
                }
                Value::Int64(i) => Some(Value::Float64(*i as f64)),
                _ => None,
            };
            if let Some(v) = replacement {
                row[idx] = v;
            }
        }

        let field = &mut table.schema.fields[idx];
        if field.data_type == DataType::Int64 {
            field.data_type = DataType::Float64;
        }
        tracing::debug!(column = %field.name, mean, missing, "filled missing values with mean");
    }

    filled
}

#[cfg(test)]
mod tests {
    use super::fill_missing_with_mean;
    use crate::types::{DataType, Field, Schema, Table, Value};

    #[test]
    fn fills_with_mean_of_present_values() {
        let schema = Schema::new(vec![Field::new("val", DataType::Int64)]);
        let mut t = Table::new(
            schema,
            vec![vec![Value::Int64(1)], vec![Value::Null], vec![Value::Int64(3)]],
        );

        assert_eq!(fill_missing_with_mean(&mut t), 1);
        assert_eq!(t.schema.fields[0].data_type, DataType::Float64);
        assert_eq!(
            t.rows,
            vec![
                vec![Value::Float64(1.0)],
                vec![Value::Float64(2.0)],
                vec![Value::Float64(3.0)]
            ]
        );
    }

    #[test]
    fn text_and_complete_columns_are_untouched() {
        let schema = Schema::new(vec![
            Field::new("name", DataType::Utf8),
            Field::new("n", DataType::Int64),
            Field::new("score", DataType::Float64),
        ]);
        let mut t = Table::new(
            schema,
            vec![
                vec![Value::Null, Value::Int64(4), Value::Float64(1.0)],
                vec![Value::Utf8("a".to_string()), Value::Int64(6), Value::Null],
            ],
        );

        assert_eq!(fill_missing_with_mean(&mut t), 1);
        assert_eq!(t.rows[0][0], Value::Null);
        assert_eq!(t.schema.fields[1].data_type, DataType::Int64);
        assert_eq!(t.rows[1][1], Value::Int64(6));
        assert_eq!(t.rows[1][2], Value::Float64(1.0));
    }

    #[test]
    fn all_missing_column_stays_missing() {
        let schema = Schema::new(vec![Field::new("empty", DataType::Float64)]);
        let mut t = Table::new(schema, vec![vec![Value::Null], vec![Value::Null]]);
        assert_eq!(fill_missing_with_mean(&mut t), 0);
        assert!(t.rows.iter().all(|r| r[0].is_null()));
    }

    #[test]
    fn idempotent_once_filled() {
        let schema = Schema::new(vec![Field::new("score", DataType::Float64)]);
        let mut t = Table::new(
            schema,
            vec![vec![Value::Float64(0.5)], vec![Value::Null], vec![Value::Float64(1.0)]],
        );
        fill_missing_with_mean(&mut t);
        let once = t.clone();
        assert_eq!(fill_missing_with_mean(&mut t), 0);
        assert_eq!(t, once);
    }
}
