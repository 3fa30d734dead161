//! Bar-chart view of a table's leading numeric columns.
//!
//! Building a chart is a pure read. The crate does not draw anything: [`BarChart`] is handed to
//! the UI layer, either as is or as a Vega-Lite spec via [`BarChart::to_vega_lite`].

use serde::Serialize;
use serde_json::json;

use crate::types::Table;

/// Numeric columns plotted per chart.
pub const MAX_CHART_SERIES: usize = 2;

/// One plotted column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: String,
    /// One bar height per row; `None` where the cell is missing.
    pub values: Vec<Option<f64>>,
}

/// Bars keyed by row position.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BarChart {
    /// Row positions, `0..row_count`.
    pub index: Vec<usize>,
    pub series: Vec<ChartSeries>,
}

impl BarChart {
    /// Chart the first [`MAX_CHART_SERIES`] numeric columns of `table`, in column order.
    ///
    /// A table without numeric columns gives a chart with no series.
    pub fn from_table(table: &Table) -> Self {
        let series = table
            .schema
            .numeric_indexes()
            .into_iter()
            .take(MAX_CHART_SERIES)
            .map(|idx| ChartSeries {
                name: table.schema.fields[idx].name.clone(),
                values: table.column(idx).map(|v| v.as_f64()).collect(),
            })
            .collect();

        Self {
            index: (0..table.row_count()).collect(),
            series,
        }
    }

    /// `true` when there is nothing to plot.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Long-format Vega-Lite spec: one bar per (row, column), colored by column.
    pub fn to_vega_lite(&self) -> serde_json::Value {
        let values: Vec<serde_json::Value> = self
            .series
            .iter()
            .flat_map(|s| {
                self.index.iter().zip(&s.values).map(move |(idx, v)| {
                    json!({ "index": idx, "column": s.name, "value": v })
                })
            })
            .collect();

        json!({
            "$schema": "https://vega.github.io/schema/vega-lite/v5.json",
            "data": { "values": values },
            "mark": "bar",
            "encoding": {
                "x": { "field": "index", "type": "ordinal" },
                "y": { "field": "value", "type": "quantitative" },
                "color": { "field": "column", "type": "nominal" }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DataType, Field, Schema, Value};

    fn mixed_table() -> Table {
        let schema = Schema::new(vec![
            Field::new("name", DataType::Utf8),
            Field::new("a", DataType::Int64),
            Field::new("flag", DataType::Bool),
            Field::new("b", DataType::Float64),
            Field::new("c", DataType::Float64),
        ]);
        Table::new(
            schema,
            vec![
                vec![
                    Value::Utf8("x".to_string()),
                    Value::Int64(1),
                    Value::Bool(true),
                    Value::Float64(0.5),
                    Value::Float64(9.0),
                ],
                vec![
                    Value::Utf8("y".to_string()),
                    Value::Int64(2),
                    Value::Bool(false),
                    Value::Null,
                    Value::Float64(8.0),
                ],
            ],
        )
    }

    #[test]
    fn takes_first_two_numeric_columns() {
        let table = mixed_table();
        let chart = BarChart::from_table(&table);
        assert_eq!(chart.index, vec![0, 1]);
        let names: Vec<&str> = chart.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(chart.series[0].values, vec![Some(1.0), Some(2.0)]);
        assert_eq!(chart.series[1].values, vec![Some(0.5), None]);
    }

    #[test]
    fn does_not_mutate_table() {
        let table = mixed_table();
        let before = table.clone();
        let _ = BarChart::from_table(&table);
        assert_eq!(table, before);
    }

    #[test]
    fn no_numeric_columns_gives_empty_chart() {
        let schema = Schema::new(vec![Field::new("name", DataType::Utf8)]);
        let table = Table::new(schema, vec![vec![Value::Utf8("x".to_string())]]);
        let chart = BarChart::from_table(&table);
        assert!(chart.is_empty());
        assert_eq!(chart.to_vega_lite()["data"]["values"], json!([]));
    }

    #[test]
    fn vega_lite_spec_lists_one_point_per_bar() {
        let chart = BarChart::from_table(&mixed_table());
        let spec = chart.to_vega_lite();
        assert_eq!(spec["mark"], "bar");
        let values = spec["data"]["values"].as_array().unwrap();
        assert_eq!(values.len(), 4);
        assert_eq!(values[3], json!({ "index": 1, "column": "b", "value": null }));
    }
}
