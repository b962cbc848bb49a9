//! Per-column overview: dtype, completeness and cardinality.

use polars::prelude::PolarsResult;
use serde::Serialize;

use crate::dataset::{dtype_name, DataTable};

/// One row of the column overview
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColumnSummary {
    /// Column name
    #[serde(rename = "Column")]
    pub column: String,
    /// Dataframe dtype (`int64`, `float64`, `bool`, `object`)
    pub dtypes: &'static str,
    /// Non-missing cells
    #[serde(rename = "non-null")]
    pub non_null: usize,
    /// Missing cells
    #[serde(rename = "Missing")]
    pub missing: usize,
    /// Share of missing cells, in percent, two decimals
    #[serde(rename = "Missing (%)")]
    pub missing_pct: f64,
    /// Distinct non-missing values
    #[serde(rename = "Uniques")]
    pub uniques: usize,
}

/// Summarise every column of the table, in column order.
pub fn summarize(table: &DataTable) -> PolarsResult<Vec<ColumnSummary>> {
    let rows = table.height();
    table
        .columns()
        .map(|series| {
            let missing = series.null_count();
            let missing_pct = if rows == 0 {
                0.0
            } else {
                round2(missing as f64 * 100.0 / rows as f64)
            };
            Ok(ColumnSummary {
                column: series.name().to_string(),
                dtypes: dtype_name(series.dtype()),
                non_null: series.len() - missing,
                missing,
                missing_pct,
                uniques: series.drop_nulls().n_unique()?,
            })
        })
        .collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{load_bytes, FileFormat};

    #[test]
    fn test_summarize_counts_missing_and_uniques() {
        let table = load_bytes(b"a,b\n1,x\n2,\n2,y\n", FileFormat::Csv).expect("parse");
        let summary = summarize(&table).expect("summary");

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].column, "a");
        assert_eq!(summary[0].dtypes, "int64");
        assert_eq!(summary[0].uniques, 2);
        assert_eq!(summary[0].missing, 0);

        assert_eq!(summary[1].dtypes, "object");
        assert_eq!(summary[1].non_null, 2);
        assert_eq!(summary[1].missing, 1);
        assert_eq!(summary[1].missing_pct, 33.33);
    }

    #[test]
    fn test_summarize_empty_table() {
        let table = load_bytes(b"a\n", FileFormat::Csv).expect("parse");
        let summary = summarize(&table).expect("summary");
        assert_eq!(summary[0].missing_pct, 0.0);
        assert_eq!(summary[0].non_null, 0);
    }

    #[test]
    fn test_summary_json_keys() {
        let table = load_bytes(b"a\n1\n", FileFormat::Csv).expect("parse");
        let json = serde_json::to_value(summarize(&table).expect("summary")).expect("serialize");
        let record = &json[0];
        for key in ["Column", "dtypes", "non-null", "Missing", "Missing (%)", "Uniques"] {
            assert!(record.get(key).is_some(), "missing key {key}");
        }
    }
}
