//! Parsing errors
//!
//! Errors raised while turning an uploaded payload into a [`DataTable`](super::DataTable).

use thiserror::Error;

/// Errors that can occur while reading an uploaded table
#[derive(Error, Debug)]
pub enum DatasetError {
    /// The payload has no header row (or no keys, for JSON)
    #[error("No columns to parse from file")]
    NoColumns,

    /// A data row has more fields than the header
    #[error("Error tokenizing data. Expected {expected} fields in line {line}, saw {found}")]
    RaggedRow {
        /// 1-based line number of the offending row
        line: u64,
        /// Number of header fields
        expected: usize,
        /// Number of fields found on the row
        found: usize,
    },

    /// Malformed CSV
    #[error("{0}")]
    Csv(#[from] csv::Error),

    /// Malformed or unsupported workbook
    #[error("{0}")]
    Spreadsheet(#[from] calamine::Error),

    /// Workbook without any worksheet
    #[error("workbook contains no worksheets")]
    NoWorksheet,

    /// Malformed JSON
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON that is not an array of records
    #[error("expected an array of objects: {0}")]
    JsonShape(String),

    /// The typed columns could not be assembled into a dataframe
    #[error("{0}")]
    Frame(#[from] polars::prelude::PolarsError),
}
