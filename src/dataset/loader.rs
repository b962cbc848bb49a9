//! Upload parsers
//!
//! One loader per accepted format. Each reads the payload from memory into
//! [`Cell`]s and hands them to [`DataTable`] for typing:
//! - CSV: header row, UTF-8 with a Latin-1 fallback, long rows rejected
//! - XLSX/XLS: first worksheet, first row as header, dates as text
//! - JSON: an array of records
//!
//! ```
//! use eda_backend::dataset::{load_bytes, FileFormat};
//!
//! let table = load_bytes(b"a,b\n1,x\n", FileFormat::Csv).unwrap();
//! assert_eq!(table.shape(), (1, 2));
//! ```

use std::borrow::Cow;
use std::fmt;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use serde_json::Value as JsonValue;
use tracing::debug;

use super::model::{Cell, DataTable};
use super::DatasetError;

// ---------------------------------------------------------------------------
// File formats
// ---------------------------------------------------------------------------

/// Upload formats the analyser understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma separated values with a header row
    Csv,
    /// Office Open XML workbook
    Xlsx,
    /// Legacy Excel workbook
    Xls,
    /// Records-oriented JSON (`[{"col": value, ...}, ...]`)
    Json,
}

impl FileFormat {
    /// Extensions accepted by the upload endpoint
    pub const ALLOWED_EXTENSIONS: [&'static str; 4] = ["csv", "xlsx", "xls", "json"];

    /// Map a (case-insensitive) extension to a format
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(FileFormat::Csv),
            "xlsx" => Some(FileFormat::Xlsx),
            "xls" => Some(FileFormat::Xls),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }

    /// Canonical lower-case extension
    pub fn extension(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xls => "xls",
            FileFormat::Json => "json",
        }
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileFormat::Csv => "CSV",
            FileFormat::Xlsx => "XLSX",
            FileFormat::Xls => "XLS",
            FileFormat::Json => "JSON",
        })
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Parse an uploaded payload into a table.
pub fn load_bytes(bytes: &[u8], format: FileFormat) -> Result<DataTable, DatasetError> {
    match format {
        FileFormat::Csv => load_csv(bytes),
        FileFormat::Xlsx | FileFormat::Xls => load_spreadsheet(bytes),
        FileFormat::Json => load_json(bytes),
    }
}

/// Decode text as UTF-8, falling back to Latin-1 for legacy exports.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(e) => {
            debug!(
                valid_up_to = e.valid_up_to(),
                "Upload is not valid UTF-8, decoding as Latin-1"
            );
            Cow::Owned(bytes.iter().map(|&b| b as char).collect())
        }
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(bytes: &[u8]) -> Result<DataTable, DatasetError> {
    let text = decode_text(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(record) => record?.iter().map(str::to_string).collect(),
        None => return Err(DatasetError::NoColumns),
    };

    let mut rows = Vec::new();
    for result in records {
        let record = result?;
        if record.len() > headers.len() {
            return Err(DatasetError::RaggedRow {
                line: record.position().map(|p| p.line()).unwrap_or(0),
                expected: headers.len(),
                found: record.len(),
            });
        }
        rows.push(record.iter().map(Cell::parse).collect());
    }

    DataTable::from_rows(headers, rows)
}

// ---------------------------------------------------------------------------
// Spreadsheet loader (xlsx / xls)
// ---------------------------------------------------------------------------

/// Reads the first worksheet; its first row is the header.
fn load_spreadsheet(bytes: &[u8]) -> Result<DataTable, DatasetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(DatasetError::NoWorksheet)??;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row
            .iter()
            .map(|cell| match cell {
                Data::Empty => String::new(),
                other => other.to_string(),
            })
            .collect(),
        None => return Err(DatasetError::NoColumns),
    };

    let rows = rows
        .map(|row| row.iter().map(spreadsheet_cell).collect())
        .collect();

    DataTable::from_rows(headers, rows)
}

fn spreadsheet_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Null,
        Data::Int(i) => Cell::Int(*i),
        Data::Float(f) => Cell::spreadsheet_number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::String(s) => Cell::label(s),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(|dt| Cell::Text(dt.to_string()))
            .unwrap_or(Cell::Null),
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected layout (records orientation):
///
/// ```json
/// [
///   { "city": "Oslo", "temp": 4.5 },
///   { "city": "Rome", "temp": 17.0, "rain": true }
/// ]
/// ```
///
/// Columns appear in order of first use; absent keys are missing values.
fn load_json(bytes: &[u8]) -> Result<DataTable, DatasetError> {
    let text = decode_text(bytes);
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root
        .as_array()
        .ok_or_else(|| DatasetError::JsonShape(format!("top level is {}", json_kind(&root))))?;

    let mut headers: Vec<String> = Vec::new();
    let mut columns: Vec<Vec<Cell>> = Vec::new();

    for (row, record) in records.iter().enumerate() {
        let obj = record.as_object().ok_or_else(|| {
            DatasetError::JsonShape(format!("row {row} is {}", json_kind(record)))
        })?;

        for (key, value) in obj {
            let idx = match headers.iter().position(|h| h == key) {
                Some(idx) => idx,
                None => {
                    headers.push(key.clone());
                    // Back-fill the new column for the rows already read
                    columns.push(vec![Cell::Null; row]);
                    headers.len() - 1
                }
            };
            columns[idx].push(json_cell(value));
        }

        for column in columns.iter_mut() {
            if column.len() < row + 1 {
                column.push(Cell::Null);
            }
        }
    }

    DataTable::from_columns(headers, columns)
}

fn json_cell(value: &JsonValue) -> Cell {
    match value {
        JsonValue::Null => Cell::Null,
        JsonValue::Bool(b) => Cell::Bool(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Cell::Int(i),
            None => n.as_f64().map(Cell::float).unwrap_or(Cell::Null),
        },
        JsonValue::String(s) => Cell::Text(s.clone()),
        other => Cell::Text(other.to_string()),
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::dtype_name;
    use polars::prelude::Series;

    const SAMPLE_XLSX: &[u8] = include_bytes!("../../tests/fixtures/sample.xlsx");

    fn dtypes(table: &DataTable) -> Vec<&'static str> {
        table.columns().map(|s| dtype_name(s.dtype())).collect()
    }

    fn texts(series: &Series) -> Vec<Option<String>> {
        series
            .str()
            .expect("object column")
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    #[test]
    fn test_file_format_from_extension() {
        assert_eq!(FileFormat::from_extension("CSV"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_extension("xlsx"), Some(FileFormat::Xlsx));
        assert_eq!(FileFormat::from_extension("txt"), None);
        assert_eq!(FileFormat::Xls.to_string(), "XLS");
    }

    #[test]
    fn test_load_csv_infers_types() {
        let csv = b"name,age,score,active\nann,31,1.5,True\nbob,45,,False\ncy,28,3.0,True\n";
        let table = load_bytes(csv, FileFormat::Csv).expect("CSV should parse");

        assert_eq!(table.shape(), (3, 4));
        assert_eq!(dtypes(&table), vec!["object", "int64", "float64", "bool"]);
        let score: Vec<Option<f64>> = table
            .column("score")
            .expect("score")
            .f64()
            .expect("float64")
            .iter()
            .collect();
        assert_eq!(score, vec![Some(1.5), None, Some(3.0)]);
    }

    #[test]
    fn test_load_csv_header_only() {
        let table = load_bytes(b"a,b\n", FileFormat::Csv).expect("header-only CSV should parse");
        assert_eq!(table.shape(), (0, 2));
    }

    #[test]
    fn test_load_csv_empty_payload() {
        let result = load_bytes(b"", FileFormat::Csv);
        match result {
            Err(DatasetError::NoColumns) => {}
            other => panic!("Expected NoColumns error, got: {:?}", other),
        }
    }

    #[test]
    fn test_load_csv_rejects_long_rows() {
        let result = load_bytes(b"a,b\n1,2\n3,4,5\n", FileFormat::Csv);
        match result {
            Err(DatasetError::RaggedRow {
                line,
                expected,
                found,
            }) => {
                assert_eq!(line, 3);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("Expected RaggedRow error, got: {:?}", other),
        }
    }

    #[test]
    fn test_load_csv_latin1_fallback() {
        // "café" encoded as Latin-1
        let bytes = b"word,n\ncaf\xE9,1\n";
        let table = load_bytes(bytes, FileFormat::Csv).expect("Latin-1 CSV should parse");
        assert_eq!(
            texts(table.column("word").expect("word")),
            vec![Some("café".to_string())]
        );
    }

    #[test]
    fn test_load_csv_infinite_values_are_missing() {
        let table = load_bytes(b"x\n1.5\ninf\n-inf\n2\n", FileFormat::Csv).expect("parse");
        let x = table.column("x").expect("x");
        assert_eq!(dtype_name(x.dtype()), "float64");
        assert_eq!(x.null_count(), 2);
    }

    #[test]
    fn test_decode_text_strips_bom() {
        assert_eq!(decode_text(b"\xEF\xBB\xBFa,b"), "a,b");
    }

    #[test]
    fn test_load_json_records() {
        let json = br#"[{"city": "Oslo", "temp": 4}, {"temp": 17.5, "city": "Rome", "rain": true}]"#;
        let table = load_bytes(json, FileFormat::Json).expect("JSON should parse");

        let names: Vec<&str> = table.columns().map(|s| s.name().as_str()).collect();
        assert_eq!(names, vec!["city", "temp", "rain"]);
        let temp: Vec<Option<f64>> = table
            .column("temp")
            .expect("temp")
            .f64()
            .expect("float64")
            .iter()
            .collect();
        assert_eq!(temp, vec![Some(4.0), Some(17.5)]);
        // First row has no "rain" key, so the bool column has a gap
        assert_eq!(dtype_name(table.column("rain").expect("rain").dtype()), "object");
    }

    #[test]
    fn test_load_json_rejects_non_array() {
        let result = load_bytes(br#"{"a": 1}"#, FileFormat::Json);
        match result {
            Err(DatasetError::JsonShape(msg)) => assert!(msg.contains("object")),
            other => panic!("Expected JsonShape error, got: {:?}", other),
        }
    }

    #[test]
    fn test_load_json_empty_array() {
        let result = load_bytes(b"[]", FileFormat::Json);
        assert!(matches!(result, Err(DatasetError::NoColumns)));
    }

    #[test]
    fn test_load_spreadsheet_rejects_garbage() {
        let result = load_bytes(b"definitely not a workbook", FileFormat::Xlsx);
        assert!(result.is_err(), "garbage bytes must not parse as a workbook");
    }

    #[test]
    fn test_load_xlsx_workbook() {
        let table = load_bytes(SAMPLE_XLSX, FileFormat::Xlsx).expect("workbook should parse");

        assert_eq!(table.shape(), (3, 6));
        let names: Vec<&str> = table.columns().map(|s| s.name().as_str()).collect();
        assert_eq!(names, vec!["id", "score", "joined", "active", "team", "ratio"]);
        assert_eq!(
            dtypes(&table),
            vec!["int64", "float64", "object", "bool", "object", "float64"]
        );

        // Integral numbers come back as integers
        let id: Vec<Option<i64>> = table.column("id").expect("id").i64().expect("int64").iter().collect();
        assert_eq!(id, vec![Some(1), Some(2), Some(3)]);

        // Date-formatted cells are read as text
        assert_eq!(
            texts(table.column("joined").expect("joined"))[0],
            Some("2024-01-01 00:00:00".to_string())
        );

        // The #DIV/0! cell is missing
        let ratio: Vec<Option<f64>> = table
            .column("ratio")
            .expect("ratio")
            .f64()
            .expect("float64")
            .iter()
            .collect();
        assert_eq!(ratio, vec![Some(10.0), None, Some(30.0)]);
    }

    #[test]
    fn test_spreadsheet_cell_conversion() {
        assert_eq!(spreadsheet_cell(&Data::Float(3.0)), Cell::Int(3));
        assert_eq!(spreadsheet_cell(&Data::Float(2.5)), Cell::Float(2.5));
        assert_eq!(spreadsheet_cell(&Data::Empty), Cell::Null);
        assert_eq!(
            spreadsheet_cell(&Data::String("N/A".to_string())),
            Cell::Null
        );
        assert_eq!(
            spreadsheet_cell(&Data::String("x".to_string())),
            Cell::Text("x".to_string())
        );
    }
}
