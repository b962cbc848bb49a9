//! In-memory table model
//!
//! Loaders turn every field into a [`Cell`]. Once a column is complete its
//! cells are typed into a polars [`Series`] with one of the four dtypes the
//! report distinguishes (`int64`, `float64`, `bool`, `object`), and the
//! columns are gathered into a [`DataTable`] backed by a polars
//! [`DataFrame`].

use std::collections::HashSet;

use polars::prelude::*;

use super::DatasetError;

/// Text values read as missing, the same set pandas uses by default.
pub const NA_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Cell – one value before its column's type is known
// ---------------------------------------------------------------------------

/// A single parsed value. Loaders produce cells; columns are typed afterwards.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Cell {
    /// Interpret a raw text field (CSV) the way a dataframe reader would.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if NA_MARKERS.contains(&trimmed) {
            return Cell::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Cell::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Cell::float(f);
        }
        match trimmed {
            "True" | "TRUE" | "true" => Cell::Bool(true),
            "False" | "FALSE" | "false" => Cell::Bool(false),
            _ => Cell::Text(raw.to_string()),
        }
    }

    /// A text value that is kept as text unless it is a missing marker.
    pub fn label(raw: &str) -> Self {
        if NA_MARKERS.contains(&raw.trim()) {
            Cell::Null
        } else {
            Cell::Text(raw.to_string())
        }
    }

    /// Float cell. NaN and ±inf become missing, so every numeric
    /// statistic sees only finite values.
    pub fn float(value: f64) -> Self {
        if value.is_finite() {
            Cell::Float(value)
        } else {
            Cell::Null
        }
    }

    /// Spreadsheet numbers are floats; integral ones are read back as integers.
    pub fn spreadsheet_number(value: f64) -> Self {
        if value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15 {
            Cell::Int(value as i64)
        } else {
            Cell::float(value)
        }
    }

    /// True for a missing value
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    fn into_text(self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Int(i) => Some(i.to_string()),
            Cell::Float(f) => Some(format_float(f)),
            Cell::Bool(b) => Some(if b { "True" } else { "False" }.to_string()),
            Cell::Text(s) => Some(s),
        }
    }
}

/// Render a float the way Python prints it (`3.0`, not `3`).
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

// ---------------------------------------------------------------------------
// Column typing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
enum Kind {
    Int,
    Float,
    Bool,
    Text,
}

/// Pick the narrowest dtype that holds every cell.
///
/// Integers with a gap widen to `float64`, booleans with a gap fall back to
/// `object`, an all-missing column is `float64` and an empty column is
/// `object`.
fn infer_kind(cells: &[Cell]) -> Kind {
    if cells.is_empty() {
        // Header-only tables read as object columns
        return Kind::Text;
    }

    let mut any_null = false;
    let mut all_int = true;
    let mut all_numeric = true;
    let mut all_bool = true;

    for cell in cells {
        match cell {
            Cell::Null => any_null = true,
            Cell::Int(_) => all_bool = false,
            Cell::Float(_) => {
                all_int = false;
                all_bool = false;
            }
            Cell::Bool(_) => {
                all_int = false;
                all_numeric = false;
            }
            Cell::Text(_) => {
                all_int = false;
                all_numeric = false;
                all_bool = false;
            }
        }
    }

    if cells.iter().all(Cell::is_null) {
        // An all-missing column reads as float64 full of NaN
        Kind::Float
    } else if all_int && !any_null {
        Kind::Int
    } else if all_numeric {
        Kind::Float
    } else if all_bool && !any_null {
        Kind::Bool
    } else {
        Kind::Text
    }
}

/// Type a finished column of cells into a named series.
pub fn infer_series(name: &str, cells: Vec<Cell>) -> Series {
    let name = PlSmallStr::from(name);
    match infer_kind(&cells) {
        Kind::Int => {
            let values: Vec<i64> = cells
                .into_iter()
                .map(|c| match c {
                    Cell::Int(i) => i,
                    _ => 0,
                })
                .collect();
            Series::new(name, values)
        }
        Kind::Float => {
            let values: Vec<Option<f64>> = cells
                .into_iter()
                .map(|c| match c {
                    Cell::Int(i) => Some(i as f64),
                    Cell::Float(f) => Some(f),
                    _ => None,
                })
                .collect();
            Series::new(name, values)
        }
        Kind::Bool => {
            let values: Vec<bool> = cells.into_iter().map(|c| c == Cell::Bool(true)).collect();
            Series::new(name, values)
        }
        Kind::Text => {
            let values: Vec<Option<String>> = cells.into_iter().map(Cell::into_text).collect();
            Series::new(name, values)
        }
    }
}

/// Dataframe dtype name of a column
pub fn dtype_name(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::Int64 => "int64",
        DataType::Float64 => "float64",
        DataType::Boolean => "bool",
        _ => "object",
    }
}

/// True for `int64` and `float64` columns
pub fn is_numeric(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Int64 | DataType::Float64)
}

// ---------------------------------------------------------------------------
// DataTable
// ---------------------------------------------------------------------------

/// The uploaded table, held only for the duration of one request.
#[derive(Debug, Clone)]
pub struct DataTable {
    frame: DataFrame,
}

impl DataTable {
    /// Build a table from header names and column-major cells.
    ///
    /// Every column must have the same length; names are made unique.
    pub fn from_columns(headers: Vec<String>, columns: Vec<Vec<Cell>>) -> Result<Self, DatasetError> {
        if headers.is_empty() {
            return Err(DatasetError::NoColumns);
        }
        debug_assert_eq!(headers.len(), columns.len());

        let columns: Vec<Column> = normalize_headers(headers)
            .into_iter()
            .zip(columns)
            .map(|(name, cells)| infer_series(&name, cells).into_column())
            .collect();

        Ok(Self {
            frame: DataFrame::new(columns)?,
        })
    }

    /// Build a table from a header and row-major cells. Short rows are
    /// padded with missing values; callers reject long rows beforehand.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self, DatasetError> {
        let width = headers.len();
        let mut columns: Vec<Vec<Cell>> = (0..width).map(|_| Vec::with_capacity(rows.len())).collect();
        for row in rows {
            let mut cells = row.into_iter();
            for column in columns.iter_mut() {
                column.push(cells.next().unwrap_or(Cell::Null));
            }
        }
        Self::from_columns(headers, columns)
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        self.frame.shape()
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.frame.height()
    }

    /// Underlying dataframe
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Columns in table order
    pub fn columns(&self) -> impl Iterator<Item = &Series> {
        self.frame.iter()
    }

    /// Look up a column by its (normalised) name
    pub fn column(&self, name: &str) -> Option<&Series> {
        self.columns().find(|s| s.name().as_str() == name)
    }

    /// Numeric columns, in table order, cast to `f64`
    pub fn numeric_columns(&self) -> PolarsResult<Vec<(&str, Float64Chunked)>> {
        self.columns()
            .filter(|s| is_numeric(s.dtype()))
            .map(|s| {
                let values = s.cast(&DataType::Float64)?;
                Ok((s.name().as_str(), values.f64()?.clone()))
            })
            .collect()
    }

    /// `object` columns, in table order
    pub fn text_columns(&self) -> PolarsResult<Vec<(&str, &StringChunked)>> {
        self.columns()
            .filter(|s| s.dtype() == &DataType::String)
            .map(|s| Ok((s.name().as_str(), s.str()?)))
            .collect()
    }
}

/// Blank headers become `Unnamed: {i}`; repeats get `.1`, `.2`, ... suffixes.
pub fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    headers
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            let base = if raw.trim().is_empty() {
                format!("Unnamed: {i}")
            } else {
                raw
            };
            let mut name = base.clone();
            let mut suffix = 1;
            while seen.contains(&name) {
                name = format!("{base}.{suffix}");
                suffix += 1;
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}
