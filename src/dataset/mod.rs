//! Tabular dataset module
//!
//! Parses uploaded CSV, Excel and JSON payloads into an in-memory table of
//! named, typed columns.

pub mod error;
pub mod loader;
pub mod model;

pub use error::DatasetError;
pub use loader::{load_bytes, FileFormat};
pub use model::{dtype_name, is_numeric, Cell, DataTable};
