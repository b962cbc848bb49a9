//! Exploratory analysis
//!
//! Computes the per-column summary, the describe table and the correlation
//! matrix, then assembles them with the rendered plots into an [`EdaReport`].

pub mod correlation;
pub mod describe;
pub mod error;
pub mod report;
pub mod scale;
pub mod summary;

pub use correlation::CorrelationMatrix;
pub use describe::{describe, value_counts, ColumnStats};
pub use error::AnalysisError;
pub use report::{build_report, EdaReport};
pub use summary::{summarize, ColumnSummary};

use serde::{Serialize, Serializer};

/// Map keyed by column name that serializes in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMap<V>(Vec<(String, V)>);

impl<V> ColumnMap<V> {
    /// Create an empty map
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append an entry; column names are unique within a table
    pub fn insert(&mut self, column: String, value: V) {
        self.0.push((column, value));
    }

    /// Look up a column's entry
    pub fn get(&self, column: &str) -> Option<&V> {
        self.0.iter().find(|(name, _)| name == column).map(|(_, v)| v)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no column has an entry
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Column names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }
}

impl<V> Default for ColumnMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> FromIterator<(String, V)> for ColumnMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<V: Serialize> Serialize for ColumnMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}
