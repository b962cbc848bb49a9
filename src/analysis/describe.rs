//! Descriptive statistics per column
//!
//! Numeric columns get count, mean, sample standard deviation, min, quartiles
//! and max. Categorical columns (`object`, `bool`) get count, number of
//! distinct values, the most frequent value and its frequency. Statistics
//! that do not apply to a column are serialized as `null`.

use std::collections::HashMap;
use std::hash::Hash;

use polars::prelude::*;
use serde::Serialize;
use serde_json::Value as JsonValue;

use super::scale::range_scale;
use super::ColumnMap;
use crate::dataset::{is_numeric, DataTable};

/// Statistics for one column
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct ColumnStats {
    /// Non-missing values
    pub count: usize,
    /// Distinct values (categorical only)
    pub unique: Option<usize>,
    /// Most frequent value (categorical only)
    pub top: Option<JsonValue>,
    /// Frequency of `top` (categorical only)
    pub freq: Option<usize>,
    /// Arithmetic mean
    pub mean: Option<f64>,
    /// Sample standard deviation (ddof = 1)
    pub std: Option<f64>,
    /// Minimum
    pub min: Option<f64>,
    /// First quartile
    #[serde(rename = "25%")]
    pub q25: Option<f64>,
    /// Median
    #[serde(rename = "50%")]
    pub q50: Option<f64>,
    /// Third quartile
    #[serde(rename = "75%")]
    pub q75: Option<f64>,
    /// Maximum
    pub max: Option<f64>,
}

impl ColumnStats {
    /// Statistics of a numeric sample; missing values are skipped.
    ///
    /// Moments and quartiles are taken on a power-of-two rescaled copy of
    /// the sample, so samples spanning most of the `f64` range stay finite.
    pub fn numeric(values: &Float64Chunked) -> PolarsResult<Self> {
        let count = values.len() - values.null_count();
        let (Some(min), Some(max)) = (values.min(), values.max()) else {
            return Ok(Self::default());
        };

        let scale = range_scale(min, max);
        let scaled = values / scale;
        let quartile = |q: f64| -> PolarsResult<Option<f64>> {
            Ok(scaled
                .quantile(q, QuantileMethod::Linear)?
                .and_then(|v| finite(v * scale)))
        };

        Ok(Self {
            count,
            mean: scaled.mean().and_then(|v| finite(v * scale)),
            std: scaled.std(1).and_then(|v| finite(v * scale)),
            min: finite(min),
            q25: quartile(0.25)?,
            q50: quartile(0.5)?,
            q75: quartile(0.75)?,
            max: finite(max),
            ..Self::default()
        })
    }

    /// Statistics of a categorical sample
    pub fn categorical<T, I>(values: I, to_json: impl Fn(T) -> JsonValue) -> Self
    where
        T: Eq + Hash + Clone,
        I: IntoIterator<Item = T>,
    {
        let counts = value_counts(values);
        let count = counts.iter().map(|(_, n)| n).sum();
        let unique = counts.len();
        let (top, freq) = match counts.into_iter().next() {
            Some((value, n)) => (Some(to_json(value)), Some(n)),
            None => (None, None),
        };

        Self {
            count,
            unique: Some(unique),
            top,
            freq,
            ..Self::default()
        }
    }
}

/// Describe every column of the table, in column order.
///
/// `unique` comes from the dataframe; `top` and `freq` come from
/// [`value_counts`] so that ties resolve to the first value seen.
pub fn describe(table: &DataTable) -> PolarsResult<ColumnMap<ColumnStats>> {
    table
        .columns()
        .map(|series| {
            let stats = if is_numeric(series.dtype()) {
                let values = series.cast(&DataType::Float64)?;
                ColumnStats::numeric(values.f64()?)?
            } else {
                let mut stats = if series.dtype() == &DataType::Boolean {
                    ColumnStats::categorical(series.bool()?.into_iter().flatten(), JsonValue::Bool)
                } else {
                    ColumnStats::categorical(series.str()?.into_iter().flatten(), |s: &str| {
                        JsonValue::String(s.to_string())
                    })
                };
                stats.unique = Some(series.drop_nulls().n_unique()?);
                stats
            };
            Ok((series.name().to_string(), stats))
        })
        .collect()
}

/// Count occurrences, most frequent first; ties keep first-seen order.
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();

    for value in values {
        match index.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    // sort_by is stable, so equal counts stay in first-seen order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
