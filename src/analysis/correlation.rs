//! Pearson correlation between numeric columns

use polars::prelude::cov::pearson_corr;
use polars::prelude::*;
use serde::Serialize;

use super::scale::pow2_scale;

/// Square correlation matrix over the numeric columns, in table order.
///
/// `values[i][j]` is `None` where the coefficient is undefined (fewer than
/// two shared observations, or a constant column).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CorrelationMatrix {
    /// Column names, one per row/column of the matrix
    pub columns: Vec<String>,
    /// Row-major coefficients
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Correlate every pair of columns. Returns `None` for fewer than two columns.
    pub fn compute(columns: &[(&str, Float64Chunked)]) -> Option<Self> {
        if columns.len() < 2 {
            return None;
        }

        let n = columns.len();
        let mut values = vec![vec![None; n]; n];
        for i in 0..n {
            for j in i..n {
                let r = pearson(&columns[i].1, &columns[j].1);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        Some(Self {
            columns: columns.iter().map(|(name, _)| name.to_string()).collect(),
            values,
        })
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True for an empty matrix
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Pearson coefficient over the rows where both values are present.
///
/// Each side is divided by a power of two near its largest magnitude
/// before correlating. The coefficient is scale-invariant, and the sums of
/// squares cannot overflow.
pub fn pearson(x: &Float64Chunked, y: &Float64Chunked) -> Option<f64> {
    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y.iter())
        .filter_map(|pair| match pair {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((a, b)),
            _ => None,
        })
        .unzip();

    if xs.len() < 2 {
        return None;
    }

    let x = rescaled("x", xs);
    let y = rescaled("y", ys);
    pearson_corr(&x, &y)
        .filter(|r| r.is_finite())
        .map(|r| r.clamp(-1.0, 1.0))
}

fn rescaled(name: &str, mut values: Vec<f64>) -> Float64Chunked {
    let magnitude = values.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
    let scale = pow2_scale(magnitude);
    for v in values.iter_mut() {
        *v /= scale;
    }
    Float64Chunked::from_vec(name.into(), values)
}
