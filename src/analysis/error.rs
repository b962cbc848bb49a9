//! Analysis errors
//!
//! Failures while computing statistics or rendering charts for a table that
//! has already parsed. Both point at a server-side problem rather than a bad
//! upload.

use polars::prelude::PolarsError;
use thiserror::Error;

use crate::plot::PlotError;

/// Errors that can occur while building a report
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A chart failed to render
    #[error("Plot generation failed: {0}")]
    Plot(#[from] PlotError),

    /// A dataframe computation failed
    #[error("Statistics failed: {0}")]
    Frame(#[from] PolarsError),
}
