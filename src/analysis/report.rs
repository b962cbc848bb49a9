//! Full EDA report for one uploaded table

use serde::Serialize;
use tracing::{debug, warn};

use super::{
    describe, summarize, value_counts, AnalysisError, ColumnMap, ColumnStats, ColumnSummary,
    CorrelationMatrix,
};
use crate::config::AnalysisConfig;
use crate::dataset::DataTable;
use crate::plot::{bar, heatmap, histogram};

/// JSON body returned by a successful upload
#[derive(Debug, Serialize)]
pub struct EdaReport {
    /// Sanitised name of the uploaded file
    pub filename: String,
    /// `(rows, columns)`
    pub shape: (usize, usize),
    /// Per-column overview
    pub summary: Vec<ColumnSummary>,
    /// Describe table keyed by column
    pub descriptive_stats: ColumnMap<ColumnStats>,
    /// Histogram grid (base64 PNG); `None` without numeric columns
    pub numerical_distribution: Option<String>,
    /// Bar chart (base64 PNG) per text column
    pub categorical_distributions: ColumnMap<String>,
    /// Correlation heatmap (base64 PNG); `None` with fewer than two numeric columns
    pub correlation_plot: Option<String>,
    /// Raw coefficients behind `correlation_plot`
    pub correlation_matrix: Option<CorrelationMatrix>,
}

/// Compute every statistic and render every chart for `table`.
///
/// # Arguments
/// * `filename` - Name echoed back in the report
/// * `table` - Parsed upload
/// * `config` - Histogram bins and the chart caps
///
/// # Returns
/// * `Ok(EdaReport)` - Report ready to serialize
/// * `Err(AnalysisError)` - A statistic or a chart failed
pub fn build_report(
    filename: String,
    table: &DataTable,
    config: &AnalysisConfig,
) -> Result<EdaReport, AnalysisError> {
    let summary = summarize(table)?;
    let descriptive_stats = describe(table)?;

    let numeric = table.numeric_columns()?;
    if numeric.len() > config.max_histogram_panels {
        warn!(
            numeric_columns = numeric.len(),
            max_histogram_panels = config.max_histogram_panels,
            "Histogram grid limited to the first columns"
        );
    }
    let numerical_distribution = if numeric.is_empty() {
        None
    } else {
        let samples: Vec<(&str, Vec<f64>)> = numeric
            .iter()
            .take(config.max_histogram_panels)
            .map(|(name, values)| (*name, values.iter().flatten().collect()))
            .collect();
        Some(histogram::render_grid(&samples, config.histogram_bins)?)
    };
    debug!(numeric_columns = numeric.len(), "Histograms rendered");

    let mut categorical_distributions = ColumnMap::new();
    for (name, values) in table.text_columns()? {
        let counts = value_counts(values.into_iter().flatten());
        let chart = bar::render(name, &counts, config.max_categories)?;
        categorical_distributions.insert(name.to_string(), chart);
    }
    debug!(
        text_columns = categorical_distributions.len(),
        "Bar charts rendered"
    );

    if numeric.len() > config.max_correlation_columns {
        warn!(
            numeric_columns = numeric.len(),
            max_correlation_columns = config.max_correlation_columns,
            "Correlation matrix limited to the first columns"
        );
    }
    let correlated = &numeric[..numeric.len().min(config.max_correlation_columns)];
    let correlation_matrix = CorrelationMatrix::compute(correlated);
    let correlation_plot = correlation_matrix.as_ref().map(heatmap::render).transpose()?;

    Ok(EdaReport {
        filename,
        shape: table.shape(),
        summary,
        descriptive_stats,
        numerical_distribution,
        categorical_distributions,
        correlation_plot,
        correlation_matrix,
    })
}
