//! Histogram grid for the numeric columns
//!
//! One figure, three panels per row, one panel per numeric column.

use plotters::prelude::*;

use super::{render_png, Canvas, PlotError, BAR_COLOR, FONT};
use crate::analysis::scale::range_scale;

/// Panels per grid row
pub const GRID_COLUMNS: usize = 3;
/// Figure width in pixels
pub const FIGURE_WIDTH: u32 = 1500;
/// Height of one grid row in pixels
pub const ROW_HEIGHT: u32 = 500;

/// Equal-width bin counts over `[lo, hi]`
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// Left edge of the first bin
    pub lo: f64,
    /// Right edge of the last bin
    pub hi: f64,
    /// Count per bin
    pub counts: Vec<u64>,
}

impl Histogram {
    /// Bin the finite values into `bins` equal-width bins. The last bin is
    /// closed on the right. A constant sample is centred in a unit range
    /// (wider for large magnitudes).
    ///
    /// Binning runs on values divided by a power of two, so a sample whose
    /// span `hi - lo` exceeds `f64::MAX` is still spread across every bin.
    pub fn compute(values: &[f64], bins: usize) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }

        let bins = bins.max(1);
        let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            let pad = 0.5f64.max(lo.abs() * 1e-9);
            lo = (lo - pad).max(f64::MIN);
            hi = (hi + pad).min(f64::MAX);
        }

        let scale = range_scale(lo, hi);
        let start = lo / scale;
        let width = (hi / scale - start) / bins as f64;

        let mut counts = vec![0u64; bins];
        for v in finite {
            let idx = ((v / scale - start) / width) as usize;
            counts[idx.min(bins - 1)] += 1;
        }

        Some(Self { lo, hi, counts })
    }

    /// Value at `position` bins from the left edge (may be fractional).
    pub fn value_at(&self, position: f64) -> f64 {
        let bins = self.counts.len();
        if position <= 0.0 {
            return self.lo;
        }
        if position >= bins as f64 {
            return self.hi;
        }
        let scale = range_scale(self.lo, self.hi);
        let start = self.lo / scale;
        let width = (self.hi / scale - start) / bins as f64;
        (start + width * position) * scale
    }

    /// `(start, end, count)` for every bin
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64, u64)> + '_ {
        self.counts.iter().enumerate().map(move |(i, &count)| {
            (self.value_at(i as f64), self.value_at((i + 1) as f64), count)
        })
    }
}

/// Axis tick text: scientific notation for very large or very small values.
pub fn format_tick(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-3..1e5).contains(&magnitude) {
        format!("{value:.1e}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Render the grid for `columns` (name, non-missing values).
pub fn render_grid(columns: &[(&str, Vec<f64>)], bins: usize) -> Result<String, PlotError> {
    let rows = columns.len().div_ceil(GRID_COLUMNS).max(1);
    let height = u32::try_from(rows).unwrap_or(u32::MAX).saturating_mul(ROW_HEIGHT);
    render_png(FIGURE_WIDTH, height, |root| draw_grid(root, columns, bins, rows))
}

fn draw_grid(
    root: &Canvas<'_>,
    columns: &[(&str, Vec<f64>)],
    bins: usize,
    rows: usize,
) -> Result<(), PlotError> {
    let panels = root.split_evenly((rows, GRID_COLUMNS));
    for (panel, (name, values)) in panels.iter().zip(columns) {
        draw_panel(panel, name, values, bins)?;
    }
    Ok(())
}

fn draw_panel(panel: &Canvas<'_>, name: &str, values: &[f64], bins: usize) -> Result<(), PlotError> {
    let title = format!("Distribution of {name}");

    let Some(hist) = Histogram::compute(values, bins) else {
        // Column has no values at all: keep the title so the panel is not anonymous
        panel.titled(&title, (FONT, 20).into_font())?;
        return Ok(());
    };

    let y_max = hist.counts.iter().copied().max().unwrap_or(0).max(1) as f64 * 1.05;
    let n_bins = hist.counts.len() as f64;

    // The x axis runs over bin positions; tick labels map back to values
    let mut chart = ChartBuilder::on(panel)
        .caption(&title, (FONT, 20).into_font())
        .margin(15)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..n_bins, 0f64..y_max)?;

    let x_label = |x: &f64| format_tick(hist.value_at(*x));
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(6)
        .y_labels(6)
        .x_label_formatter(&x_label)
        .label_style((FONT, 13))
        .draw()?;

    chart.draw_series(hist.counts.iter().enumerate().map(|(i, &count)| {
        Rectangle::new([(i as f64, 0.0), ((i + 1) as f64, count as f64)], BAR_COLOR.filled())
    }))?;

    Ok(())
}
