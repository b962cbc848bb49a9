//! Value-count bar chart for one categorical column

use plotters::prelude::*;
use plotters::style::FontTransform;

use super::{render_png, truncate_label, Canvas, PlotError, BAR_COLOR, FONT};

/// Figure size in pixels
pub const FIGURE_SIZE: (u32, u32) = (1000, 500);

/// Labels longer than this are cut
const MAX_LABEL_CHARS: usize = 16;
/// Space reserved under the axis for the rotated labels
const LABEL_AREA: i32 = 130;

/// Render the bar chart for `column`; `counts` must be sorted most frequent
/// first. Only the first `max_bars` categories are drawn.
pub fn render(column: &str, counts: &[(&str, usize)], max_bars: usize) -> Result<String, PlotError> {
    let shown = &counts[..counts.len().min(max_bars)];
    render_png(FIGURE_SIZE.0, FIGURE_SIZE.1, |root| draw(root, column, shown))
}

fn draw(root: &Canvas<'_>, column: &str, counts: &[(&str, usize)]) -> Result<(), PlotError> {
    let n = counts.len().max(1) as f64;
    let y_max = counts.iter().map(|(_, c)| *c).max().unwrap_or(0).max(1) as f64 * 1.05;

    let mut chart = ChartBuilder::on(root)
        .caption(format!("Distribution of {column}"), (FONT, 22).into_font())
        .margin(15)
        .x_label_area_size(LABEL_AREA)
        .y_label_area_size(55)
        .build_cartesian_2d(0f64..n, 0f64..y_max)?;

    // Category names are drawn by hand below; the numeric x axis means nothing
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_x_axis()
        .y_labels(8)
        .label_style((FONT, 13))
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, (_, count))| {
        let x = i as f64;
        Rectangle::new([(x + 0.1, 0.0), (x + 0.9, *count as f64)], BAR_COLOR.filled())
    }))?;

    let label_style = (FONT, 13).into_font().transform(FontTransform::Rotate90);
    for (i, (label, _)) in counts.iter().enumerate() {
        let (x, y) = chart.backend_coord(&(i as f64 + 0.5, 0.0));
        // Rotated text extends left of its anchor by one line height
        root.draw(&Text::new(
            truncate_label(label, MAX_LABEL_CHARS),
            (x + 7, y + 6),
            label_style.clone(),
        ))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::encode::decode_base64;

    #[test]
    fn test_render_bar_chart() {
        let counts = vec![("red", 5), ("green", 3), ("a rather long category name", 1)];
        let encoded = render("colour", &counts, 50).expect("render");
        let png = decode_base64(&encoded).expect("base64");
        assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn test_render_bar_chart_without_values() {
        assert!(render("empty", &[], 50).is_ok());
    }

    #[test]
    fn test_render_bar_chart_caps_categories() {
        let labels: Vec<String> = (0..200).map(|i| format!("cat{i}")).collect();
        let counts: Vec<(&str, usize)> = labels.iter().map(|l| (l.as_str(), 1)).collect();
        assert!(render("many", &counts, 10).is_ok());
    }
}
