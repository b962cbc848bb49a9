//! Annotated correlation heatmap

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

use super::colormap::{contrast_text, coolwarm, MISSING_COLOR};
use super::{render_png, truncate_label, Canvas, PlotError, FONT};
use crate::analysis::CorrelationMatrix;

/// Figure size in pixels
pub const FIGURE_SIZE: (u32, u32) = (1000, 800);

/// Width of the colour bar strip on the right
const COLORBAR_STRIP: i32 = 110;
const MAX_LABEL_CHARS: usize = 16;

/// Render the heatmap for a correlation matrix.
pub fn render(matrix: &CorrelationMatrix) -> Result<String, PlotError> {
    render_png(FIGURE_SIZE.0, FIGURE_SIZE.1, |root| draw(root, matrix))
}

fn draw(root: &Canvas<'_>, matrix: &CorrelationMatrix) -> Result<(), PlotError> {
    let area = root.titled("Correlation Heatmap", (FONT, 24).into_font())?;
    let (width, _) = area.dim_in_pixel();
    let (grid_area, bar_area) = area.split_horizontally(width as i32 - COLORBAR_STRIP);

    let k = matrix.len() as f64;
    let longest = matrix
        .columns
        .iter()
        .map(|c| c.chars().count().min(MAX_LABEL_CHARS))
        .max()
        .unwrap_or(1);
    let label_area = (longest as i32 * 8 + 16).clamp(40, 150);

    let mut chart = ChartBuilder::on(&grid_area)
        .margin(10)
        .x_label_area_size(label_area)
        .y_label_area_size(label_area)
        .build_cartesian_2d(0f64..k, 0f64..k)?;

    // Row 0 at the top
    let cell = |i: usize, j: usize| {
        let top = k - i as f64;
        ([(j as f64, top), (j as f64 + 1.0, top - 1.0)], (j as f64 + 0.5, top - 0.5))
    };

    chart.draw_series(matrix.values.iter().enumerate().flat_map(|(i, row)| {
        row.iter().enumerate().map(move |(j, value)| {
            let fill = value.map(coolwarm).unwrap_or(MISSING_COLOR);
            Rectangle::new(cell(i, j).0, fill.filled())
        })
    }))?;

    let annotation_font = match matrix.len() {
        0..=8 => (FONT, 16),
        9..=16 => (FONT, 12),
        _ => (FONT, 9),
    };
    for (i, row) in matrix.values.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            let Some(r) = value else { continue };
            let text_color = contrast_text(coolwarm(*r));
            let style = annotation_font
                .into_font()
                .color(&text_color)
                .pos(Pos::new(HPos::Center, VPos::Center));
            chart
                .plotting_area()
                .draw(&Text::new(format!("{r:.2}"), cell(i, j).1, style))?;
        }
    }

    let x_label_style = (FONT, 13).into_font().transform(FontTransform::Rotate90);
    let y_label_style = (FONT, 13)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Center));
    for (idx, name) in matrix.columns.iter().enumerate() {
        let label = truncate_label(name, MAX_LABEL_CHARS);

        let (x, y) = chart.backend_coord(&(idx as f64 + 0.5, 0.0));
        root.draw(&Text::new(label.clone(), (x + 7, y + 6), x_label_style.clone()))?;

        let (x, y) = chart.backend_coord(&(0.0, k - idx as f64 - 0.5));
        root.draw(&Text::new(label, (x - 6, y), y_label_style.clone()))?;
    }

    draw_colorbar(&bar_area)
}

/// Vertical gradient from +1 (top) to -1 (bottom) with tick labels.
fn draw_colorbar(area: &Canvas<'_>) -> Result<(), PlotError> {
    let (_, height) = area.dim_in_pixel();
    let (x0, x1) = (15, 40);
    let top = 20;
    let bottom = (height as i32 - 40).max(top + 1);
    let span = (bottom - top) as f64;

    for y in top..bottom {
        let value = 1.0 - 2.0 * (y - top) as f64 / span;
        area.draw(&Rectangle::new([(x0, y), (x1, y + 1)], coolwarm(value).filled()))?;
    }
    area.draw(&Rectangle::new([(x0, top), (x1, bottom)], BLACK.stroke_width(1)))?;

    let tick_style = (FONT, 13)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for tick in [1.0, 0.5, 0.0, -0.5, -1.0] {
        let y = top + ((1.0 - tick) / 2.0 * span).round() as i32;
        area.draw(&PathElement::new(vec![(x1, y), (x1 + 4, y)], BLACK))?;
        area.draw(&Text::new(format!("{tick:.1}"), (x1 + 8, y), tick_style.clone()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plot::encode::decode_base64;

    #[test]
    fn test_render_heatmap() {
        let matrix = CorrelationMatrix {
            columns: vec!["height".to_string(), "weight".to_string(), "flat".to_string()],
            values: vec![
                vec![Some(1.0), Some(0.83), None],
                vec![Some(0.83), Some(1.0), None],
                vec![None, None, None],
            ],
        };
        let encoded = render(&matrix).expect("render");
        let png = decode_base64(&encoded).expect("base64");
        assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));
    }
}
