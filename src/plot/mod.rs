//! Plot rendering
//!
//! Draws the exploratory charts into an in-memory RGB buffer with plotters,
//! then encodes them as base64 PNG strings ready to embed in JSON.

pub mod bar;
pub mod colormap;
pub mod encode;
pub mod font;
pub mod heatmap;
pub mod histogram;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use thiserror::Error;

/// Font family every chart uses (registered from the embedded font)
pub const FONT: &str = "sans-serif";

/// Bar and histogram fill
pub const BAR_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Largest figure side, in pixels (matplotlib refuses 2^16 and above)
pub const MAX_FIGURE_SIDE: u32 = 65_535;

/// Drawing area over a whole figure, in pixel coordinates
pub type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Errors that can occur while rendering a chart
#[derive(Error, Debug)]
pub enum PlotError {
    /// The embedded font could not be loaded
    #[error("Font unavailable: {0}")]
    Font(String),

    /// plotters failed while drawing
    #[error("Drawing failed: {0}")]
    Render(String),

    /// The requested figure exceeds [`MAX_FIGURE_SIDE`] on one side
    #[error("Figure of {width}x{height} pixels exceeds the {} pixel limit", MAX_FIGURE_SIDE)]
    TooLarge {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },

    /// The pixel buffer could not be encoded as PNG
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Render(err.to_string())
    }
}

/// Render a `width` x `height` figure and return it as base64 PNG.
///
/// Figures larger than [`MAX_FIGURE_SIDE`] on either side are refused
/// before the pixel buffer is allocated.
pub fn render_png<F>(width: u32, height: u32, draw: F) -> Result<String, PlotError>
where
    F: FnOnce(&Canvas<'_>) -> Result<(), PlotError>,
{
    if width > MAX_FIGURE_SIDE || height > MAX_FIGURE_SIDE {
        return Err(PlotError::TooLarge { width, height });
    }
    font::ensure_registered()?;

    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE)?;
        draw(&root)?;
        root.present()?;
    }

    encode::png_base64(&buffer, width, height)
}

/// Shorten a label to `max_chars`, marking the cut with an ellipsis.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_string()
    } else {
        let head: String = label.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("short", 10), "short");
        assert_eq!(truncate_label("a much longer label", 6), "a muc…");
    }

    #[test]
    fn test_render_png_blank_figure() {
        let png = render_png(40, 30, |_| Ok(())).expect("blank figure renders");
        let bytes = encode::decode_base64(&png).expect("valid base64");
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn test_render_png_refuses_oversized_figures() {
        let result = render_png(10, 70_000, |_| panic!("must not draw"));
        match result {
            Err(PlotError::TooLarge { width, height }) => {
                assert_eq!(width, 10);
                assert_eq!(height, 70_000);
            }
            other => panic!("Expected TooLarge error, got: {:?}", other),
        }
    }

    #[test]
    fn test_render_png_propagates_draw_errors() {
        let result = render_png(10, 10, |_| Err(PlotError::Render("boom".to_string())));
        match result {
            Err(PlotError::Render(msg)) => assert_eq!(msg, "boom"),
            other => panic!("Expected Render error, got: {:?}", other),
        }
    }
}
