//! Cool-warm colour map for the correlation heatmap.
//!
//! Colours are interpolated in CIE L*a*b* between a blue, a grey and a red
//! anchor. Undefined coefficients get [`MISSING_COLOR`].

use palette::{IntoColor, Lab, Mix, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Diverging colour map for correlation coefficients
// ---------------------------------------------------------------------------

/// Blue end of the cool-warm map (value -1)
const COOL: (f32, f32, f32) = (0.230, 0.299, 0.754);
/// Neutral midpoint (value 0)
const NEUTRAL: (f32, f32, f32) = (0.865, 0.865, 0.865);
/// Red end of the cool-warm map (value +1)
const WARM: (f32, f32, f32) = (0.706, 0.016, 0.150);

/// Fill used for undefined coefficients
pub const MISSING_COLOR: RGBColor = RGBColor(235, 235, 235);

/// Map a coefficient in `[-1, 1]` to a blue-grey-red colour.
///
/// Interpolation happens in CIE L*a*b* so the perceived lightness changes
/// evenly from each end towards the neutral midpoint.
pub fn coolwarm(value: f64) -> RGBColor {
    let v = value.clamp(-1.0, 1.0) as f32;
    let (from, to, t) = if v < 0.0 {
        (COOL, NEUTRAL, v + 1.0)
    } else {
        (NEUTRAL, WARM, v)
    };

    let from: Lab = Srgb::new(from.0, from.1, from.2).into_color();
    let to: Lab = Srgb::new(to.0, to.1, to.2).into_color();
    let rgb: Srgb = from.mix(to, t).into_color();

    RGBColor(channel(rgb.red), channel(rgb.green), channel(rgb.blue))
}

/// Text colour that stays readable on top of `fill`.
pub fn contrast_text(fill: RGBColor) -> RGBColor {
    let RGBColor(r, g, b) = fill;
    let luma = 0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64;
    if luma < 140.0 {
        RGBColor(255, 255, 255)
    } else {
        RGBColor(0, 0, 0)
    }
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coolwarm_endpoints() {
        let RGBColor(r, _, b) = coolwarm(-1.0);
        assert!(b > r, "negative end should be blue");

        let RGBColor(r, _, b) = coolwarm(1.0);
        assert!(r > b, "positive end should be red");

        let RGBColor(r, g, b) = coolwarm(0.0);
        assert!(r.abs_diff(g) <= 2 && g.abs_diff(b) <= 2, "midpoint should be grey");
    }

    #[test]
    fn test_coolwarm_clamps_out_of_range() {
        assert_eq!(coolwarm(5.0), coolwarm(1.0));
        assert_eq!(coolwarm(-5.0), coolwarm(-1.0));
    }

    #[test]
    fn test_contrast_text() {
        assert_eq!(contrast_text(RGBColor(20, 20, 120)), RGBColor(255, 255, 255));
        assert_eq!(contrast_text(RGBColor(230, 230, 230)), RGBColor(0, 0, 0));
    }
}
