//! Embedded font registration
//!
//! Charts are rendered without any system font lookup: DejaVu Sans ships
//! inside the binary and is registered with plotters once per process.

use std::sync::OnceLock;

use plotters::style::{register_font, FontStyle};

use super::{PlotError, FONT};

static SANS_SERIF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

static REGISTERED: OnceLock<Result<(), String>> = OnceLock::new();

/// Register the embedded font under [`FONT`]; later calls are no-ops.
pub fn ensure_registered() -> Result<(), PlotError> {
    REGISTERED
        .get_or_init(|| {
            register_font(FONT, FontStyle::Normal, SANS_SERIF)
                .map_err(|_| "embedded font is not a valid TrueType file".to_string())
        })
        .clone()
        .map_err(PlotError::Font)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_registered_is_idempotent() {
        ensure_registered().expect("first registration");
        ensure_registered().expect("second registration");
    }
}
