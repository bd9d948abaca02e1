//! Bilinear four-corner gradient fill.
//!
//! Corner order is `[top-left, top-right, bottom-left, bottom-right]`: the top
//! edge blends `corners[0] -> corners[1]`, the bottom edge `corners[2] ->
//! corners[3]`, and each column blends top to bottom.

use std::str::FromStr;

use serde::Deserialize;

use crate::color::{Color, OPAQUE};
use crate::surface::{Surface, BYTES_PER_PIXEL};

pub type CornerColors = [Color; 4];

/// How pixel positions map onto the `[0, 1]` blend parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GradientSpan {
    /// `x / (W - 1)`: the last row and column land exactly on the corner colors.
    #[default]
    Inclusive,
    /// `x / W`: the last row and column stop one step short of the corners.
    HalfOpen,
}

impl FromStr for GradientSpan {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "inclusive" => Ok(GradientSpan::Inclusive),
            "half-open" | "halfopen" => Ok(GradientSpan::HalfOpen),
            other => Err(format!(
                "unsupported gradient span {other:?}; expected inclusive or half-open"
            )),
        }
    }
}

impl GradientSpan {
    fn end(self, extent: u32) -> f64 {
        match self {
            GradientSpan::Inclusive => f64::from(extent.saturating_sub(1)),
            GradientSpan::HalfOpen => f64::from(extent),
        }
    }
}

pub fn interpolate(pos: f64, start: f64, end: f64, value_start: f64, value_end: f64) -> f64 {
    value_start + (value_end - value_start) * ((pos - start) / (end - start))
}

fn blend_axis(pos: f64, end: f64, from: f64, to: f64) -> f64 {
    if end <= 0.0 {
        return from;
    }
    interpolate(pos, 0.0, end, from, to)
}

fn to_channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0).round_ties_even() as u8
}

pub fn render(surface: &mut Surface, corners: &CornerColors) {
    render_with(surface, corners, GradientSpan::default());
}

/// Redraws the whole surface. Alpha is forced opaque regardless of the corners.
pub fn render_with(surface: &mut Surface, corners: &CornerColors, span: GradientSpan) {
    let (width, height) = surface.size();
    if width == 0 || height == 0 {
        tracing::trace!(width, height, "skip gradient fill for empty surface");
        return;
    }

    let x_end = span.end(width);
    let y_end = span.end(height);
    let [top_left, top_right, bottom_left, bottom_right] = (*corners).map(|color| {
        [
            f64::from(color.r),
            f64::from(color.g),
            f64::from(color.b),
        ]
    });

    let row_len = width as usize * BYTES_PER_PIXEL;
    for (y, row) in surface.pixels_mut().chunks_exact_mut(row_len).enumerate() {
        let y = y as f64;
        for (x, pixel) in row.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
            let x = x as f64;
            for channel in 0..3 {
                let top = blend_axis(x, x_end, top_left[channel], top_right[channel]);
                let bottom = blend_axis(x, x_end, bottom_left[channel], bottom_right[channel]);
                pixel[channel] = to_channel(blend_axis(y, y_end, top, bottom));
            }
            pixel[3] = OPAQUE;
        }
    }
    tracing::trace!(width, height, ?span, "filled gradient");
}
