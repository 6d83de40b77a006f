//! `HalfBlock` rasterizer - Universal fallback using ▀▄█ characters
//!
//! Each terminal cell represents 2 vertical "pixels":
//! - Top pixel = foreground color
//! - Bottom pixel = background color
//!
//! Characters used:
//! - ▀ (upper half block): top = fg, bottom = bg
//! - ▄ (lower half block): top = bg, bottom = fg
//! - █ (full block): both = fg
//! - ' ' (space): both = bg

use image::RgbImage;

use super::caps::TerminalCaps;
use super::color::Rgb;
use super::rasterizer::{RasterOutput, Rasterizer, StyledCell, StyledLine};
use crate::errors::Result;

/// Half-block rasterizer
///
/// Renders 2 vertical pixels per cell using ▀▄█ characters.
/// Never upscales: at most one terminal column per image pixel.
#[derive(Debug, Default)]
pub struct HalfBlockRasterizer;

impl HalfBlockRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Convert image to half-block grid `cols` wide, keeping the aspect ratio
    fn rasterize_to_cells(&self, image: &RgbImage, cols: u16) -> Vec<Vec<StyledCell>> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 || cols == 0 {
            return Vec::new();
        }

        let cols = u32::from(cols).min(width);
        let scale = f64::from(width) / f64::from(cols);
        // 2 subpixels per row
        let rows = (f64::from(height) / scale / 2.0).ceil().max(1.0) as u32;

        let sample = |x: f64, y: f64| -> Rgb {
            let px = (x as u32).min(width - 1);
            let py = (y as u32).min(height - 1);
            (*image.get_pixel(px, py)).into()
        };

        let mut result = Vec::with_capacity(rows as usize);
        for row in 0..rows {
            let mut line = Vec::with_capacity(cols as usize);

            for col in 0..cols {
                let x = f64::from(col) * scale;
                let top = sample(x, f64::from(row) * 2.0 * scale);
                let bot = sample(x, (f64::from(row) * 2.0 + 1.0) * scale);

                let (ch, fg, bg) = self.select_halfblock(&top, &bot);
                line.push(StyledCell { ch, fg, bg });
            }

            result.push(line);
        }

        result
    }

    /// Select the half-block character and colors for a top/bottom pair
    fn select_halfblock(&self, top: &Rgb, bot: &Rgb) -> (char, Rgb, Rgb) {
        if top.distance(bot) < 0.05 {
            if top.luminance() < 0.05 {
                // Very dark - use space with black bg
                return (' ', Rgb::BLACK, *top);
            }
            return ('█', *top, *top);
        }

        // Lighter half goes in the foreground
        if top.luminance() >= bot.luminance() {
            ('▀', *top, *bot)
        } else {
            ('▄', *bot, *top)
        }
    }
}

impl Rasterizer for HalfBlockRasterizer {
    fn rasterize(&self, image: &RgbImage, caps: &TerminalCaps) -> Result<RasterOutput> {
        let lines = self
            .rasterize_to_cells(image, caps.cols)
            .into_iter()
            .map(|row| StyledLine { cells: row })
            .collect();
        Ok(RasterOutput::Lines(lines))
    }

    fn name(&self) -> &'static str {
        "HalfBlock"
    }
}
