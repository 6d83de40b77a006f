//! Kitty Graphics Protocol rasterizer
//!
//! Sends the composite as a PNG for pixel-perfect rendering.
//! Supported by: Kitty, WezTerm, Ghostty
//!
//! Protocol: <https://sw.kovidgoyal.net/kitty/graphics-protocol/>

use std::fmt::Write as _;
use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use image::{ImageFormat, RgbImage};

use super::caps::TerminalCaps;
use super::rasterizer::{RasterOutput, Rasterizer};
use crate::errors::Result;

/// Maximum payload bytes per escape sequence
const CHUNK_SIZE: usize = 4096;

/// Kitty Graphics Protocol rasterizer
#[derive(Debug, Default)]
pub struct KittyRasterizer;

impl KittyRasterizer {
    pub fn new() -> Self {
        Self
    }

    /// Encode image as PNG
    fn encode_png(&self, image: &RgbImage) -> Result<Vec<u8>> {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }

    /// Build Kitty Graphics Protocol escape sequence
    ///
    /// `a=T` transmit and display, `f=100` PNG, `q=2` suppress response,
    /// `c` display width in columns.
    fn build_kitty_sequence(&self, b64: &str, width: u32, height: u32, cols: u16) -> String {
        let mut result = String::new();
        let mut rest = b64;
        let mut first = true;

        loop {
            // base64 is ASCII, any byte index is a char boundary
            let (chunk, tail) = rest.split_at(rest.len().min(CHUNK_SIZE));
            let more = u8::from(!tail.is_empty());

            result.push_str("\x1b_G");
            if first {
                let _ = write!(result, "a=T,f=100,q=2,s={width},v={height},c={cols},m={more};{chunk}");
                first = false;
            } else {
                let _ = write!(result, "m={more};{chunk}");
            }
            result.push_str("\x1b\\");

            if tail.is_empty() {
                break;
            }
            rest = tail;
        }

        result.push('\n');
        result
    }
}

impl Rasterizer for KittyRasterizer {
    fn rasterize(&self, image: &RgbImage, caps: &TerminalCaps) -> Result<RasterOutput> {
        let png = self.encode_png(image)?;
        let b64 = BASE64.encode(&png);
        let (width, height) = image.dimensions();
        let cols = caps.cols.min(u16::try_from(width).unwrap_or(u16::MAX));
        Ok(RasterOutput::Escape(self.build_kitty_sequence(&b64, width, height, cols)))
    }

    fn name(&self) -> &'static str {
        "Kitty"
    }
}
