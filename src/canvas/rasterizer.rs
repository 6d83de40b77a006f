//! Rasterizer trait for turning a composite into terminal output

use std::fmt::Write as _;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::caps::{GraphicsProtocol, TerminalCaps};
use super::color::Rgb;
use crate::errors::Result;

/// Output from rasterizer
#[derive(Debug, Clone)]
pub enum RasterOutput {
    /// Raw escape sequence (for Kitty)
    Escape(String),
    /// Lines of styled text
    Lines(Vec<StyledLine>),
}

/// A single terminal cell with foreground and background colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyledCell {
    /// Character to display
    pub ch: char,
    /// Foreground color
    pub fg: Rgb,
    /// Background color
    pub bg: Rgb,
}

impl Default for StyledCell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Rgb::WHITE,
            bg: Rgb::BLACK,
        }
    }
}

/// A line of styled text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyledLine {
    pub cells: Vec<StyledCell>,
}

impl RasterOutput {
    /// Printable form: escapes pass through, lines become 24-bit ANSI text
    pub fn to_ansi(&self) -> String {
        match self {
            RasterOutput::Escape(seq) => seq.clone(),
            RasterOutput::Lines(lines) => {
                let mut out = String::new();
                for line in lines {
                    for cell in &line.cells {
                        let style = nu_ansi_term::Style::new()
                            .fg(cell.fg.into())
                            .on(cell.bg.into());
                        let _ = write!(out, "{}", style.paint(cell.ch.to_string()));
                    }
                    out.push('\n');
                }
                out
            }
        }
    }
}

/// Which previewer to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreviewMode {
    /// Kitty when the terminal speaks it, half blocks otherwise
    #[default]
    Auto,
    HalfBlock,
    Kitty,
    None,
}

impl std::str::FromStr for PreviewMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "halfblock" | "half-block" => Ok(Self::HalfBlock),
            "kitty" => Ok(Self::Kitty),
            "none" | "off" => Ok(Self::None),
            other => Err(format!("unknown preview mode '{other}'")),
        }
    }
}

/// Trait for rasterizers that convert a composite to terminal output
pub trait Rasterizer: Send + Sync {
    /// Convert image to terminal output
    fn rasterize(&self, image: &RgbImage, caps: &TerminalCaps) -> Result<RasterOutput>;

    /// Name of this rasterizer
    fn name(&self) -> &'static str;
}

/// Select the rasterizer for a mode and terminal; `None` disables previews
pub fn select_rasterizer(mode: PreviewMode, caps: &TerminalCaps) -> Option<Box<dyn Rasterizer>> {
    use super::halfblock::HalfBlockRasterizer;
    use super::kitty::KittyRasterizer;

    match mode {
        PreviewMode::None => None,
        PreviewMode::Kitty => Some(Box::new(KittyRasterizer::new())),
        PreviewMode::HalfBlock => Some(Box::new(HalfBlockRasterizer::new())),
        PreviewMode::Auto => match caps.graphics {
            GraphicsProtocol::Kitty => Some(Box::new(KittyRasterizer::new())),
            GraphicsProtocol::None if caps.unicode && caps.true_color => {
                Some(Box::new(HalfBlockRasterizer::new()))
            }
            GraphicsProtocol::None => None,
        },
    }
}
