//! Per-cell color attributes

use serde::{Deserialize, Serialize};

use super::palette::{check_color, check_palette};
use crate::errors::Result;

/// Ink/paper/palette state of one 8x8 attribute cell
///
/// Fields are private so every write goes through a validating setter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeCell {
    ink: u8,
    paper: u8,
    palette: u8,
}

impl AttributeCell {
    pub fn new(ink: u8, paper: u8, palette: u8) -> Result<Self> {
        let mut cell = Self::default();
        cell.set_ink(ink)?;
        cell.set_paper(paper)?;
        cell.set_palette(palette)?;
        Ok(cell)
    }

    /// Build from a pen the caller has already validated
    #[inline]
    pub(crate) const fn from_valid(pen: Pen) -> Self {
        Self {
            ink: pen.ink,
            paper: pen.paper,
            palette: pen.palette,
        }
    }

    #[inline]
    pub fn ink(&self) -> u8 {
        self.ink
    }

    #[inline]
    pub fn paper(&self) -> u8 {
        self.paper
    }

    #[inline]
    pub fn palette(&self) -> u8 {
        self.palette
    }

    pub fn set_ink(&mut self, index: u8) -> Result<()> {
        check_color("ink index", index)?;
        self.ink = index;
        Ok(())
    }

    pub fn set_paper(&mut self, index: u8) -> Result<()> {
        check_color("paper index", index)?;
        self.paper = index;
        Ok(())
    }

    pub fn set_palette(&mut self, selector: u8) -> Result<()> {
        check_palette(selector)?;
        self.palette = selector;
        Ok(())
    }

    /// The pen that would reproduce this cell
    pub fn pen(&self) -> Pen {
        Pen::new(self.ink, self.paper, self.palette)
    }
}

/// Colors carried by a drawing operation
///
/// A pen is plain data; it is validated when handed to a buffer, before any
/// state is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pen {
    pub ink: u8,
    pub paper: u8,
    pub palette: u8,
}

impl Pen {
    #[inline]
    pub const fn new(ink: u8, paper: u8, palette: u8) -> Self {
        Self { ink, paper, palette }
    }

    /// Same colors in the bright bank
    pub const fn bright(self) -> Self {
        Self { palette: 1, ..self }
    }

    pub fn validate(&self) -> Result<()> {
        check_color("ink index", self.ink)?;
        check_color("paper index", self.paper)?;
        check_palette(self.palette)
    }
}

impl Default for Pen {
    /// Black ink on white paper, normal brightness
    fn default() -> Self {
        Self::new(0, 7, 0)
    }
}
