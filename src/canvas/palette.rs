//! Fixed two-bank palette of the 8-bit attribute display
//!
//! Bank 0 is the normal (dim) set, bank 1 the bright set. Index layout inside
//! a bank follows the hardware GRB bit order: black, blue, red, magenta,
//! green, cyan, yellow, white.

use super::color::Rgb;
use crate::errors::{Result, RetroError};

/// Colors per palette bank
pub const PALETTE_SIZE: u8 = 8;

/// Number of palette banks (normal, bright)
pub const PALETTE_COUNT: u8 = 2;

/// Normal intensity bank
pub const NORMAL: [Rgb; PALETTE_SIZE as usize] = [
    Rgb::new(0, 0, 0),
    Rgb::new(0, 0, 215),
    Rgb::new(215, 0, 0),
    Rgb::new(215, 0, 215),
    Rgb::new(0, 215, 0),
    Rgb::new(0, 215, 215),
    Rgb::new(215, 215, 0),
    Rgb::new(215, 215, 215),
];

/// Full intensity bank
pub const BRIGHT: [Rgb; PALETTE_SIZE as usize] = [
    Rgb::new(0, 0, 0),
    Rgb::new(0, 0, 255),
    Rgb::new(255, 0, 0),
    Rgb::new(255, 0, 255),
    Rgb::new(0, 255, 0),
    Rgb::new(0, 255, 255),
    Rgb::new(255, 255, 0),
    Rgb::new(255, 255, 255),
];

const NAMES: [&str; PALETTE_SIZE as usize] = [
    "black", "blue", "red", "magenta", "green", "cyan", "yellow", "white",
];

/// Validate a color index
#[inline]
pub fn check_color(what: &'static str, index: u8) -> Result<()> {
    if index >= PALETTE_SIZE {
        return Err(RetroError::out_of_range(what, index, PALETTE_SIZE));
    }
    Ok(())
}

/// Validate a palette selector
#[inline]
pub fn check_palette(selector: u8) -> Result<()> {
    if selector >= PALETTE_COUNT {
        return Err(RetroError::out_of_range("palette selector", selector, PALETTE_COUNT));
    }
    Ok(())
}

/// Resolve a color index in the given bank
pub fn color_of(index: u8, selector: u8) -> Result<Rgb> {
    check_color("color index", index)?;
    check_palette(selector)?;
    Ok(resolve(index, selector))
}

/// English name of a color index; identical in both banks
pub fn name_of(index: u8, selector: u8) -> Result<&'static str> {
    check_color("color index", index)?;
    check_palette(selector)?;
    Ok(NAMES[usize::from(index)])
}

/// Lookup for indices already validated by the caller
#[inline]
pub(crate) fn resolve(index: u8, selector: u8) -> Rgb {
    let bank = if selector == 0 { &NORMAL } else { &BRIGHT };
    bank[usize::from(index & 0x07)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, (0, 0, 0))]
    #[case(1, 0, (0, 0, 215))]
    #[case(2, 1, (255, 0, 0))]
    #[case(6, 0, (215, 215, 0))]
    #[case(7, 0, (215, 215, 215))]
    #[case(7, 1, (255, 255, 255))]
    fn test_color_of(#[case] index: u8, #[case] selector: u8, #[case] rgb: (u8, u8, u8)) {
        assert_eq!(color_of(index, selector).unwrap().to_tuple(), rgb);
    }

    #[test]
    fn test_name_independent_of_brightness() {
        for i in 0..PALETTE_SIZE {
            assert_eq!(name_of(i, 0).unwrap(), name_of(i, 1).unwrap());
        }
        assert_eq!(name_of(5, 1).unwrap(), "cyan");
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(color_of(8, 0), Err(RetroError::OutOfRange { .. })));
        assert!(matches!(color_of(0, 2), Err(RetroError::OutOfRange { .. })));
        assert!(matches!(name_of(200, 0), Err(RetroError::OutOfRange { .. })));
    }

    #[test]
    fn test_bright_bank_is_full_intensity() {
        for c in BRIGHT {
            assert!([c.r, c.g, c.b].iter().all(|v| *v == 0 || *v == 255));
        }
    }
}
