//! Attribute-constrained pixel buffer
//!
//! A 1-bit mask decides, per pixel, whether the owning 8x8 cell's ink or
//! paper shows. Cell colors are expanded into two full-resolution planes so
//! compositing is a plain per-pixel select. Writes repaint at most one 8x8
//! block per plane; the composite is rebuilt lazily on read.

use std::path::Path;

use image::{ImageFormat, RgbImage};
use tracing::{debug, info};

use super::attribute::{AttributeCell, Pen};
use super::bresenham::BresenhamLine;
use super::color::Rgb;
use super::mask::BitMask;
use super::palette;
use crate::errors::{Result, RetroError};

/// Canvas width in pixels
pub const WIDTH: u32 = 256;
/// Canvas height in pixels
pub const HEIGHT: u32 = 192;
/// Attribute cell edge in pixels
pub const CELL_SIZE: u32 = 8;
/// Attribute grid width in cells
pub const ATTR_WIDTH: u32 = WIDTH / CELL_SIZE;
/// Attribute grid height in cells
pub const ATTR_HEIGHT: u32 = HEIGHT / CELL_SIZE;

/// Whether the cached composite reflects the current planes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositeState {
    /// Cached composite is valid
    Clean,
    /// Mask or a color plane changed since the last composite
    Dirty,
}

/// 256x192 pixel buffer with a 32x24 grid of ink/paper attributes
#[derive(Debug, Clone)]
pub struct AttributeBuffer {
    mask: BitMask,
    ink_plane: RgbImage,
    paper_plane: RgbImage,
    /// Row-major, indexed by `cy * ATTR_WIDTH + cx`
    cells: Vec<AttributeCell>,
    state: CompositeState,
    composite: RgbImage,
    composite_count: u64,
}

impl AttributeBuffer {
    /// Create a buffer cleared to black ink on white paper
    pub fn new() -> Self {
        Self::blank(Pen::default())
    }

    /// Create a buffer cleared to the given pen
    pub fn with_pen(pen: Pen) -> Result<Self> {
        pen.validate()?;
        Ok(Self::blank(pen))
    }

    fn blank(pen: Pen) -> Self {
        let ink = palette::resolve(pen.ink, pen.palette);
        let paper = palette::resolve(pen.paper, pen.palette);
        Self {
            mask: BitMask::new(WIDTH, HEIGHT),
            ink_plane: RgbImage::from_pixel(WIDTH, HEIGHT, ink.into()),
            paper_plane: RgbImage::from_pixel(WIDTH, HEIGHT, paper.into()),
            cells: vec![AttributeCell::from_valid(pen); (ATTR_WIDTH * ATTR_HEIGHT) as usize],
            state: CompositeState::Dirty,
            composite: RgbImage::new(WIDTH, HEIGHT),
            composite_count: 0,
        }
    }

    /// Map signed canvas coordinates to pixel coordinates, culling strays
    #[inline]
    fn pixel_in_canvas(x: i32, y: i32) -> Option<(u32, u32)> {
        let x = u32::try_from(x).ok()?;
        let y = u32::try_from(y).ok()?;
        (x < WIDTH && y < HEIGHT).then_some((x, y))
    }

    #[inline]
    fn cell_in_grid(cx: i32, cy: i32) -> Option<(u32, u32)> {
        let cx = u32::try_from(cx).ok()?;
        let cy = u32::try_from(cy).ok()?;
        (cx < ATTR_WIDTH && cy < ATTR_HEIGHT).then_some((cx, cy))
    }

    #[inline]
    fn cell_index(cx: u32, cy: u32) -> usize {
        (cy * ATTR_WIDTH + cx) as usize
    }

    #[inline]
    fn mark_dirty(&mut self) {
        self.state = CompositeState::Dirty;
    }

    /// Reset every cell to `pen` and the whole mask to paper
    pub fn clear(&mut self, pen: Pen) -> Result<()> {
        pen.validate()?;

        self.cells.fill(AttributeCell::from_valid(pen));

        let ink: image::Rgb<u8> = palette::resolve(pen.ink, pen.palette).into();
        let paper: image::Rgb<u8> = palette::resolve(pen.paper, pen.palette).into();
        self.ink_plane.pixels_mut().for_each(|p| *p = ink);
        self.paper_plane.pixels_mut().for_each(|p| *p = paper);
        self.mask.fill(false);

        self.mark_dirty();
        debug!("Cleared buffer to {:?}", pen);
        Ok(())
    }

    /// Set the mask bit at a pixel and recolor its cell
    ///
    /// Coordinates outside the canvas are ignored.
    pub fn set_pixel(&mut self, x: i32, y: i32, pen: Pen) -> Result<()> {
        self.write_pixel(x, y, pen, true)
    }

    /// Clear the mask bit at a pixel and recolor its cell
    ///
    /// The pen still lands on the whole covering cell, so other ink pixels
    /// in that cell change color as well.
    pub fn erase_pixel(&mut self, x: i32, y: i32, pen: Pen) -> Result<()> {
        self.write_pixel(x, y, pen, false)
    }

    fn write_pixel(&mut self, x: i32, y: i32, pen: Pen, ink: bool) -> Result<()> {
        pen.validate()?;
        let Some((px, py)) = Self::pixel_in_canvas(x, y) else {
            return Ok(());
        };
        self.apply_attr(px / CELL_SIZE, py / CELL_SIZE, pen);
        self.mask.set(px, py, ink);
        self.mark_dirty();
        Ok(())
    }

    /// Recolor the cell covering pixel `(x, y)`
    ///
    /// Coordinates outside the canvas are ignored.
    pub fn set_attr(&mut self, x: i32, y: i32, pen: Pen) -> Result<()> {
        pen.validate()?;
        if let Some((px, py)) = Self::pixel_in_canvas(x, y) {
            self.apply_attr(px / CELL_SIZE, py / CELL_SIZE, pen);
        }
        Ok(())
    }

    /// Recolor the cell at attribute-grid coordinates `(cx, cy)`
    ///
    /// Coordinates outside the 32x24 grid are ignored.
    pub fn set_cell_attr(&mut self, cx: i32, cy: i32, pen: Pen) -> Result<()> {
        pen.validate()?;
        if let Some((cx, cy)) = Self::cell_in_grid(cx, cy) {
            self.apply_attr(cx, cy, pen);
        }
        Ok(())
    }

    /// Write a validated pen into a cell, repainting only the planes whose
    /// resolved color can have changed
    fn apply_attr(&mut self, cx: u32, cy: u32, pen: Pen) {
        let cell = &mut self.cells[Self::cell_index(cx, cy)];

        let palette_changed = cell.palette() != pen.palette;
        let ink_changed = palette_changed || cell.ink() != pen.ink;
        let paper_changed = palette_changed || cell.paper() != pen.paper;
        *cell = AttributeCell::from_valid(pen);

        if ink_changed {
            fill_block(&mut self.ink_plane, cx, cy, palette::resolve(pen.ink, pen.palette));
        }
        if paper_changed {
            fill_block(&mut self.paper_plane, cx, cy, palette::resolve(pen.paper, pen.palette));
        }
        if ink_changed || paper_changed {
            self.mark_dirty();
        }
    }

    /// Draw an inclusive line of ink pixels, recoloring every cell it crosses
    ///
    /// Points that fall outside the canvas are stepped over without writing;
    /// the off-canvas stretch along the dominant axis is skipped outright.
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, pen: Pen) -> Result<()> {
        pen.validate()?;

        let line = BresenhamLine::new((x1, y1), (x2, y2));
        let mut plotted = 0usize;
        for (x, y) in line.clipped(WIDTH, HEIGHT) {
            if let Some((px, py)) = Self::pixel_in_canvas(x, y) {
                self.apply_attr(px / CELL_SIZE, py / CELL_SIZE, pen);
                self.mask.set(px, py, true);
                plotted += 1;
            }
        }

        self.mark_dirty();
        debug!(
            "Line ({}, {}) -> ({}, {}): {} of {} points on canvas",
            x1,
            y1,
            x2,
            y2,
            plotted,
            line.len()
        );
        Ok(())
    }

    /// Final image: ink where the mask is set, paper elsewhere
    ///
    /// Rebuilt only when something changed since the previous call.
    pub fn composite(&mut self) -> &RgbImage {
        if self.state == CompositeState::Dirty {
            for (x, y, out) in self.composite.enumerate_pixels_mut() {
                *out = if self.mask.get(x, y).unwrap_or(false) {
                    *self.ink_plane.get_pixel(x, y)
                } else {
                    *self.paper_plane.get_pixel(x, y)
                };
            }
            self.composite_count += 1;
            self.state = CompositeState::Clean;
            debug!("Recomposited buffer (pass {})", self.composite_count);
        }
        &self.composite
    }

    /// Composite color of one pixel
    pub fn pixel(&mut self, x: i32, y: i32) -> Option<Rgb> {
        let (px, py) = Self::pixel_in_canvas(x, y)?;
        Some((*self.composite().get_pixel(px, py)).into())
    }

    /// Write the composite to `path`, format chosen from the extension
    pub fn save_image(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ImageFormat::from_path(path)?;
        self.save_image_as(path, format)
    }

    /// Write the composite to `path` in an explicit format
    pub fn save_image_as(&mut self, path: impl AsRef<Path>, format: ImageFormat) -> Result<()> {
        let path = path.as_ref();
        if !format.can_write() {
            return Err(RetroError::Image(format!("{format:?} cannot be written")));
        }
        self.composite().save_with_format(path, format)?;
        info!("Saved {}x{} {:?} image to {:?}", WIDTH, HEIGHT, format, path);
        Ok(())
    }

    /// Replace the whole mask plane
    pub(crate) fn replace_mask(&mut self, mask: BitMask) {
        debug_assert_eq!((mask.width(), mask.height()), (WIDTH, HEIGHT));
        self.mask = mask;
        self.mark_dirty();
    }

    pub fn mask(&self) -> &BitMask {
        &self.mask
    }

    /// Mask bit at a pixel; `None` outside the canvas
    pub fn mask_bit(&self, x: i32, y: i32) -> Option<bool> {
        let (px, py) = Self::pixel_in_canvas(x, y)?;
        self.mask.get(px, py)
    }

    /// Attribute at grid coordinates
    pub fn cell(&self, cx: i32, cy: i32) -> Option<&AttributeCell> {
        let (cx, cy) = Self::cell_in_grid(cx, cy)?;
        self.cells.get(Self::cell_index(cx, cy))
    }

    /// Attribute covering a pixel
    pub fn cell_at_pixel(&self, x: i32, y: i32) -> Option<&AttributeCell> {
        let (px, py) = Self::pixel_in_canvas(x, y)?;
        self.cells.get(Self::cell_index(px / CELL_SIZE, py / CELL_SIZE))
    }

    /// All cells with their grid coordinates, row-major
    pub fn cells(&self) -> impl Iterator<Item = ((u32, u32), &AttributeCell)> {
        self.cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let i = i as u32;
                ((i % ATTR_WIDTH, i / ATTR_WIDTH), cell)
            })
    }

    pub fn ink_plane(&self) -> &RgbImage {
        &self.ink_plane
    }

    pub fn paper_plane(&self) -> &RgbImage {
        &self.paper_plane
    }

    pub fn state(&self) -> CompositeState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == CompositeState::Dirty
    }

    /// How many times the composite has been rebuilt
    pub fn composite_count(&self) -> u64 {
        self.composite_count
    }
}

impl Default for AttributeBuffer {
    fn default() -> Self {
        Self::new()
    }
}

fn fill_block(plane: &mut RgbImage, cx: u32, cy: u32, color: Rgb) {
    let color: image::Rgb<u8> = color.into();
    let (x0, y0) = (cx * CELL_SIZE, cy * CELL_SIZE);
    for y in y0..y0 + CELL_SIZE {
        for x in x0..x0 + CELL_SIZE {
            plane.put_pixel(x, y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INK_ON_BLACK: Pen = Pen::new(2, 0, 0);

    fn block_is(plane: &RgbImage, cx: u32, cy: u32, color: Rgb) -> bool {
        let color: image::Rgb<u8> = color.into();
        (0..CELL_SIZE).all(|dy| {
            (0..CELL_SIZE).all(|dx| *plane.get_pixel(cx * CELL_SIZE + dx, cy * CELL_SIZE + dy) == color)
        })
    }

    #[test]
    fn test_new_buffer_is_dirty_and_white() {
        let mut buffer = AttributeBuffer::new();
        assert!(buffer.is_dirty());
        assert_eq!(buffer.cells().count(), 768);
        let white = palette::color_of(7, 0).unwrap();
        assert!(buffer.composite().pixels().all(|p| Rgb::from(*p) == white));
        assert!(!buffer.is_dirty());
    }

    #[test]
    fn test_set_pixel_updates_mask_and_cell() {
        let mut buffer = AttributeBuffer::new();
        buffer.set_pixel(10, 20, INK_ON_BLACK).unwrap();

        assert_eq!(buffer.mask_bit(10, 20), Some(true));
        assert_eq!(buffer.cell(1, 2).unwrap().pen(), INK_ON_BLACK);
        assert_eq!(buffer.cell_at_pixel(15, 23).unwrap().pen(), INK_ON_BLACK);
        assert!(block_is(buffer.ink_plane(), 1, 2, palette::color_of(2, 0).unwrap()));
        assert!(block_is(buffer.paper_plane(), 1, 2, Rgb::BLACK));
        // Neighbouring cell untouched
        assert_eq!(buffer.cell(2, 2).unwrap().pen(), Pen::default());

        assert_eq!(buffer.pixel(10, 20), palette::color_of(2, 0).ok());
        assert_eq!(buffer.pixel(11, 20), Some(Rgb::BLACK));
    }

    #[test]
    fn test_out_of_canvas_writes_are_silent() {
        let mut buffer = AttributeBuffer::new();
        buffer.composite();
        for (x, y) in [(-1, 0), (0, -1), (256, 0), (0, 192), (i32::MIN, i32::MAX)] {
            buffer.set_pixel(x, y, INK_ON_BLACK).unwrap();
            buffer.erase_pixel(x, y, INK_ON_BLACK).unwrap();
            buffer.set_attr(x, y, INK_ON_BLACK).unwrap();
        }
        buffer.set_cell_attr(32, 0, INK_ON_BLACK).unwrap();
        buffer.set_cell_attr(0, -1, INK_ON_BLACK).unwrap();
        assert!(!buffer.is_dirty());
        assert!(buffer.cells().all(|(_, c)| c.pen() == Pen::default()));
        assert_eq!(buffer.mask().count_ones(), 0);
    }

    #[test]
    fn test_invalid_pen_is_rejected_without_mutation() {
        let mut buffer = AttributeBuffer::new();
        buffer.composite();
        let bad = Pen::new(0, 8, 0);
        assert!(matches!(buffer.set_pixel(0, 0, bad), Err(RetroError::OutOfRange { .. })));
        assert!(matches!(buffer.set_attr(0, 0, bad), Err(RetroError::OutOfRange { .. })));
        assert!(matches!(buffer.clear(Pen::new(0, 0, 2)), Err(RetroError::OutOfRange { .. })));
        assert!(matches!(buffer.draw_line(0, 0, 5, 5, bad), Err(RetroError::OutOfRange { .. })));
        assert!(AttributeBuffer::with_pen(bad).is_err());
        assert!(!buffer.is_dirty());
        assert_eq!(buffer.mask().count_ones(), 0);
    }

    #[test]
    fn test_unchanged_attr_does_not_dirty() {
        let mut buffer = AttributeBuffer::new();
        buffer.composite();
        buffer.set_attr(100, 100, Pen::default()).unwrap();
        assert!(!buffer.is_dirty());
        buffer.set_attr(100, 100, Pen::default().bright()).unwrap();
        assert!(buffer.is_dirty());
    }

    #[test]
    fn test_palette_change_repaints_both_planes() {
        let mut buffer = AttributeBuffer::new();
        buffer.set_cell_attr(3, 4, Pen::new(0, 7, 1)).unwrap();
        assert!(block_is(buffer.paper_plane(), 3, 4, Rgb::WHITE));
        assert!(block_is(buffer.ink_plane(), 3, 4, Rgb::BLACK));
        assert!(block_is(buffer.paper_plane(), 4, 4, palette::color_of(7, 0).unwrap()));
    }

    #[test]
    fn test_draw_line_clips_and_colors_cells() {
        let mut buffer = AttributeBuffer::new();
        buffer.draw_line(-4, 0, 3, 0, INK_ON_BLACK).unwrap();
        assert_eq!(buffer.mask().count_ones(), 4);
        for x in 0..4 {
            assert_eq!(buffer.mask_bit(x, 0), Some(true));
        }
        assert_eq!(buffer.cell(0, 0).unwrap().pen(), INK_ON_BLACK);
        assert!(buffer.is_dirty());
    }

    #[test]
    fn test_composite_is_memoized() {
        let mut buffer = AttributeBuffer::new();
        buffer.set_pixel(0, 0, INK_ON_BLACK).unwrap();
        let first = buffer.composite().clone();
        let second = buffer.composite().clone();
        assert_eq!(first, second);
        assert_eq!(buffer.composite_count(), 1);

        buffer.erase_pixel(0, 0, INK_ON_BLACK).unwrap();
        buffer.composite();
        assert_eq!(buffer.composite_count(), 2);
    }

    #[test]
    fn test_erase_recolors_existing_ink() {
        let mut buffer = AttributeBuffer::new();
        buffer.set_pixel(0, 0, Pen::new(1, 7, 0)).unwrap();
        buffer.erase_pixel(1, 0, Pen::new(2, 7, 0)).unwrap();
        // The pixel drawn in blue now shows red: same cell, new ink
        assert_eq!(buffer.pixel(0, 0), palette::color_of(2, 0).ok());
    }

    #[test]
    fn test_save_image_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut buffer = AttributeBuffer::new();
        let err = buffer.save_image(dir.path().join("out.unknownext")).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_draw_line_across_whole_i32_range() {
        let mut buffer = AttributeBuffer::new();
        buffer.draw_line(i32::MIN, 5, i32::MAX, 5, Pen::new(2, 7, 0)).unwrap();
        assert_eq!(buffer.mask().count_ones(), WIDTH as usize);
        assert!((0..WIDTH as i32).all(|x| buffer.mask_bit(x, 5) == Some(true)));

        buffer.draw_line(40, i32::MAX, 40, i32::MIN, INK_ON_BLACK).unwrap();
        assert!((0..HEIGHT as i32).all(|y| buffer.mask_bit(40, y) == Some(true)));
    }

    #[test]
    fn test_draw_line_far_endpoints_match_near_ones() {
        let mut far = AttributeBuffer::new();
        far.draw_line(-1_000_000_000, 0, 1_000_000_000, 0, INK_ON_BLACK).unwrap();
        let mut near = AttributeBuffer::new();
        near.draw_line(0, 0, 255, 0, INK_ON_BLACK).unwrap();
        assert_eq!(far.mask(), near.mask());

        // A shallow slope keeps the exact lattice points inside the canvas
        let (start, end) = ((-3_000, -100), (3_000, 300));
        let mut clipped = AttributeBuffer::new();
        clipped.draw_line(start.0, start.1, end.0, end.1, INK_ON_BLACK).unwrap();
        let mut walked = AttributeBuffer::new();
        for (x, y) in BresenhamLine::new(start, end) {
            walked.set_pixel(x, y, INK_ON_BLACK).unwrap();
        }
        assert_eq!(clipped.mask(), walked.mask());
        assert!(clipped.mask().count_ones() > 0);
    }
}
