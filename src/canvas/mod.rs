//! # Attribute canvas - 8-bit "color clash" raster model
//!
//! A 1-bit pixel mask over a coarse grid of ink/paper attributes:
//!
//! ```text
//!   mask (256x192, 1 bit)      attributes (32x24 cells)
//!   ┌───────────────────┐      ┌───────────────────┐
//!   │ 1 = ink, 0 = paper│      │ ink / paper / bank│
//!   └─────────┬─────────┘      └─────────┬─────────┘
//!             │                expanded  │ per 8x8 block
//!             │              ┌───────────┴───────────┐
//!             │              ▼                       ▼
//!             │        ┌───────────┐           ┌───────────┐
//!             │        │ ink plane │           │paper plane│
//!             │        └─────┬─────┘           └─────┬─────┘
//!             └──────────────┼───────────────────────┘
//!                            ▼
//!                   composite (lazy, cached)
//!                            │
//!          ┌─────────────────┼─────────────────┐
//!          ▼                 ▼                 ▼
//!     PNG / BMP         Kitty escape      HalfBlock ▀▄
//! ```

mod attribute;
mod bresenham;
mod buffer;
mod caps;
mod color;
mod halfblock;
mod kitty;
mod mask;
pub mod palette;
mod rasterizer;

pub use attribute::{AttributeCell, Pen};
pub use bresenham::{BresenhamIter, BresenhamLine, Point};
pub use buffer::{AttributeBuffer, CompositeState, ATTR_HEIGHT, ATTR_WIDTH, CELL_SIZE, HEIGHT, WIDTH};
pub use caps::{GraphicsProtocol, TerminalCaps};
pub use color::Rgb;
pub use halfblock::HalfBlockRasterizer;
pub use kitty::KittyRasterizer;
pub use mask::BitMask;
pub use palette::{color_of, name_of, PALETTE_COUNT, PALETTE_SIZE};
pub use rasterizer::{select_rasterizer, PreviewMode, RasterOutput, Rasterizer, StyledCell, StyledLine};
