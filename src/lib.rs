#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

//! # Retro Draw
//!
//! An attribute-constrained pixel buffer that reproduces the "color clash"
//! graphics of 8-bit home computers: a 256x192 one-bit mask overlaid on a
//! 32x24 grid of ink/paper attributes, composited lazily into a true-color
//! image. Includes integer line rasterization, a lossless document format,
//! raster image export and terminal previews.

pub mod canvas;
pub mod config;
pub mod errors;
pub mod state;

pub use canvas::{AttributeBuffer, AttributeCell, BresenhamLine, Pen, Rgb};
pub use config::Config;
pub use errors::{Result, RetroError};
pub use state::{decode, encode, Document};
