//! Lossless document form of an `AttributeBuffer`
//!
//! The document holds the authoritative state only: the mask as rows of 0/1
//! and one record per attribute cell keyed `"x,y"`. Color planes are derived
//! on decode by replaying every cell through the buffer's own attribute path.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::canvas::{AttributeBuffer, BitMask, Pen, ATTR_HEIGHT, ATTR_WIDTH, CELL_SIZE, HEIGHT, WIDTH};
use crate::errors::{Result, RetroError};

/// Colors of one attribute cell as stored on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    pub ink: u8,
    pub paper: u8,
    pub palette: u8,
}

impl From<Pen> for CellRecord {
    fn from(pen: Pen) -> Self {
        Self {
            ink: pen.ink,
            paper: pen.paper,
            palette: pen.palette,
        }
    }
}

impl From<CellRecord> for Pen {
    fn from(record: CellRecord) -> Self {
        Pen::new(record.ink, record.paper, record.palette)
    }
}

/// Serialized buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// `HEIGHT` rows of `WIDTH` entries, 1 = ink
    pub mask: Vec<Vec<u8>>,
    /// One entry per cell, keyed by `"x,y"` cell coordinates
    #[serde(flatten)]
    pub cells: BTreeMap<String, CellRecord>,
}

impl Document {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Key for the cell at grid coordinates `(cx, cy)`
pub fn cell_key(cx: u32, cy: u32) -> String {
    format!("{cx},{cy}")
}

/// Dump mask and cells
pub fn encode(buffer: &AttributeBuffer) -> Document {
    let mask = (0..HEIGHT)
        .map(|y| buffer.mask().row(y).map(u8::from).collect())
        .collect();

    let cells = buffer
        .cells()
        .map(|((cx, cy), cell)| (cell_key(cx, cy), CellRecord::from(cell.pen())))
        .collect();

    Document { mask, cells }
}

/// Rebuild a buffer from a document
///
/// The whole document is validated before the new buffer is built, so a
/// failure never yields a half-restored buffer.
pub fn decode(doc: &Document) -> Result<AttributeBuffer> {
    let mask = decode_mask(&doc.mask)?;
    let pens = decode_cells(&doc.cells)?;

    let mut buffer = AttributeBuffer::new();
    buffer.replace_mask(mask);
    for ((cx, cy), pen) in pens {
        // Top-left pixel of the cell; goes through the same path as live edits
        buffer
            .set_attr((cx * CELL_SIZE) as i32, (cy * CELL_SIZE) as i32, pen)
            .map_err(malformed)?;
    }

    debug!("Decoded document: {} ink pixels", buffer.mask().count_ones());
    Ok(buffer)
}

fn decode_mask(rows: &[Vec<u8>]) -> Result<BitMask> {
    if rows.len() != HEIGHT as usize {
        return Err(reject(format!("mask has {} rows, expected {HEIGHT}", rows.len())));
    }

    let mut mask = BitMask::new(WIDTH, HEIGHT);
    for (y, row) in rows.iter().enumerate() {
        if row.len() != WIDTH as usize {
            return Err(reject(format!(
                "mask row {y} has {} columns, expected {WIDTH}",
                row.len()
            )));
        }
        for (x, bit) in row.iter().enumerate() {
            match bit {
                0 => {}
                1 => mask.set(x as u32, y as u32, true),
                other => {
                    return Err(reject(format!("mask value {other} at ({x}, {y}) is not 0 or 1")));
                }
            }
        }
    }
    Ok(mask)
}

fn decode_cells(cells: &BTreeMap<String, CellRecord>) -> Result<Vec<((u32, u32), Pen)>> {
    let expected = (ATTR_WIDTH * ATTR_HEIGHT) as usize;
    let mut pens = Vec::with_capacity(expected);

    for cy in 0..ATTR_HEIGHT {
        for cx in 0..ATTR_WIDTH {
            let key = cell_key(cx, cy);
            let record = cells
                .get(&key)
                .ok_or_else(|| reject(format!("missing attribute cell \"{key}\"")))?;
            let pen = Pen::from(*record);
            pen.validate()
                .map_err(|e| reject(format!("attribute cell \"{key}\": {e}")))?;
            pens.push(((cx, cy), pen));
        }
    }

    if cells.len() != expected {
        let stray = cells
            .keys()
            .find(|k| !is_canonical_key(k))
            .cloned()
            .unwrap_or_default();
        return Err(reject(format!(
            "{} attribute entries, expected {expected} (unexpected key \"{stray}\")",
            cells.len()
        )));
    }

    Ok(pens)
}

fn is_canonical_key(key: &str) -> bool {
    let Some((x, y)) = key.split_once(',') else {
        return false;
    };
    match (x.parse::<u32>(), y.parse::<u32>()) {
        (Ok(cx), Ok(cy)) => cx < ATTR_WIDTH && cy < ATTR_HEIGHT && cell_key(cx, cy) == key,
        _ => false,
    }
}

fn reject(message: String) -> RetroError {
    warn!("Rejected document: {}", message);
    RetroError::MalformedDocument(message)
}

fn malformed(err: RetroError) -> RetroError {
    match err {
        RetroError::MalformedDocument(_) => err,
        other => RetroError::MalformedDocument(other.to_string()),
    }
}

impl AttributeBuffer {
    /// Snapshot as a document
    pub fn to_document(&self) -> Document {
        encode(self)
    }

    /// Replace this buffer's state with a decoded document
    ///
    /// On error the buffer is left exactly as it was.
    pub fn restore(&mut self, doc: &Document) -> Result<()> {
        *self = decode(doc)?;
        Ok(())
    }
}
