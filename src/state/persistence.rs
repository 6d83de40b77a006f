//! Document persistence
//!
//! Documents are stored as compact JSON; the mask alone is 49k entries, so
//! pretty printing is left to external tools.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use super::document::{decode, encode, Document};
use crate::canvas::AttributeBuffer;
use crate::errors::Result;

/// Save a document to disk, creating parent directories as needed
///
/// # Arguments
/// * `path` - Destination file
/// * `doc` - The `Document` to save
pub fn save_document(path: &Path, doc: &Document) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
            debug!("Created document directory: {:?}", parent);
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, doc)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    info!("Saved document to {:?}", path);
    Ok(())
}

/// Load a document from disk
///
/// # Returns
/// * `Ok(doc)` if the file parsed as a document
/// * `Err(Io)` if the file could not be read
/// * `Err(MalformedDocument)` if the JSON does not have the document shape
pub fn load_document(path: &Path) -> Result<Document> {
    let reader = BufReader::new(File::open(path)?);
    let doc: Document = serde_json::from_reader(reader)?;
    debug!("Loaded document from {:?} ({} cells)", path, doc.cells.len());
    Ok(doc)
}

/// Encode a buffer and save it
pub fn save_buffer(path: &Path, buffer: &AttributeBuffer) -> Result<()> {
    save_document(path, &encode(buffer))
}

/// Load and decode a buffer
pub fn load_buffer(path: &Path) -> Result<AttributeBuffer> {
    let buffer = decode(&load_document(path)?)?;
    info!("Loaded buffer from {:?}", path);
    Ok(buffer)
}
